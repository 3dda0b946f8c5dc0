use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use sethorize_crypto::KeyManager;
use sethorize_db::{Client, Tenant, User};
use sethorize_error::AppError;
use uuid::Uuid;

pub const ISSUER: &str = "sethorize-idp-api";
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3600;

/// RS256 access-token claims. User-facing tokens carry the nested `user`
/// object; client-credentials tokens replace it with `type` and `scope`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub aud: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub sid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserClaims>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email: String,
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub is_admin: bool,
}

pub fn mint_user_token(
    keys: &KeyManager,
    user: &User,
    tenant: &Tenant,
    client_id: Uuid,
    session_id: Uuid,
) -> Result<String, AppError> {
    let iat = Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user.id.to_string(),
        aud: client_id.to_string(),
        iss: ISSUER.to_string(),
        iat,
        exp: iat + ACCESS_TOKEN_TTL_SECS,
        sid: session_id.to_string(),
        user: Some(UserClaims {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            tenant_id: user.tenant_id,
            tenant_name: tenant.name.clone(),
            is_admin: user.is_admin,
        }),
        token_type: None,
        scope: None,
    };
    sign(keys, &claims)
}

pub fn mint_client_token(
    keys: &KeyManager,
    client: &Client,
    session_id: Uuid,
) -> Result<String, AppError> {
    let iat = Utc::now().timestamp();
    let claims = AccessClaims {
        sub: client.id.to_string(),
        aud: client.id.to_string(),
        iss: ISSUER.to_string(),
        iat,
        exp: iat + ACCESS_TOKEN_TTL_SECS,
        sid: session_id.to_string(),
        user: None,
        token_type: Some("client_credentials".to_string()),
        scope: Some(client.scopes.clone()),
    };
    sign(keys, &claims)
}

fn sign(keys: &KeyManager, claims: &AccessClaims) -> Result<String, AppError> {
    encode(&Header::new(Algorithm::RS256), claims, keys.encoding_key()).map_err(|e| {
        tracing::error!(target = "sethorize_server", ?e, "jwt signing failed");
        AppError::Internal
    })
}

/// Verifies signature, expiry and issuer. The audience is matched against
/// the session row by the guard, not here.
pub fn verify_token(keys: &KeyManager, token: &str) -> Result<AccessClaims, AppError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_aud = false;
    // Expiry is exact; no clock-skew allowance.
    validation.leeway = 0;
    decode::<AccessClaims>(token, keys.decoding_key(), &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_keys() -> KeyManager {
        let path = std::env::temp_dir().join(format!("sethorize-tokens-{}.pem", Uuid::new_v4()));
        KeyManager::load_or_generate(&path).unwrap()
    }

    fn test_tenant() -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "Acme".into(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn test_user(tenant_id: Uuid) -> User {
        User {
            id: Uuid::new_v4(),
            email: "u@x".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            display_name: "Ada Lovelace".into(),
            password_hash: "$argon2id$...".into(),
            is_active: true,
            is_verified: true,
            is_admin: false,
            tenant_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn test_client(tenant_id: Uuid) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "Acme Client".into(),
            slug: "default".into(),
            description: String::new(),
            secret_hash: "$argon2id$...".into(),
            redirect_uris: vec!["https://app/cb".into()],
            scopes: vec!["read".into(), "write".into()],
            is_active: true,
            is_internal: false,
            tenant_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn user_token_round_trips_with_claims() {
        let keys = test_keys();
        let tenant = test_tenant();
        let user = test_user(tenant.id);
        let client_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        let token = mint_user_token(&keys, &user, &tenant, client_id, session_id).unwrap();
        let claims = verify_token(&keys, &token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.aud, client_id.to_string());
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.sid, session_id.to_string());
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL_SECS);
        let uc = claims.user.expect("user object");
        assert_eq!(uc.email, "u@x");
        assert_eq!(uc.tenant_name, "Acme");
        assert!(claims.token_type.is_none());
        assert!(claims.scope.is_none());
    }

    #[test]
    fn client_token_carries_type_and_scope_without_user() {
        let keys = test_keys();
        let client = test_client(Uuid::new_v4());
        let session_id = Uuid::new_v4();

        let token = mint_client_token(&keys, &client, session_id).unwrap();
        let claims = verify_token(&keys, &token).unwrap();

        assert_eq!(claims.sub, client.id.to_string());
        assert_eq!(claims.token_type.as_deref(), Some("client_credentials"));
        assert_eq!(
            claims.scope.as_deref(),
            Some(&["read".to_string(), "write".to_string()][..])
        );
        assert!(claims.user.is_none());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let keys = test_keys();
        let iat = Utc::now().timestamp() - 7200;
        let claims = AccessClaims {
            sub: Uuid::new_v4().to_string(),
            aud: Uuid::new_v4().to_string(),
            iss: ISSUER.to_string(),
            iat,
            exp: iat + ACCESS_TOKEN_TTL_SECS, // expired an hour ago
            sid: Uuid::new_v4().to_string(),
            user: None,
            token_type: None,
            scope: None,
        };
        let token = sign(&keys, &claims).unwrap();
        assert!(matches!(
            verify_token(&keys, &token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let keys = test_keys();
        let iat = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: Uuid::new_v4().to_string(),
            aud: Uuid::new_v4().to_string(),
            iss: "someone-else".to_string(),
            iat,
            exp: iat + ACCESS_TOKEN_TTL_SECS,
            sid: Uuid::new_v4().to_string(),
            user: None,
            token_type: None,
            scope: None,
        };
        let token = sign(&keys, &claims).unwrap();
        assert!(matches!(
            verify_token(&keys, &token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn tokens_signed_by_another_key_are_rejected() {
        let keys = test_keys();
        let other = test_keys();
        let tenant = test_tenant();
        let user = test_user(tenant.id);
        let token =
            mint_user_token(&other, &user, &tenant, Uuid::new_v4(), Uuid::new_v4()).unwrap();
        assert!(matches!(
            verify_token(&keys, &token),
            Err(AppError::Unauthorized)
        ));
    }
}
