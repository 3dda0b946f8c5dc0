use anyhow::Result;
use sethorize_config::AppConfig;
use sethorize_crypto::{generate_secret, SECRET_LEN};
use sethorize_db::{ClientOperations, Db, NewClient, NewUser, TenantOperations, UserOperations};
use tracing::{debug, info};
use uuid::Uuid;

/// Idempotent seed routine, run at startup after migrations: the default
/// tenant, its three well-known clients, and the admin user.
pub async fn ensure_seed_data(db: &Db, cfg: &AppConfig) -> Result<()> {
    info!("initializing base data");

    let tenant = match db.fetch_tenant_by_name(&cfg.application_name).await? {
        Some(tenant) => {
            debug!(tenant_id=%tenant.id, name=%tenant.name, "tenant already seeded");
            tenant
        }
        None => db.create_tenant(&cfg.application_name).await?,
    };

    ensure_client(
        db,
        tenant.id,
        format!("{} Client", cfg.application_name),
        "default".to_string(),
        "Default OAuth2 Client",
        false,
    )
    .await?;
    ensure_client(
        db,
        tenant.id,
        format!("{} CLI Client", cfg.application_name),
        format!("{}-cli", cfg.application_name.to_lowercase()),
        "Command Line Interface Client",
        true,
    )
    .await?;
    ensure_client(
        db,
        tenant.id,
        format!("{} Account Client", cfg.application_name),
        "account".to_string(),
        "Account Management Client",
        true,
    )
    .await?;

    ensure_admin_user(db, cfg, tenant.id).await?;

    info!("base data initialized");
    Ok(())
}

async fn ensure_client(
    db: &Db,
    tenant_id: Uuid,
    name: String,
    slug: String,
    description: &str,
    internal: bool,
) -> Result<()> {
    if let Some(existing) = db.fetch_client_by_slug_in_tenant(&slug, tenant_id).await? {
        debug!(client_id=%existing.id, slug=%slug, "client already seeded");
        return Ok(());
    }
    let secret = generate_secret(SECRET_LEN);
    let client = db
        .create_client(NewClient {
            name,
            slug: slug.clone(),
            description: description.to_string(),
            secret: secret.clone(),
            redirect_uris: Vec::new(),
            scopes: Vec::new(),
            is_internal: internal,
            tenant_id,
        })
        .await?;
    // The plaintext secret is surfaced exactly once, at creation.
    info!(client_id=%client.id, slug=%slug, secret=%secret, "client seeded");
    Ok(())
}

async fn ensure_admin_user(db: &Db, cfg: &AppConfig, tenant_id: Uuid) -> Result<()> {
    let email = format!("admin@{}", cfg.application_domain);
    if let Some(existing) = db.fetch_user_by_email_in_tenant(&email, tenant_id).await? {
        debug!(user_id=%existing.id, email=%email, "admin user already seeded");
        return Ok(());
    }
    let generated = cfg.bootstrap_admin_password.is_none();
    let password = cfg
        .bootstrap_admin_password
        .clone()
        .unwrap_or_else(|| generate_secret(SECRET_LEN));
    let user = db
        .create_user(NewUser {
            email: email.clone(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            password: password.clone(),
            is_active: true,
            is_verified: true,
            is_admin: true,
            tenant_id,
        })
        .await?;
    if generated {
        info!(user_id=%user.id, email=%email, password=%password, "admin user seeded with generated password");
    } else {
        info!(user_id=%user.id, email=%email, "admin user seeded");
    }
    Ok(())
}
