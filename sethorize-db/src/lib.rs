mod connection;
mod models;

pub mod auth_codes;
pub mod clients;
pub mod consents;
pub mod refresh_tokens;
pub mod sessions;
pub mod tenants;
pub mod users;

pub use auth_codes::{AuthCodeOperations, AUTH_CODE_TTL_MINUTES};
pub use clients::ClientOperations;
pub use consents::{ConsentOperations, CONSENT_TTL_DAYS};
pub use models::*;
pub use refresh_tokens::{RefreshTokenOperations, REFRESH_TOKEN_TTL_HOURS};
pub use sessions::{SessionOperations, SESSION_TTL_HOURS};
pub use tenants::TenantOperations;
pub use users::UserOperations;
