pub mod bearer;
pub mod handlers;
pub mod middleware;
pub mod tokens;
pub mod utils;

use axum::extract::FromRef;
use sethorize_config::AppConfig;
use sethorize_crypto::KeyManager;
use sethorize_db::Db;

pub use handlers::*;
pub use middleware::*;

#[derive(Clone)]
pub struct AuthState {
    pub db: Db,
    pub cfg: AppConfig,
    pub keys: KeyManager,
}

impl FromRef<AuthState> for Db {
    fn from_ref(s: &AuthState) -> Db {
        s.db.clone()
    }
}
impl FromRef<AuthState> for AppConfig {
    fn from_ref(s: &AuthState) -> AppConfig {
        s.cfg.clone()
    }
}
impl FromRef<AuthState> for KeyManager {
    fn from_ref(s: &AuthState) -> KeyManager {
        s.keys.clone()
    }
}
