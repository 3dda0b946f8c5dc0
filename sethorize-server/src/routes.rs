use axum::Extension;
use sethorize_db::Db;

/// Liveness endpoint. Public, plain text, checks pool connectivity.
pub async fn healthz(Extension(db): Extension<Db>) -> &'static str {
    match sqlx::query("SELECT 1").execute(&db.pool).await {
        Ok(_) => "OK",
        Err(_) => "ERROR",
    }
}
