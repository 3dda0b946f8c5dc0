use sqlx::migrate::Migrator;

static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Embedded schema migrations, applied by `Db::connect` in dependency order.
pub fn postgres_migrator() -> &'static Migrator {
    &POSTGRES_MIGRATOR
}
