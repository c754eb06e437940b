use sqlx::migrate::Migrator;

pub static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("src/migrations_sqlite");
pub static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("src/migrations_postgres");

pub fn sqlite_migrator() -> &'static Migrator {
    &SQLITE_MIGRATOR
}

pub fn postgres_migrator() -> &'static Migrator {
    &POSTGRES_MIGRATOR
}
