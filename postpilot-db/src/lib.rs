#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("Enable exactly one of the `postgres` or `sqlite` features for postpilot-db.");

#[cfg(all(feature = "postgres", feature = "sqlite"))]
compile_error!("Activate only one backend feature (`postgres` or `sqlite`) for postpilot-db.");

#[cfg(feature = "postgres")]
pub type DbBackend = sqlx::Postgres;
#[cfg(feature = "sqlite")]
pub type DbBackend = sqlx::Sqlite;

pub mod config;
pub mod error;
pub mod group_items;
pub mod groups;
pub mod pool;
pub mod upload_jobs;
pub mod users;

pub use config::DbConnectionConfig;
pub use error::DbConnectionError;
pub use pool::{create_pool, DbPool};
pub use upload_jobs::JobStatus;
