//! PostgreSQL adapters.
//!
//! sqlx-backed implementations of the storage and lookup ports. Schema
//! lives in `migrations/` and is applied with `sqlx::migrate!`.

mod course_catalog;
mod order_store;
mod user_directory;

pub use course_catalog::PostgresCourseCatalog;
pub use order_store::PostgresOrderStore;
pub use user_directory::PostgresUserDirectory;
