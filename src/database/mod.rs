pub mod catalog;
pub mod executor;
pub mod models;
pub mod partial;
pub mod postgres;
pub mod record;

pub use catalog::{CatalogError, QueryCatalog};
pub use executor::{DatabaseError, QueryExecutor, QueryResult, SqlParam, FOREIGN_KEY_VIOLATION};
pub use partial::{build_update_params, build_update_values, FieldWhitelist};
pub use postgres::PgExecutor;
pub use record::Record;
