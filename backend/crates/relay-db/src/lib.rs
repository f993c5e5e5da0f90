pub mod connection;
pub mod error;
pub mod query;
pub mod row;
pub mod schema;
pub mod store;

pub use connection::store_connector::{StoreOptions, open_in_memory_pool, open_pool};
pub use error::{DbError, Result};
pub use query::channel_query::ChannelQuery;
pub use query::query_builder::{DEFAULT_SEARCH_LIMIT, build_query};
pub use row::{ChannelRow, decode_row};
pub use schema::channel_schema::{ChannelSchema, ReconcileOutcome, quote_identifier};
pub use schema::schema_manager::SchemaManager;
pub use store::channel_store::{ChannelStore, PersistOutcome};
pub use store::noop_store::NoopStore;
pub use store::sqlite_store::SqliteStore;
