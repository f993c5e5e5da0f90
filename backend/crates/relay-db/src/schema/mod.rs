pub mod channel_schema;
pub mod schema_manager;
