pub mod channel_store;
pub mod noop_store;
pub mod sqlite_store;
