pub mod channel_query;
pub mod query_builder;
