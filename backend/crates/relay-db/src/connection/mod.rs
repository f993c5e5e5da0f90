pub mod store_connector;
