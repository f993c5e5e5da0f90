pub mod api_json;
pub mod credentials;
