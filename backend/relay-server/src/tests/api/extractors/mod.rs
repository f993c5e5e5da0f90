mod api_json;
mod credentials;
