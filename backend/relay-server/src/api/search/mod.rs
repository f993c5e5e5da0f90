pub mod search;
pub mod search_response;
