pub mod filter;
pub mod filter_op;
pub mod notification;
pub mod search_request;
pub mod subscription_ack;
pub mod subscription_request;
