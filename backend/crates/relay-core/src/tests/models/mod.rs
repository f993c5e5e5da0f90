mod filter;
mod notification;
mod subscription_request;
