pub mod auth_handler;
pub mod health_handler;
pub mod user_handler;
