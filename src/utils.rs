pub mod jwt;
pub mod reset_token;
