pub mod auth_service;
pub mod mailer;

pub use auth_service::AuthService;
pub use mailer::{LogMailer, Mailer, ResetEmail, SmtpMailer};
