use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::SmtpConfig;

const SENDER_NAME: &str = "SpendSavvy";
const RESET_SUBJECT: &str = "Password Reset - SpendSavvy";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetEmail {
    pub to: String,
    pub name: String,
    pub link: String,
}

impl ResetEmail {
    pub fn subject(&self) -> &'static str {
        RESET_SUBJECT
    }

    pub fn html(&self) -> String {
        let greeting = if self.name.trim().is_empty() {
            &self.to
        } else {
            &self.name
        };
        let greeting = html_escape::encode_text(greeting);
        let link = html_escape::encode_double_quoted_attribute(&self.link);

        format!(
            r#"<div style="font-family:Arial;max-width:600px;margin:auto;padding:20px;border:1px solid #ddd;border-radius:10px;background:#f9f9f9;">
  <h2 style="color:#2c3e50;text-align:center;">SpendSavvy</h2>
  <p>Hello <strong>{greeting}</strong>,</p>
  <p>Click below to reset your password (expires in 1 hour):</p>
  <div style="text-align:center;margin:30px 0;">
    <a href="{link}" style="background:#3498db;color:#fff;padding:14px 32px;text-decoration:none;border-radius:6px;font-weight:bold;">Reset Password</a>
  </div>
  <p><small>If you didn't request this, ignore this email.</small></p>
</div>"#
        )
    }
}

/// Delivers password-reset links.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reset_email(&self, email: &ResetEmail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        let address: Address = config.username.parse()?;
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), address);

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_reset_email(&self, email: &ResetEmail) -> Result<(), MailError> {
        let to: Address = email.to.parse()?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, to))
            .subject(email.subject())
            .header(ContentType::TEXT_HTML)
            .body(email.html())?;

        let response = self.transport.send(message).await?;
        tracing::info!(to = %email.to, code = %response.code(), "reset email sent");

        Ok(())
    }
}

/// Used when no SMTP credentials are configured. The link only reaches the log.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reset_email(&self, email: &ResetEmail) -> Result<(), MailError> {
        tracing::warn!(to = %email.to, link = %email.link, "smtp not configured, reset email not sent");
        Ok(())
    }
}
