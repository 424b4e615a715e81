use std::env;

use thiserror::Error;

pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub allowed_origins: Vec<String>,
    /// When set, forgot-password responses carry the reset link.
    pub development: bool,
    pub bcrypt_cost: u32,
    /// `None` means reset emails are only logged.
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parsed("PORT", 3000)?;
        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5500".to_string())
            .trim_end_matches('/')
            .to_string();

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5500,http://127.0.0.1:5500".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let development = env::var("APP_ENV")
            .map(|value| value.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        let bcrypt_cost = parsed("BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let smtp = match (env::var("EMAIL_USER"), env::var("EMAIL_PASS")) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(SmtpConfig {
                    host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                    port: parsed("SMTP_PORT", 587)?,
                    username,
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            frontend_url,
            allowed_origins,
            development,
            bcrypt_cost,
            smtp,
        })
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password.html?token={token}", self.frontend_url)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost/spend_savvy_test".to_string(),
        jwt_secret: "test-secret".to_string(),
        host: "127.0.0.1".to_string(),
        port: 3000,
        frontend_url: "http://localhost:5500".to_string(),
        allowed_origins: vec!["http://localhost:5500".to_string()],
        development: false,
        bcrypt_cost: 4,
        smtp: None,
    }
}
