//! HTTP client for the auth API, the counterpart of the sign-in page.
//!
//! Failed operations come back as `{success: false, message}` with HTTP 200,
//! so the payload decides the outcome, not the status code.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::user::{ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest};
use crate::models::{
    AuthResponse, ForgotPasswordResponse, MessageResponse, PublicUser, ValidateTokenResponse,
};
use crate::session::SessionStore;
use crate::storage::{Storage, StorageError};

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check if server is running.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error. Please check if server is running.")]
    Network(#[source] reqwest::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct AuthClient<S: Storage> {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore<S>,
}

impl<S: Storage> AuthClient<S> {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>, session: SessionStore<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<PublicUser, ClientError> {
        if password != confirm_password {
            return Err(ClientError::Rejected("Passwords do not match!".to_string()));
        }

        let body = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.post("/auth/signup", &body).await?;
        self.session.store(&response.token, &response.user)?;

        Ok(response.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.post("/auth/login", &body).await?;
        self.session.store(&response.token, &response.user)?;

        Ok(response.user)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<ForgotPasswordResponse, ClientError> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.post("/auth/forgot-password", &body).await
    }

    pub async fn validate_reset_token(&self, token: &str) -> Result<bool, ClientError> {
        let url = format!("{}/auth/validate-reset-token/{token}", self.base_url);
        let response = self.http.get(url).send().await.map_err(ClientError::Network)?;
        let value: Value = response.json().await.map_err(ClientError::Network)?;

        let parsed: ValidateTokenResponse = serde_json::from_value(value)?;
        Ok(parsed.success && parsed.valid)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, ClientError> {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        let response: MessageResponse = self.post("/auth/reset-password", &body).await?;
        Ok(response.message)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()?;
        Ok(())
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "auth request failed");
                ClientError::Network(e)
            })?;
        let value: Value = response.json().await.map_err(ClientError::Network)?;

        into_result(value)
    }
}

fn into_result<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Request failed")
            .to_string();
        return Err(ClientError::Rejected(message));
    }

    Ok(serde_json::from_value(value)?)
}
