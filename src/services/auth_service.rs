//! Signup, login and the password-reset flow.
//!
//! Every operation is stateless and touches at most one `users` row.
//! Session tokens are verified from their signature alone.

use std::sync::{Arc, OnceLock};

use actix_web::web;

use crate::config::AppConfig;
use crate::message::AppError;
use crate::models::user::{
    normalize_email, LoginRequest, ResetPasswordRequest, SignupRequest,
};
use crate::models::{Claims, PublicUser};
use crate::repository::UserStore;
use crate::services::mailer::{Mailer, ResetEmail};
use crate::utils::jwt::{decode_jwt, issue_jwt};
use crate::utils::reset_token::{generate_reset_token, reset_token_expiry};

pub const MIN_PASSWORD_LEN: usize = 8;

const DUMMY_PASSWORD: &str = "spendsavvy-no-such-account";

#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub user: PublicUser,
}

pub struct AuthService {
    store: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    config: AppConfig,
    // Verified against on unknown emails so login costs the same either way.
    dummy_hash: OnceLock<String>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, mailer: Arc<dyn Mailer>, config: AppConfig) -> Self {
        Self {
            store,
            mailer,
            config,
            dummy_hash: OnceLock::new(),
        }
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<AuthOutcome, AppError> {
        let name = req.name.trim().to_string();
        let email = normalize_email(&req.email);
        if name.is_empty() || email.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation("All fields are required"));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict);
        }

        let password_hash = self.hash_password(req.password).await?;

        let user = match self.store.insert(&name, &email, &password_hash).await {
            Ok(user) => user,
            // Lost a race with a concurrent signup for the same address.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(AppError::Conflict)
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = user.id, "user signed up");
        self.outcome(PublicUser::from(&user))
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthOutcome, AppError> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation("Email and password are required"));
        }

        let Some(user) = self.store.find_by_email(&email).await? else {
            let hash = self.dummy_hash().await?;
            let _ = web::block(move || bcrypt::verify(req.password, &hash)).await?;
            return Err(AppError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        match web::block(move || bcrypt::verify(req.password, &hash)).await? {
            Ok(true) => {}
            Ok(false) => return Err(AppError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "stored password hash is unreadable");
                return Err(AppError::InvalidCredentials);
            }
        }

        tracing::info!(user_id = user.id, "user logged in");
        self.outcome(PublicUser::from(&user))
    }

    /// Returns the debug link, if any. Never reports whether the account
    /// exists: internal failures are logged and swallowed.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, AppError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::Validation("Email is required"));
        }

        match self.send_reset_link(&email).await {
            Ok(link) if self.config.development => Ok(link),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::error!(error = %e, "forgot-password failed");
                Ok(None)
            }
        }
    }

    async fn send_reset_link(&self, email: &str) -> Result<Option<String>, AppError> {
        let Some(user) = self.store.find_by_email(email).await? else {
            tracing::debug!("forgot-password for unknown email");
            return Ok(None);
        };

        let token = generate_reset_token();
        self.store
            .set_reset_token(user.id, &token, reset_token_expiry())
            .await?;

        let link = self.config.reset_link(&token);
        let message = ResetEmail {
            to: user.email.clone(),
            name: user.name.clone(),
            link: link.clone(),
        };
        self.mailer
            .send_reset_email(&message)
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        tracing::info!(user_id = user.id, "reset link issued");
        Ok(Some(link))
    }

    pub async fn validate_reset_token(&self, token: &str) -> Result<bool, AppError> {
        if token.is_empty() {
            return Ok(false);
        }
        Ok(self.store.find_by_valid_reset_token(token).await?.is_some())
    }

    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<(), AppError> {
        if req.token.is_empty() || req.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation("Invalid input"));
        }

        if self.store.find_by_valid_reset_token(&req.token).await?.is_none() {
            return Err(AppError::InvalidResetToken);
        }

        let password_hash = self.hash_password(req.new_password).await?;

        if !self
            .store
            .consume_reset_token(&req.token, &password_hash)
            .await?
        {
            return Err(AppError::InvalidResetToken);
        }

        tracing::info!("password reset completed");
        Ok(())
    }

    pub fn decode_session(&self, token: &str) -> Result<Claims, AppError> {
        Ok(decode_jwt(token, &self.config.jwt_secret)?)
    }

    fn outcome(&self, user: PublicUser) -> Result<AuthOutcome, AppError> {
        let token = issue_jwt(&user, &self.config.jwt_secret)?;
        Ok(AuthOutcome { token, user })
    }

    async fn dummy_hash(&self) -> Result<String, AppError> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash.clone());
        }
        let hash = self.hash_password(DUMMY_PASSWORD.to_string()).await?;
        Ok(self.dummy_hash.get_or_init(|| hash).clone())
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.config.bcrypt_cost;
        Ok(web::block(move || bcrypt::hash(password, cost)).await??)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::repository::memory::MemoryUserStore;
    use crate::services::mailer::testing::RecordingMailer;

    fn service(store: Arc<MemoryUserStore>, mailer: Arc<RecordingMailer>) -> AuthService {
        AuthService::new(store, mailer, test_config())
    }

    fn signup_req(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: "Jane".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_signup_stores_bcrypt_hash_not_password() {
        let store = Arc::new(MemoryUserStore::new());
        let auth = service(store.clone(), Arc::new(RecordingMailer::default()));

        let outcome = auth
            .signup(signup_req(" Jane@Example.com ", "correct horse"))
            .await
            .unwrap();
        assert_eq!(outcome.user.email, "jane@example.com");

        let stored = store.get("jane@example.com").unwrap();
        assert_ne!(stored.password_hash, "correct horse");
        assert!(bcrypt::verify("correct horse", &stored.password_hash).unwrap());

        let claims = auth.decode_session(&outcome.token).unwrap();
        assert_eq!(claims.user_id, stored.id);
    }

    #[actix_web::test]
    async fn test_login_is_case_insensitive_on_email() {
        let store = Arc::new(MemoryUserStore::new());
        let auth = service(store, Arc::new(RecordingMailer::default()));
        auth.signup(signup_req("jane@example.com", "password1"))
            .await
            .unwrap();

        let outcome = auth
            .login(LoginRequest {
                email: "JANE@example.com".to_string(),
                password: "password1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(outcome.user.name, "Jane");
    }

    #[actix_web::test]
    async fn test_forgot_password_swallows_mail_failure() {
        let store = Arc::new(MemoryUserStore::new());
        let auth = service(store.clone(), Arc::new(RecordingMailer::failing()));
        auth.signup(signup_req("jane@example.com", "password1"))
            .await
            .unwrap();

        let result = auth.forgot_password("jane@example.com").await;
        assert!(matches!(result, Ok(None)));
    }

    #[actix_web::test]
    async fn test_reset_token_is_single_use() {
        let store = Arc::new(MemoryUserStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let auth = service(store.clone(), mailer.clone());
        auth.signup(signup_req("jane@example.com", "password1"))
            .await
            .unwrap();
        auth.forgot_password("jane@example.com").await.unwrap();

        let token = store.get("jane@example.com").unwrap().reset_token.unwrap();
        let req = || ResetPasswordRequest {
            token: token.clone(),
            new_password: "new-password".to_string(),
        };

        auth.reset_password(req()).await.unwrap();
        assert!(matches!(
            auth.reset_password(req()).await,
            Err(AppError::InvalidResetToken)
        ));

        let stored = store.get("jane@example.com").unwrap();
        assert!(stored.reset_token.is_none());
        assert!(stored.reset_token_expiry.is_none());
    }

    #[actix_web::test]
    async fn test_unknown_email_still_runs_bcrypt() {
        let auth = service(
            Arc::new(MemoryUserStore::new()),
            Arc::new(RecordingMailer::default()),
        );
        assert!(auth.dummy_hash.get().is_none());

        let result = auth
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "password1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
        let hash = auth.dummy_hash.get().unwrap();
        assert!(hash.starts_with(&format!("$2b${:02}$", test_config().bcrypt_cost)));
    }

    #[actix_web::test]
    async fn test_unreadable_stored_hash_is_invalid_credentials() {
        let store = Arc::new(MemoryUserStore::new());
        store
            .insert("Jane", "jane@example.com", "not-a-bcrypt-hash")
            .await
            .unwrap();
        let auth = service(store, Arc::new(RecordingMailer::default()));

        let result = auth
            .login(LoginRequest {
                email: "jane@example.com".to_string(),
                password: "password1".to_string(),
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[actix_web::test]
    async fn test_signup_surfaces_database_failure() {
        let auth = service(
            Arc::new(MemoryUserStore::failing()),
            Arc::new(RecordingMailer::default()),
        );

        let result = auth.signup(signup_req("jane@example.com", "password1")).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
