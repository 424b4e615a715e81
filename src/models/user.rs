use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub reset_token: Option<String>,
    pub reset_token_expiry: Option<OffsetDateTime>,
}

/// The part of a user that leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default, rename = "newPassword")]
    pub new_password: String,
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub email: String,
    pub name: String,
    pub iat: usize,
    pub exp: usize,
}

impl From<&Claims> for PublicUser {
    fn from(claims: &Claims) -> Self {
        PublicUser {
            id: claims.user_id,
            name: claims.name.clone(),
            email: claims.email.clone(),
        }
    }
}

/// Lower-cased, trimmed form used for lookups and inserts.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_request_uses_camel_case_password() {
        let req: ResetPasswordRequest =
            serde_json::from_str(r#"{"token":"abc","newPassword":"hunter22"}"#).unwrap();
        assert_eq!(req.token, "abc");
        assert_eq!(req.new_password, "hunter22");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: SignupRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert!(req.name.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }
}
