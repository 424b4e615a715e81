use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};

use crate::models::{Claims, PublicUser};

pub const SESSION_TTL_HOURS: i64 = 24;

pub fn issue_jwt(user: &PublicUser, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    let token_data: TokenData<Claims> = decode(token, &key, &validation)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "secret";

    fn user() -> PublicUser {
        PublicUser {
            id: 7,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
        }
    }

    #[test]
    fn test_decode_jwt_valid_token() {
        let token = issue_jwt(&user(), SECRET).unwrap();
        let claims = decode_jwt(&token, SECRET).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.exp - claims.iat, (SESSION_TTL_HOURS * 3600) as usize);
    }

    #[test]
    fn test_decode_jwt_invalid_token() {
        let result = decode_jwt("invalid.token.string", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_jwt_wrong_secret() {
        let token = issue_jwt(&user(), SECRET).unwrap();
        assert!(decode_jwt(&token, "another-secret").is_err());
    }

    #[test]
    fn test_decode_jwt_expired_token() {
        let claims = Claims {
            user_id: 1,
            email: "old@example.com".to_string(),
            name: "Old".to_string(),
            iat: (Utc::now() - Duration::hours(48)).timestamp() as usize,
            exp: (Utc::now() - Duration::hours(24)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(decode_jwt(&token, SECRET).is_err());
    }
}
