// services/token_service.rs
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::{AppError, Result};
use crate::models::user::Claims;

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    Malformed,
}

impl TokenRejection {
    pub fn message(&self) -> &'static str {
        match self {
            TokenRejection::Expired => "Token expired",
            TokenRejection::Malformed => "Invalid token",
        }
    }
}

/// Stateless HS256 session tokens. Verification is a pure function of
/// the token contents and the clock; nothing is stored server-side, so
/// a token cannot be revoked before its embedded expiry.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiry: Duration,
}

impl TokenService {
    pub fn new(secret: String, expiry_days: i64) -> Self {
        Self {
            secret,
            expiry: Duration::days(expiry_days),
        }
    }

    pub fn issue(&self, email: &str) -> Result<String> {
        self.issue_with_expiry(email, self.expiry)
    }

    fn issue_with_expiry(&self, email: &str, expiry: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + expiry).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Token(format!("Token generation failed: {}", e)))
    }

    pub fn verify(&self, token: &str) -> std::result::Result<String, TokenRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Ok(data.claims.email),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenRejection::Expired),
                _ => Err(TokenRejection::Malformed),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret".to_string(), 7)
    }

    #[test]
    fn token_round_trips_to_the_original_email() {
        let svc = service();
        let token = svc.issue("student@example.com").unwrap();
        assert_eq!(svc.verify(&token).unwrap(), "student@example.com");
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let token = svc
            .issue_with_expiry("student@example.com", Duration::seconds(-60))
            .unwrap();
        assert_eq!(svc.verify(&token), Err(TokenRejection::Expired));
    }

    #[test]
    fn token_signed_with_another_secret_is_malformed() {
        let other = TokenService::new("some-other-secret".to_string(), 7);
        let token = other.issue("student@example.com").unwrap();
        assert_eq!(service().verify(&token), Err(TokenRejection::Malformed));
    }

    #[test]
    fn corrupted_token_is_malformed() {
        let svc = service();
        let mut token = svc.issue("student@example.com").unwrap();
        token.push_str("garbage");
        assert_eq!(svc.verify(&token), Err(TokenRejection::Malformed));
        assert_eq!(svc.verify("not.a.jwt"), Err(TokenRejection::Malformed));
        assert_eq!(svc.verify(""), Err(TokenRejection::Malformed));
    }
}
