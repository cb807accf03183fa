//! JWT bearer tokens
//!
//! HS256 tokens carrying the employee id. Secret and lifetime come from
//! `Config`; nothing here reads the environment.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// Issues and validates bearer credentials
pub trait AuthService: Send + Sync {
    /// Issue a token for an employee
    fn issue(&self, employee_id: Uuid) -> Result<String, AuthError>;

    /// Validate signature and expiry, returning the employee id
    fn verify(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 implementation of `AuthService`
pub struct JwtAuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtAuthService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }
}

impl AuthService for JwtAuthService {
    fn issue(&self, employee_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Encoding("token expiry out of range".to_string()))?;

        let claims = Claims {
            user_id: employee_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            }
        })?;

        Ok(data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtAuthService {
        JwtAuthService::new("test-secret", Duration::hours(12))
    }

    #[test]
    fn test_issue_and_verify() {
        let auth = service();
        let employee_id = Uuid::new_v4();

        let token = auth.issue(employee_id).unwrap();
        assert_eq!(auth.verify(&token).unwrap(), employee_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue(Uuid::new_v4()).unwrap();
        let other = JwtAuthService::new("other-secret", Duration::hours(12));

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let auth = JwtAuthService::new("test-secret", Duration::hours(-1));
        let token = auth.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(auth.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(service().verify("not-a-jwt"), Err(AuthError::Malformed)));
        assert!(matches!(service().verify(""), Err(AuthError::Malformed)));
    }
}
