//! Authentication module
//!
//! Bearer tokens, password hashing and the gate in front of wallet routes.

mod gate;
mod jwt;
pub mod password;

pub use gate::AuthGate;
pub use jwt::{AuthService, Claims, JwtAuthService};

/// Errors from token and password handling
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token is either expired or not active yet")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Malformed token")]
    Malformed,

    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Rejected credential, as opposed to a server-side failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Expired | Self::InvalidSignature | Self::Malformed)
    }
}
