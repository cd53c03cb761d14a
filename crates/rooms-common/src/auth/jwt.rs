//! Bearer token validation
//!
//! HS256 tokens with a numeric subject. The service both issues and
//! validates tokens; issuing also backs the test fixtures.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rooms_core::Snowflake;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried in every token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user's snowflake as a decimal string
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject into a user ID
    ///
    /// # Errors
    /// Returns `InvalidToken` when the subject is not a snowflake
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    /// Whether the expiration has passed
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}

/// Issues and validates bearer tokens for a single shared secret
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, token_expiry: i64) -> Self {
        let bytes = secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            token_expiry,
        }
    }

    /// Issue a token for a user, expiring `token_expiry` seconds from now
    ///
    /// # Errors
    /// Returns an internal error if signing fails
    pub fn issue_token(&self, user_id: Snowflake) -> Result<String, AppError> {
        let issued_at = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(self.token_expiry)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT signing failed: {e}")))
    }

    /// Verify signature and expiry, returning the claims
    ///
    /// # Errors
    /// Returns `TokenExpired` past the expiry, `InvalidToken` otherwise
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        use jsonwebtoken::errors::ErrorKind;

        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(AppError::TokenExpired)
            }
            Err(_) => Err(AppError::InvalidToken),
        }
    }
}

// Keys carry the secret, keep them out of Debug output.
impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}
