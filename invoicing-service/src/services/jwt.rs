use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

/// Claims carried by an invoice API bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identity
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Malformed, forged, expired, not-yet-valid or incomplete token.
pub type TokenError = jsonwebtoken::errors::Error;

/// HS256 token verifier built once from the configured secret.
///
/// The secret is checked when the verifier is built, so a failed `verify`
/// always means the token itself is bad.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        let secret = config.secret.expose_secret();
        if secret.is_empty() {
            return Err(anyhow::anyhow!("JWT secret must not be empty"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        tracing::info!(
            issuer = config.issuer.as_deref().unwrap_or("-"),
            "JWT verifier initialized with HS256 secret"
        );

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Verify signature, expiry, not-before and issuer, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}
