//! Operator management token

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::ConsoleError;

/// Claims carried by a management token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagementTokenClaims {
    /// Operator user ID
    #[serde(default)]
    pub user_id: String,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    #[serde(default)]
    pub iss: Option<String>,
}

/// A decoded management token
#[derive(Debug, Clone)]
pub struct ManagementToken {
    pub raw: String,
    pub claims: ManagementTokenClaims,
}

impl ManagementToken {
    /// Decode the claims of a JWT.
    ///
    /// The signature is not verified, the console only reads the expiry to
    /// schedule a refresh; the backend remains the authority.
    pub fn from_raw(raw: impl Into<String>) -> Result<Self, ConsoleError> {
        let raw = raw.into();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<ManagementTokenClaims>(&raw, &DecodingKey::from_secret(b""), &validation)
            .map_err(|e| ConsoleError::TokenError(format!("Failed to decode token: {}", e)))?;

        Ok(Self {
            raw,
            claims: token_data.claims,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.claims.user_id
    }

    pub fn is_expired(&self) -> bool {
        self.claims.exp < Utc::now().timestamp()
    }

    /// Check if the token expires within the given number of seconds
    pub fn expires_within(&self, seconds: i64) -> bool {
        self.claims.exp < Utc::now().timestamp() + seconds
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claims.exp, 0)
    }

    /// Seconds until expiration, negative once expired
    pub fn time_until_expiry(&self) -> i64 {
        self.claims.exp - Utc::now().timestamp()
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(user_id: &str, exp: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = ManagementTokenClaims {
        user_id: user_id.to_string(),
        exp,
        iat: Utc::now().timestamp(),
        iss: Some("harbor".to_string()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_without_signature_check() {
        let exp = Utc::now().timestamp() + 7200;
        let token = ManagementToken::from_raw(encode_test_token("op-1", exp)).unwrap();

        assert_eq!(token.user_id(), "op-1");
        assert!(!token.is_expired());
        assert!(!token.expires_within(3600));
        assert!(token.expires_within(3 * 3600));
        assert_eq!(token.expires_at().map(|t| t.timestamp()), Some(exp));
    }

    #[test]
    fn test_expired_token() {
        let exp = Utc::now().timestamp() - 10;
        let token = ManagementToken::from_raw(encode_test_token("op-1", exp)).unwrap();
        assert!(token.is_expired());
        assert!(token.time_until_expiry() < 0);
    }

    #[test]
    fn test_opaque_token_is_rejected() {
        assert!(matches!(
            ManagementToken::from_raw("not-a-jwt"),
            Err(ConsoleError::TokenError(_))
        ));
    }
}
