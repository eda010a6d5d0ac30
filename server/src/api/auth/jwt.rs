//! Bearer token verification
//!
//! Tokens are issued by an external identity provider and verified here
//! with a shared HS256 secret. The server never issues tokens.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an identity provider token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable subject identifying the user at the provider
    pub sub: String,
    /// Email, when the provider shares it
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// HS256 token verifier
pub struct TokenVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};

    fn issue(secret: &str, claims: &Claims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_expiring_in(secs: i64) -> Claims {
        Claims {
            sub: "idp|alice".to_string(),
            email: Some("alice@example.com".to_string()),
            exp: chrono::Utc::now().timestamp() + secs,
        }
    }

    #[test]
    fn test_verify_round_trip() {
        let verifier = TokenVerifier::new("secret");
        let token = issue("secret", &claims_expiring_in(3600));

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, "idp|alice");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let verifier = TokenVerifier::new("secret");
        let token = issue("other-secret", &claims_expiring_in(3600));
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let verifier = TokenVerifier::new("secret");
        let token = issue("secret", &claims_expiring_in(-3600));
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let verifier = TokenVerifier::new("secret");
        assert!(verifier.verify("not.a.token").is_err());
        assert!(verifier.verify("").is_err());
    }

    #[test]
    fn test_email_is_optional() {
        let verifier = TokenVerifier::new("secret");
        let mut claims = claims_expiring_in(3600);
        claims.email = None;

        let token = issue("secret", &claims);
        let verified = verifier.verify(&token).unwrap();
        assert!(verified.email.is_none());
    }
}
