use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens are valid for a fixed 30 days from issuance.
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

/// Claims carried by a bearer token. Missing claims deserialize to their
/// zero value so they fail the explicit checks in [`TokenService::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Any validation failure. Deliberately carries no detail.
    #[error("unauthorized")]
    Unauthorized,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Issues and validates HS256 bearer tokens for one application.
#[derive(Clone)]
pub struct TokenService {
    app_name: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(app_name: impl Into<String>, secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Issuer, audience and presence are checked by hand, in order.
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            app_name: app_name.into(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn claims_for(&self, user_id: u64, email: &str, now: DateTime<Utc>) -> Claims {
        Claims {
            sub: user_id.to_string(),
            iss: self.app_name.clone(),
            aud: self.app_name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
            email: email.to_string(),
        }
    }

    pub fn issue(&self, user_id: u64, email: &str) -> Result<String, TokenError> {
        self.sign(&self.claims_for(user_id, email, Utc::now()))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Returns the user id in `sub` if every check passes.
    pub fn validate(&self, token: &str) -> Result<u64, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| reject(&format!("decode: {}", e)))?
            .claims;

        if claims.iat == 0 {
            return Err(reject("missing iat"));
        }
        if claims.exp == 0 {
            return Err(reject("missing exp"));
        }
        if claims.iss != self.app_name {
            return Err(reject("issuer mismatch"));
        }
        if claims.sub.is_empty() {
            return Err(reject("missing sub"));
        }
        let user_id = claims.sub.parse::<u64>().map_err(|_| reject("non-numeric sub"))?;
        if claims.aud != self.app_name {
            return Err(reject("audience mismatch"));
        }

        Ok(user_id)
    }
}

fn reject(reason: &str) -> TokenError {
    tracing::debug!("bearer token rejected: {}", reason);
    TokenError::Unauthorized
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn service() -> TokenService {
        TokenService::new("lizard", SECRET)
    }

    fn assert_unauthorized(result: Result<u64, TokenError>) {
        assert!(matches!(result, Err(TokenError::Unauthorized)), "expected Unauthorized, got {:?}", result);
    }

    #[test]
    fn issue_then_validate() {
        let s = service();
        let token = s.issue(7, "a@example.com").unwrap();
        assert_eq!(s.validate(&token).unwrap(), 7);
    }

    #[test]
    fn claims_span_thirty_days() {
        let now = Utc::now();
        let claims = service().claims_for(1, "a@example.com", now);
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
        assert_eq!(claims.iss, "lizard");
        assert_eq!(claims.aud, "lizard");
        assert_eq!(claims.sub, "1");
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let s = service();
        let token = s.issue(7, "a@example.com").unwrap();
        let mut bytes = token.into_bytes();
        let i = bytes.len() - 10;
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();
        assert_unauthorized(s.validate(&tampered));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenService::new("lizard", b"other").issue(7, "a@example.com").unwrap();
        assert_unauthorized(service().validate(&token));
    }

    #[test]
    fn claim_mismatches_are_rejected() {
        let s = service();
        let good = s.claims_for(7, "a@example.com", Utc::now());

        let cases = [
            Claims { iss: "other".into(), ..good.clone() },
            Claims { aud: "other".into(), ..good.clone() },
            Claims { sub: String::new(), ..good.clone() },
            Claims { sub: "-7".into(), ..good.clone() },
            Claims { sub: "seven".into(), ..good.clone() },
            Claims { iat: 0, ..good.clone() },
            Claims { exp: 0, ..good.clone() },
        ];
        for claims in cases {
            let token = s.sign(&claims).unwrap();
            assert_unauthorized(s.validate(&token));
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        let s = service();
        let claims = s.claims_for(7, "a@example.com", Utc::now() - Duration::days(31));
        let token = s.sign(&claims).unwrap();
        assert_unauthorized(s.validate(&token));
    }

    #[test]
    fn token_for_other_app_is_rejected() {
        let token = TokenService::new("other-app", SECRET).issue(7, "a@example.com").unwrap();
        assert_unauthorized(service().validate(&token));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_unauthorized(service().validate("not-a-token"));
        assert_unauthorized(service().validate(""));
    }
}
