//! Signed bearer tokens.
//!
//! Wire format: three base64url (no padding) segments joined by `.`:
//! `header.claims.signature`, where the signature is
//! HMAC-SHA256(secret, `header "." claims`). Header and claims serialize
//! with sorted keys and no whitespace, so a token is reproducible from its
//! inputs and auditable.
//!
//! Verification order matters: segment count, then signature
//! (constant-time, before the claims are decoded or trusted), then expiry.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Flat claim map. `BTreeMap` keeps serialization deterministic.
pub type Claims = BTreeMap<String, Value>;

/// Token verification failures. All of these surface to clients as one
/// generic "Invalid token"; the distinction exists for logging.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not three dot-separated segments")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

/// Issues and verifies signed tokens with a process-wide secret key.
///
/// Any process holding the same secret can verify tokens issued by any
/// other, so no server-side session state is needed.
#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a token carrying `claims` plus an `exp` claim set to
    /// `now + ttl_minutes * 60`. An `exp` already present is overwritten.
    pub fn issue(&self, claims: Claims, ttl_minutes: u64) -> String {
        self.issue_at(claims, ttl_minutes, unix_now())
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, unix_now())
    }

    fn issue_at(&self, mut claims: Claims, ttl_minutes: u64, now: i64) -> String {
        let mut header = BTreeMap::new();
        header.insert("alg", "HS256");
        header.insert("typ", "JWT");

        claims.insert(
            "exp".to_string(),
            Value::from(now + ttl_minutes as i64 * 60),
        );

        let header_b64 = URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(&header).expect("header is a flat string map"));
        let claims_b64 =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("claims are a flat map"));

        let signing_input = format!("{}.{}", header_b64, claims_b64);
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::BadSignature)?;

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key size");
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        // The signature checks out; only now are the claims decoded.
        let claims_json = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&claims_json).map_err(|_| TokenError::Malformed)?;

        // A missing exp counts as already expired.
        let exp = claims.get("exp").and_then(Value::as_i64).unwrap_or(0);
        if exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-of-sufficient-length";

    fn member_claims() -> Claims {
        let mut claims = Claims::new();
        claims.insert("id".to_string(), Value::from(42));
        claims.insert("email".to_string(), Value::from("a@example.com"));
        claims
    }

    /// Flip the last character of a token to corrupt its signature segment.
    fn tamper_last_char(token: &str) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        let last = chars.last_mut().unwrap();
        *last = if *last == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_issue_then_verify_returns_claims_plus_exp() {
        let service = TokenService::new(SECRET);
        let token = service.issue_at(member_claims(), 60, 1_000);

        let claims = service.verify_at(&token, 1_000).unwrap();
        assert_eq!(claims.get("id").and_then(Value::as_i64), Some(42));
        assert_eq!(
            claims.get("email").and_then(Value::as_str),
            Some("a@example.com")
        );
        assert_eq!(
            claims.get("exp").and_then(Value::as_i64),
            Some(1_000 + 60 * 60)
        );
    }

    #[test]
    fn test_issuance_is_deterministic() {
        let service = TokenService::new(SECRET);
        let first = service.issue_at(member_claims(), 60, 1_000);
        let second = service.issue_at(member_claims(), 60, 1_000);
        assert_eq!(first, second);
    }

    #[test]
    fn test_expired_token_fails_with_expiry_not_signature() {
        let service = TokenService::new(SECRET);
        let token = service.issue_at(member_claims(), 60, 1_000);

        // One second past exp: exactly exp is also invalid.
        let at_exp = service.verify_at(&token, 1_000 + 60 * 60);
        assert_eq!(at_exp.unwrap_err(), TokenError::Expired);

        let past_exp = service.verify_at(&token, 1_000 + 60 * 60 + 1);
        assert_eq!(past_exp.unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let service = TokenService::new(SECRET);
        let token = service.issue_at(member_claims(), 60, 1_000);

        let tampered = tamper_last_char(&token);
        assert_eq!(
            service.verify_at(&tampered, 1_000).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn test_tampered_claims_rejected_before_decoding() {
        let service = TokenService::new(SECRET);
        let token = service.issue_at(member_claims(), 60, 1_000);

        let mut parts: Vec<&str> = token.split('.').collect();
        let mut forged_claims = member_claims();
        forged_claims.insert("id".to_string(), Value::from(1));
        forged_claims.insert("exp".to_string(), Value::from(999_999_999));
        let forged =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        parts[1] = &forged;
        let forged_token = parts.join(".");

        assert_eq!(
            service.verify_at(&forged_token, 1_000).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn test_wrong_segment_count_is_malformed() {
        let service = TokenService::new(SECRET);

        assert_eq!(
            service.verify_at("only.two", 1_000).unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(
            service.verify_at("a.b.c.d", 1_000).unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(
            service.verify_at("", 1_000).unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_different_secret_rejects() {
        let issuer = TokenService::new(SECRET);
        let verifier = TokenService::new(b"another-secret-key-entirely-here".to_vec());

        let token = issuer.issue_at(member_claims(), 60, 1_000);
        assert_eq!(
            verifier.verify_at(&token, 1_000).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn test_missing_exp_counts_as_expired() {
        let service = TokenService::new(SECRET);
        let token = service.issue_at(member_claims(), 60, 1_000);

        // Re-sign a claims set without exp using the real secret.
        let mut claims = member_claims();
        claims.remove("exp");
        let header_b64 = token.split('.').next().unwrap();
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let signing_input = format!("{}.{}", header_b64, claims_b64);
        let mut mac = HmacSha256::new_from_slice(SECRET).unwrap();
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        let no_exp_token = format!("{}.{}", signing_input, signature);

        assert_eq!(
            service.verify_at(&no_exp_token, 1_000).unwrap_err(),
            TokenError::Expired
        );
    }
}
