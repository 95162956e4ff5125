//! Cached OAuth access tokens and expiry extraction.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};

/// Seconds before the embedded expiry at which a token stops being used.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A bearer token obtained from the OAuth token endpoint.
///
/// The token value is kept in a [`SecretString`] so it never shows up in
/// `Debug` output.
#[derive(Clone)]
pub struct AccessToken {
    value: SecretString,
    expires_at: i64,
}

impl AccessToken {
    /// Wrap a raw token, reading its expiry from the embedded payload.
    ///
    /// Tokens whose payload cannot be decoded are treated as already
    /// expired (`expires_at == 0`).
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let expires_at = extract_expiry(&value);
        Self {
            value: SecretString::from(value),
            expires_at,
        }
    }

    /// Wrap a raw token with an explicit expiry (unix seconds).
    pub fn with_expiry(value: impl Into<String>, expires_at: i64) -> Self {
        Self {
            value: SecretString::from(value.into()),
            expires_at,
        }
    }

    /// Expiry as unix seconds.
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Whether the token may still be presented at `now` (unix seconds).
    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires_at.saturating_sub(EXPIRY_MARGIN_SECS)
    }

    /// Whether the token may still be presented right now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now().timestamp())
    }

    pub(crate) fn secret(&self) -> &str {
        self.value.expose_secret()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Read the `exp` claim from a dot-separated signed token.
///
/// Returns `0` when the token has fewer than two segments, the middle
/// segment is not base64, the payload is not JSON, or `exp` is missing.
/// Never fails.
pub fn extract_expiry(token: &str) -> i64 {
    let Some(segment) = token.split('.').nth(1) else {
        tracing::debug!("token has no payload segment, treating as expired");
        return 0;
    };

    let trimmed = segment.trim_end_matches('=');
    let decoded = URL_SAFE_LENIENT
        .decode(trimmed)
        .or_else(|_| STANDARD_LENIENT.decode(trimmed));
    let Ok(bytes) = decoded else {
        tracing::debug!("token payload is not base64, treating as expired");
        return 0;
    };

    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        tracing::debug!("token payload is not JSON, treating as expired");
        return 0;
    };

    let exp = payload.get("exp").and_then(|exp| {
        exp.as_f64()
            .or_else(|| exp.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
    });

    match exp {
        Some(exp) if exp.is_finite() => exp as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_extracts_integer_exp() {
        let token = token_with_payload(r#"{"exp": 1700000000, "sub": "client"}"#);
        assert_eq!(extract_expiry(&token), 1_700_000_000);
    }

    #[test]
    fn test_extracts_float_exp() {
        let token = token_with_payload(r#"{"exp": 1700000000.75}"#);
        assert_eq!(extract_expiry(&token), 1_700_000_000);
    }

    #[test]
    fn test_accepts_padded_segment() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":42}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(extract_expiry(&token), 42);
    }

    #[test]
    fn test_malformed_tokens_expire_immediately() {
        assert_eq!(extract_expiry("opaque-token"), 0);
        assert_eq!(extract_expiry("a.!!!not-base64!!!.c"), 0);
        assert_eq!(extract_expiry(&token_with_payload("not json")), 0);
        assert_eq!(extract_expiry(&token_with_payload(r#"{"sub": "x"}"#)), 0);
        assert_eq!(extract_expiry(&token_with_payload(r#"[1, 2, 3]"#)), 0);
        assert_eq!(extract_expiry(""), 0);
    }

    #[test]
    fn test_validity_margin() {
        let now = 1_000_000;
        assert!(!AccessToken::with_expiry("t", now + 30).is_valid_at(now));
        assert!(!AccessToken::with_expiry("t", now + 60).is_valid_at(now));
        assert!(AccessToken::with_expiry("t", now + 61).is_valid_at(now));
        assert!(AccessToken::with_expiry("t", now + 120).is_valid_at(now));
        assert!(!AccessToken::with_expiry("t", 0).is_valid_at(now));
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = AccessToken::with_expiry("super-secret-token", 10);
        let debug_str = format!("{:?}", token);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
    }
}
