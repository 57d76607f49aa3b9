//! Small helpers for gate validation, code generation, and token handling.

use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, Rng, RngCore};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::time::SystemTime;
use tracing::info;

use super::store::Enrollee;

/// Inclusive range for one-time codes: always 6 ASCII digits.
pub(crate) const ACCESS_CODE_MIN: u32 = 100_000;
pub(crate) const ACCESS_CODE_MAX: u32 = 999_999;

/// Normalize an email for slot lookup and bypass comparison.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Draw a uniformly random 6-digit verification code.
pub(super) fn generate_access_code() -> String {
    let code = rand::thread_rng().gen_range(ACCESS_CODE_MIN..=ACCESS_CODE_MAX);
    code.to_string()
}

/// Create a new session token for the gate cookie.
/// The raw value is only returned to the client; the store keeps a hash.
pub(super) fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

/// Hash a session token so raw values never sit in the store.
/// The hash is used for lookups when the cookie or bearer token is presented.
pub(crate) fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

/// Unix milliseconds, the time base for every gate record.
pub(crate) fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Extract a client IP for rate limiting and access logs from common proxy headers.
pub(super) fn extract_client_ip(headers: &axum::http::HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Structured access log emitted on every grant.
pub(super) fn log_access(user: &Enrollee, headers: &axum::http::HeaderMap) {
    let client_ip = extract_client_ip(headers);
    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok());
    info!(
        email = %user.email,
        organization = %user.organization,
        client_ip = client_ip.as_deref().unwrap_or("unknown"),
        user_agent = user_agent.unwrap_or("unknown"),
        "access granted"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};
    use base64ct::{Base64UrlUnpadded, Encoding};

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn access_code_is_six_digits_in_range() {
        for _ in 0..1000 {
            let code = generate_access_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let value: u32 = code.parse().expect("code should be numeric");
            assert!((ACCESS_CODE_MIN..=ACCESS_CODE_MAX).contains(&value));
        }
    }

    #[test]
    fn access_code_covers_full_range() {
        // Statistical sanity check: 10,000 draws should land in every
        // 100k-wide bucket of [100000, 999999]; a generator biased into a
        // sub-range would not.
        let mut buckets = [0u32; 9];
        for _ in 0..10_000 {
            let value: u32 = generate_access_code()
                .parse()
                .expect("code should be numeric");
            let bucket = ((value - ACCESS_CODE_MIN) / 100_000) as usize;
            buckets[bucket.min(8)] += 1;
        }
        for (bucket, count) in buckets.iter().enumerate() {
            assert!(*count > 0, "no codes generated in bucket {bucket}");
        }
    }

    #[test]
    fn session_token_round_trip() {
        let decoded_len = Base64UrlUnpadded::decode_vec(&generate_session_token())
            .map(|bytes| bytes.len())
            .ok();
        assert_eq!(decoded_len, Some(32));
    }

    #[test]
    fn session_tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn hash_session_token_stable() {
        let first = hash_session_token("token");
        let second = hash_session_token("token");
        let different = hash_session_token("other");
        assert_eq!(first, second);
        assert_ne!(first, different);
    }

    #[test]
    fn extract_client_ip_prefers_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(extract_client_ip(&headers), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(extract_client_ip(&headers), Some("9.9.9.9".to_string()));
    }

    #[test]
    fn extract_client_ip_none_when_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers), None);
    }

    #[test]
    fn now_unix_ms_is_positive() {
        assert!(now_unix_ms() > 0);
    }
}
