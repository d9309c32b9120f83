use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{ClientError, ClientResult};

type HmacSha256 = Hmac<Sha256>;

fn sanitize_base64_secret(secret: &str) -> String {
    secret
        .chars()
        .filter_map(|c| match c {
            '-' => Some('+'),
            '_' => Some('/'),
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' | '=' => Some(c),
            _ => None,
        })
        .collect()
}

/// Build the settlement venue's HMAC-SHA256 request signature.
///
/// The signed message is `{timestamp}{method}{request_path}` plus the raw JSON
/// body when one is sent; the API secret is base64-encoded and the resulting
/// signature is returned URL-safe, matching the venue's key scheme.
pub fn build_request_signature(
    secret: &str,
    timestamp: i64,
    method: &str,
    request_path: &str,
    body: Option<&str>,
) -> ClientResult<String> {
    let mut message = format!("{timestamp}{method}{request_path}");
    if let Some(body) = body {
        message.push_str(body);
    }

    let sanitized = sanitize_base64_secret(secret);
    let key_bytes = BASE64_STANDARD
        .decode(sanitized)
        .map_err(|e| ClientError::Hmac(format!("invalid base64 secret: {e}")))?;

    let mut mac =
        HmacSha256::new_from_slice(&key_bytes).map_err(|e| ClientError::Hmac(e.to_string()))?;
    mac.update(message.as_bytes());
    let signature = mac.finalize().into_bytes();

    let b64 = BASE64_STANDARD.encode(signature);
    let sig_url_safe = b64.replace('+', "-").replace('/', "_");
    Ok(sig_url_safe)
}

/// Convenience helper to get the current UNIX timestamp in seconds.
pub fn current_unix_timestamp() -> i64 {
    Utc::now().timestamp()
}
