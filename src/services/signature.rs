//! Veracode request signature scheme.
//!
//! A single-shot shared-secret signature: four chained HMAC-SHA256 stages
//! over a nonce, a millisecond timestamp, a fixed version string, and the
//! canonical request data. Each stage's hex output is hex-decoded to become
//! the next stage's key. No session state and no network round trip; the
//! timestamp/nonce pair bounds replay exposure.

use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use url::Url;

use crate::errors::SyncError;

type HmacSha256 = Hmac<Sha256>;

const AUTH_SCHEME: &str = "VERACODE-HMAC-SHA-256";
const REQUEST_VERSION: &str = "vcode_request_version_1";
const NONCE_SIZE: usize = 16;

/// Compute the authorization header value for one outbound request.
///
/// `api_id` and `api_key` may carry a non-secret prefix segment; only the
/// substring after the last `-` is the usable credential.
pub fn auth_header(
    api_id: &str,
    api_key: &str,
    http_method: &str,
    request_url: &str,
) -> Result<String, SyncError> {
    let date_stamp = Utc::now().timestamp_millis().to_string();
    let nonce = new_nonce();
    auth_header_at(api_id, api_key, http_method, request_url, &date_stamp, &nonce)
}

/// Derivation core with the timestamp and nonce token passed in, so tests
/// can freeze both and compare against a recorded header.
fn auth_header_at(
    api_id: &str,
    api_key: &str,
    http_method: &str,
    request_url: &str,
    date_stamp: &str,
    nonce_token: &str,
) -> Result<String, SyncError> {
    let id = strip_credential_prefix(api_id);
    let key = strip_credential_prefix(api_key);
    if id.is_empty() {
        return Err(SyncError::Config("Veracode API id is empty".to_string()));
    }
    if key.is_empty() {
        return Err(SyncError::Config("Veracode API key is empty".to_string()));
    }

    let data = canonical_data(id, http_method, request_url)?;
    let signature = calculate_data_signature(key, nonce_token, date_stamp, &data)?;

    // The nonce is represented two ways: the uppercase token itself feeds
    // the HMAC chain, while the header carries hex of the token's bytes.
    let nonce_param = hex::encode(nonce_token.as_bytes());
    Ok(format!(
        "{AUTH_SCHEME} id={id},ts={date_stamp},nonce={nonce_param},sig={signature}"
    ))
}

/// Canonical signed request data: id, host, path-and-query, method.
fn canonical_data(id: &str, http_method: &str, request_url: &str) -> Result<String, SyncError> {
    let url = Url::parse(request_url)?;
    let host = url
        .host_str()
        .ok_or_else(|| SyncError::Config(format!("request URL has no host: {request_url}")))?;
    let path = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    Ok(format!(
        "id={id}&host={host}&url={path}&method={http_method}"
    ))
}

/// The 4-stage hash chain over nonce, timestamp, version string, and data.
fn calculate_data_signature(
    api_key: &str,
    nonce_token: &str,
    date_stamp: &str,
    data: &str,
) -> Result<String, SyncError> {
    let k_nonce = hmac_hex(api_key, nonce_token)?;
    let k_date = hmac_hex(&k_nonce, date_stamp)?;
    let k_sig = hmac_hex(&k_date, REQUEST_VERSION)?;
    hmac_hex(&k_sig, data)
}

/// HMAC-SHA256 with a hex-encoded key, returning a hex-encoded digest.
fn hmac_hex(key_hex: &str, message: &str) -> Result<String, SyncError> {
    let key = hex::decode(key_hex)
        .map_err(|_| SyncError::Config("Veracode API key is not valid hex".to_string()))?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|err| SyncError::Config(format!("HMAC key rejected: {err}")))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// 16 random bytes rendered as a 32-char uppercase hex token.
fn new_nonce() -> String {
    let mut bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes).to_uppercase()
}

/// Credentials may carry a non-secret `prefix-` segment; only the part
/// after the last `-` is used.
fn strip_credential_prefix(input: &str) -> &str {
    input.rsplit('-').next().unwrap_or(input)
}
