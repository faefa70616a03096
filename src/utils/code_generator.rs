//! Short code generation and validation utilities.
//!
//! Codes are drawn from a 62-symbol alphanumeric alphabet using a
//! cryptographically secure byte source with rejection sampling, so every
//! symbol is equally likely. Custom user-provided codes are validated here
//! as well.

use crate::error::AppError;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// The 62-symbol code alphabet.
pub const CODE_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Rejection-sampling bound: 4 * 62. Bytes at or above this value would
/// bias the modulo reduction toward the low end of the alphabet.
const REJECTION_BOUND: u8 = 248;

/// Reserved codes that cannot be used as short links.
///
/// These collide with routing prefixes served by the HTTP layer.
const RESERVED_CODES: &[&str] = &["api", "health", "shorten", "links", "domains", "stats"];

/// Generates a random short code of the given length.
///
/// Each symbol is sampled independently: a random byte is drawn from the
/// OS CSPRNG and rejected if it falls outside `[0, 248)`, eliminating
/// modulo bias. If the random source fails, the symbol degrades to a
/// time-derived SHA-256 fallback; this is weaker and logged at WARN.
pub fn generate_code(length: usize) -> String {
    let mut code = String::with_capacity(length);
    for position in 0..length {
        code.push(random_symbol(position) as char);
    }
    code
}

fn random_symbol(position: usize) -> u8 {
    let mut byte = [0u8; 1];
    loop {
        if getrandom::fill(&mut byte).is_err() {
            tracing::warn!("Random source failed, using time-derived fallback symbol");
            return fallback_symbol(position);
        }
        if byte[0] < REJECTION_BOUND {
            return CODE_ALPHABET[(byte[0] % 62) as usize];
        }
    }
}

/// Degraded symbol source: SHA-256 of the current nanosecond timestamp.
///
/// Only reached when the OS random source errors, which on supported
/// platforms effectively never happens.
fn fallback_symbol(position: usize) -> u8 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let digest = Sha256::digest(format!("{}:{}", nanos, position).as_bytes());
    CODE_ALPHABET[(digest[0] % 62) as usize]
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: letters, digits, hyphens
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved system code
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < 4 || code.len() > 32 {
        return Err(AppError::bad_request(
            "Custom code must be 4-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, and hyphens",
            json!({ "code": code }),
        ));
    }

    if code.starts_with('-') || code.ends_with('-') {
        return Err(AppError::bad_request(
            "Custom code cannot start or end with a hyphen",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code.to_ascii_lowercase().as_str()) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
