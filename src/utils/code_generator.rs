//! Short code generation.
//!
//! Codes are 6 characters drawn uniformly from a 62-symbol alphanumeric alphabet
//! using the operating system CSPRNG.

use crate::error::AppError;
use serde_json::json;

/// Symbols a short code is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of characters in a generated code.
pub const CODE_LENGTH: usize = 6;

/// Codes that would be shadowed by fixed routes and are never handed out.
///
/// Only route names of exactly [`CODE_LENGTH`] characters can be generated.
pub const RESERVED_CODES: &[&str] = &["health"];

/// Largest multiple of the alphabet size that fits in a byte (4 * 62).
/// Bytes at or above it are rejected so every symbol stays equally likely.
const REJECTION_BOUND: u8 = 248;

/// Generates a cryptographically secure random short code.
///
/// Random bytes are read from `getrandom` in small batches; bytes that would bias
/// the modulo are discarded and more are drawn until the code is complete.
///
/// # Errors
///
/// Returns [`AppError::RandomSource`] if the system entropy source fails. The
/// failure is not retried here.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> Result<String, AppError> {
    let mut code = String::with_capacity(CODE_LENGTH);
    let mut buffer = [0u8; CODE_LENGTH * 2];

    while code.len() < CODE_LENGTH {
        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::random_source(
                "Failed to generate short code",
                json!({ "reason": e.to_string() }),
            )
        })?;

        for &byte in buffer.iter().filter(|&&b| b < REJECTION_BOUND) {
            code.push(ALPHABET[(byte % 62) as usize] as char);
            if code.len() == CODE_LENGTH {
                break;
            }
        }
    }

    Ok(code)
}

/// Returns `true` if `code` has the shape of a generated code.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}

/// Returns `true` if `code` collides with a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
