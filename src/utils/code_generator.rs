//! Short code generation.
//!
//! Codes are drawn from the OS CSPRNG. Each character is chosen uniformly
//! from a 62-symbol alphanumeric alphabet using rejection sampling, so no
//! symbol is favoured by modulo reduction.

/// Alphabet short codes are drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated codes.
pub const CODE_LENGTH: usize = 6;

/// Largest multiple of the alphabet size that fits in a byte.
///
/// Bytes at or above this value are rejected.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Generates a random short code of [`CODE_LENGTH`] characters.
///
/// # Errors
///
/// Returns an error if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> Result<String, getrandom::Error> {
    generate_code_with_len(CODE_LENGTH)
}

/// Generates a random short code of `len` characters.
pub fn generate_code_with_len(len: usize) -> Result<String, getrandom::Error> {
    let mut code = String::with_capacity(len);
    // ~3% of bytes are rejected; a 2x buffer almost always fills the code in one call.
    let mut buffer = vec![0u8; len * 2];

    while code.len() < len {
        getrandom::fill(&mut buffer)?;

        for &byte in &buffer {
            if byte >= ACCEPT_BELOW {
                continue;
            }
            code.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
            if code.len() == len {
                break;
            }
        }
    }

    Ok(code)
}

/// Codes that collide with fixed top-level routes and can never redirect.
pub const RESERVED_CODES: &[&str] = &["api", "health", "links"];

/// Returns true if `code` is taken by a fixed route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns true if `code` could have been produced by this generator family:
/// 1-10 characters from [`ALPHABET`].
pub fn is_valid_code(code: &str) -> bool {
    (1..=10).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
