//! API key generation and hashing

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::shared::{GatewayError, GatewayResult};

type HmacSha256 = Hmac<Sha256>;

/// API key prefix for identification
pub const API_KEY_PREFIX: &str = "otts_";

/// Random bytes per key (hex-encoded to 64 chars)
const KEY_BYTES: usize = 32;

/// Result of API key generation
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full API key (only shown once!)
    pub plaintext: String,
    /// Non-secret prefix for display, e.g. `otts_1a2b3c4d...`
    pub display_prefix: String,
}

/// Generate a new API key: `otts_<64 hex chars>`
pub fn generate_api_key() -> GeneratedApiKey {
    let mut random_bytes = [0u8; KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut random_bytes);
    let random_hex = hex::encode(random_bytes);

    GeneratedApiKey {
        plaintext: format!("{}{}", API_KEY_PREFIX, random_hex),
        display_prefix: format!("{}{}...", API_KEY_PREFIX, &random_hex[..8]),
    }
}

/// Check if a string looks like an API key
pub fn is_api_key_format(s: &str) -> bool {
    s.len() == API_KEY_PREFIX.len() + KEY_BYTES * 2
        && s.starts_with(API_KEY_PREFIX)
        && s[API_KEY_PREFIX.len()..]
            .bytes()
            .all(|b| b.is_ascii_hexdigit())
}

/// Peppered HMAC-SHA256 hasher for API keys.
///
/// The HMAC key is the server secret; the message is `plaintext || pepper`.
#[derive(Clone)]
pub struct KeyHasher {
    secret: Vec<u8>,
    pepper: String,
}

impl KeyHasher {
    pub fn new(secret: &str, pepper: &str) -> GatewayResult<Self> {
        if secret.is_empty() {
            return Err(GatewayError::Config("SECRET_KEY is not set".to_string()));
        }
        if pepper.is_empty() {
            return Err(GatewayError::Config("KEY_PEPPER is not set".to_string()));
        }
        Ok(Self {
            secret: secret.as_bytes().to_vec(),
            pepper: pepper.to_string(),
        })
    }

    /// Hex-encoded hash of `plaintext`
    pub fn hash(&self, plaintext: &str) -> GatewayResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| GatewayError::Config(format!("Failed to create HMAC: {}", e)))?;
        mac.update(plaintext.as_bytes());
        mac.update(self.pepper.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Compares two strings in constant time to prevent timing attacks
pub fn constant_time_equal(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
