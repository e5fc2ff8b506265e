//! Cryptographic helpers

pub mod api_key;

pub use api_key::{
    constant_time_equal, generate_api_key, is_api_key_format, GeneratedApiKey, KeyHasher,
    API_KEY_PREFIX,
};
