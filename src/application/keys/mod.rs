//! API key lifecycle

pub mod service;

pub use service::{CreatedApiKey, KeyManager, UsageSummary, MAX_KEY_NAME_LEN};
