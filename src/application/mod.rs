pub mod admin_gate;
pub mod keys;
pub mod speak;

// Re-export key types for convenience
pub use admin_gate::AdminGate;
pub use keys::{CreatedApiKey, KeyManager, UsageSummary, MAX_KEY_NAME_LEN};
pub use speak::{SpeakForwarder, SpeakOutcome, SpeakRequest, SpeakResponse};
