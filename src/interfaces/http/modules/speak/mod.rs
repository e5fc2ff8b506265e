//! `/speak`: key-gated forwarding to the upstream TTS endpoint

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
