//! Text-to-speech forwarding and the development placeholder.

pub mod fallback;
pub mod forwarder;

pub use fallback::{placeholder_audio, PLACEHOLDER_CONTENT_TYPE};
pub use forwarder::{
    AudioStream, SpeakForwarder, SpeakOutcome, SpeakRequest, SpeakResponse, DEFAULT_CONTENT_TYPE,
};
