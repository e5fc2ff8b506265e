//! API key administration: create, list, enable and disable

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
