//! HTTP REST API interfaces
//!
//! - `middleware`: API key and admin bearer checks
//! - `modules`: handlers and DTOs per resource
//! - `error`: `GatewayError` to JSON response mapping
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, GatewayState};
