//! Database entities module

pub mod api_key;

pub use api_key::Entity as ApiKeyEntity;
