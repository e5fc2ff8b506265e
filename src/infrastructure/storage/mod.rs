//! Non-database key store backends

pub mod memory;

pub use memory::InMemoryApiKeyRepository;
