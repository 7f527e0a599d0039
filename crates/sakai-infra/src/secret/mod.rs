//! API key resolution.

pub mod env;

pub use env::resolve_api_key;
