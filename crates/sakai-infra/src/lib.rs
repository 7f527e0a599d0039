//! Infrastructure layer for Sakai.
//!
//! Contains the Gemini implementation of the `GenerativeModel` trait defined
//! in `sakai-core`, the `config.toml` loader and API key resolution.

pub mod config;
pub mod llm;
pub mod secret;
