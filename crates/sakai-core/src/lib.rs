//! Business logic and provider trait definitions for Sakai.
//!
//! This crate composes system instructions and relays model streams to
//! consumers. It depends only on `sakai-types` -- never on `sakai-infra` or
//! any HTTP crate; hosted model backends plug in through
//! [`llm::provider::GenerativeModel`].

pub mod chat;
pub mod llm;
pub mod prompt;
