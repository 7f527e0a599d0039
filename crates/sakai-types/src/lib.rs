//! Shared domain types for Sakai.
//!
//! This crate contains the types used across the workspace: conversation
//! history, stream chunks, personalities, generative model requests and
//! responses, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod message;
pub mod persona;
