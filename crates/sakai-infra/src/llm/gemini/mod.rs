//! Google Gemini provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`GenerativeModel`](sakai_core::llm::provider::GenerativeModel) trait for
//! the Gemini REST API, including SSE streaming.

pub mod client;
pub mod streaming;
pub mod types;

pub use client::GeminiProvider;
