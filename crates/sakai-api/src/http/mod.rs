//! HTTP layer for Sakai.
//!
//! Axum-based API at `/api/v1/` exposing the chat relay as Server-Sent
//! Events, with an envelope format for errors and CORS support.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
