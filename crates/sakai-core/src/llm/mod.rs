//! Generative model abstractions for Sakai.
//!
//! - `GenerativeModel`: RPITIT trait for concrete provider implementations
//! - `BoxGenerativeModel`: Object-safe wrapper for dynamic dispatch
//! - `StreamSession`: Partial-response stream plus the final aggregated response

pub mod box_provider;
pub mod provider;
pub mod session;
