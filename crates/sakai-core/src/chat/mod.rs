//! Chat orchestration: history normalization, the streaming relay and
//! title generation.

pub mod failure;
pub mod mime;
pub mod normalize;
pub mod relay;
pub mod sink;
pub mod title;

pub use relay::{ChatRelay, ChunkStream};
