//! Interactive terminal chat for Sakai.
//!
//! Streams replies through the chat relay with a thinking spinner, renders
//! the final markdown, and keeps the conversation in memory. Entry points:
//! `loop_runner::run_chat_loop` and `loop_runner::run_once`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
