//! Modular chat-bot host
//!
//! Discovers module directories, loads their commands, events, translations,
//! models and routes, and serves them through a chat client.

pub mod application;
pub mod builtin;
pub mod domain;
pub mod infrastructure;
