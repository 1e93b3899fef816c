//! Domain traits - Abstractions for external collaborators

pub mod client;

pub use client::{ChatClient, EventHandler, HandlerFuture};
