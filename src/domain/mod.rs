//! Domain layer - Artifact contracts and chat objects
//!
//! This layer contains:
//! - Entities: Commands, events, routers and the values delivered to them
//! - Traits: Abstractions for the chat client

pub mod entities;
pub mod traits;
