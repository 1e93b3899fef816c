//! Built-in artifacts - commands, events and routers shipped with the binary
//!
//! Module manifests refer to these by their export symbol.

pub mod commands;
pub mod events;
pub mod routes;

use crate::infrastructure::modules::ArtifactCatalog;

/// Catalog of every built-in export
pub fn catalog() -> ArtifactCatalog {
    ArtifactCatalog::new()
        .with_command("Ping", commands::ping)
        .with_command("Help", commands::help)
        .with_command("Version", commands::version)
        .with_event("Ready", events::ready)
        .with_event("InteractionCreate", events::interaction_create)
        .with_router("HealthRouter", routes::health)
}
