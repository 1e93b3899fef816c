//! Module system
//!
//! A module is a directory bundling commands, events, translations, models
//! and routes. Commands, events and routers are declared by YAML manifests
//! naming an export from the [`ArtifactCatalog`]; translations and models are
//! plain JSON.

pub mod catalog;
pub mod loader;
pub mod manifest;
pub mod module;
pub mod registry;
pub mod translations;
pub mod watcher;

pub use catalog::{ArtifactCatalog, Export};
pub use loader::{LoadFailure, LoadReport, LoadResult};
pub use manifest::ArtifactManifest;
pub use module::{Module, ModuleState};
pub use registry::{Registries, Registry};
pub use watcher::{CommandReloader, CommandWatcher, WatchEvent};
