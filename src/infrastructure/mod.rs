//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Settings loading
//! - Modules: Discovery, loading and hot reload of module directories
//! - Adapters: Chat client implementations (console)

pub mod config;
pub mod modules;
pub mod adapters;
