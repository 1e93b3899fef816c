//! Application layer - Host orchestration and services
//!
//! This layer contains:
//! - Framework: Module discovery and registry merging
//! - Services: Command dispatch and translations
//! - Errors: Domain-specific errors
//! - Messaging: Event argument normalization and inbound parsing

pub mod errors;
pub mod framework;
pub mod services;
pub mod messaging;
