//! Artifact catalog - explicit registration table for constructible artifacts
//!
//! Module directories only name what they want through their manifests; the
//! code behind each name is linked into the binary and registered here.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::ArtifactError;
use crate::domain::entities::{ArtifactKind, Command, Event, Router};

pub type CommandFactory = fn() -> Arc<dyn Command>;
pub type EventFactory = fn() -> Arc<dyn Event>;
pub type RouterFactory = fn(String) -> Arc<dyn Router>;

/// A registered, constructible artifact
#[derive(Clone, Copy)]
pub enum Export {
    Command(CommandFactory),
    Event(EventFactory),
    Router(RouterFactory),
}

impl Export {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Export::Command(_) => ArtifactKind::Command,
            Export::Event(_) => ArtifactKind::Event,
            Export::Router(_) => ArtifactKind::Router,
        }
    }
}

/// Export symbol to factory
#[derive(Clone, Default)]
pub struct ArtifactCatalog {
    exports: HashMap<String, Export>,
}

impl ArtifactCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, symbol: impl Into<String>, factory: CommandFactory) -> Self {
        self.register(symbol, Export::Command(factory));
        self
    }

    pub fn with_event(mut self, symbol: impl Into<String>, factory: EventFactory) -> Self {
        self.register(symbol, Export::Event(factory));
        self
    }

    pub fn with_router(mut self, symbol: impl Into<String>, factory: RouterFactory) -> Self {
        self.register(symbol, Export::Router(factory));
        self
    }

    /// Register an export, replacing any previous one under the same symbol
    pub fn register(&mut self, symbol: impl Into<String>, export: Export) -> Option<Export> {
        let symbol = symbol.into();
        let previous = self.exports.insert(symbol.clone(), export);
        if previous.is_some() {
            tracing::warn!(symbol = %symbol, "Export registered twice, keeping the latest");
        }
        previous
    }

    /// Merge another catalog into this one
    pub fn extend(&mut self, other: ArtifactCatalog) {
        for (symbol, export) in other.exports {
            self.register(symbol, export);
        }
    }

    pub fn resolve(&self, symbol: &str) -> Result<Export, ArtifactError> {
        self.exports
            .get(symbol)
            .copied()
            .ok_or_else(|| ArtifactError::UnknownExport(symbol.to_string()))
    }

    pub fn command(&self, symbol: &str) -> Result<Arc<dyn Command>, ArtifactError> {
        match self.resolve(symbol)? {
            Export::Command(factory) => Ok(factory()),
            other => Err(mismatch(symbol, ArtifactKind::Command, other)),
        }
    }

    pub fn event(&self, symbol: &str) -> Result<Arc<dyn Event>, ArtifactError> {
        match self.resolve(symbol)? {
            Export::Event(factory) => Ok(factory()),
            other => Err(mismatch(symbol, ArtifactKind::Event, other)),
        }
    }

    pub fn router(&self, symbol: &str, base_path: impl Into<String>) -> Result<Arc<dyn Router>, ArtifactError> {
        match self.resolve(symbol)? {
            Export::Router(factory) => Ok(factory(base_path.into())),
            other => Err(mismatch(symbol, ArtifactKind::Router, other)),
        }
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.exports.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

fn mismatch(symbol: &str, expected: ArtifactKind, found: Export) -> ArtifactError {
    ArtifactError::Mismatch {
        export: symbol.to_string(),
        expected,
        found: found.kind(),
    }
}
