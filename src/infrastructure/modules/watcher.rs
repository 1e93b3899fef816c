//! Command hot reload
//!
//! Development-only. A notify watcher feeds filesystem events into a channel
//! drained by one task, so reloads run strictly in delivery order and the
//! last event for a file always wins.

use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::catalog::ArtifactCatalog;
use super::loader::{self, ARTIFACT_EXTENSIONS};
use super::registry::Registry;
use crate::application::errors::FrameworkError;
use crate::domain::entities::{command_key, Command};

/// A filesystem change relevant to reloading
#[derive(Debug)]
pub enum WatchEvent {
    Add(PathBuf),
    Change(PathBuf),
    Remove(PathBuf),
    Error(notify::Error),
}

impl WatchEvent {
    /// Translate one raw notify callback into reload events
    pub fn from_notify(res: notify::Result<notify::Event>) -> Vec<WatchEvent> {
        let event = match res {
            Ok(event) => event,
            Err(e) => return vec![WatchEvent::Error(e)],
        };

        match event.kind {
            EventKind::Create(_) => event.paths.into_iter().map(WatchEvent::Add).collect(),
            EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                event.paths.into_iter().map(WatchEvent::Remove).collect()
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                event.paths.into_iter().map(WatchEvent::Add).collect()
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                let mut paths = event.paths.into_iter();
                let mut events = Vec::new();
                if let Some(from) = paths.next() {
                    events.push(WatchEvent::Remove(from));
                }
                events.extend(paths.map(WatchEvent::Add));
                events
            }
            EventKind::Modify(_) => event.paths.into_iter().map(WatchEvent::Change).collect(),
            EventKind::Remove(_) => event.paths.into_iter().map(WatchEvent::Remove).collect(),
            _ => Vec::new(),
        }
    }
}

/// Reloads command manifests into one or more command registries
pub struct CommandReloader {
    module: String,
    catalog: Arc<ArtifactCatalog>,
    targets: Vec<Arc<Registry<dyn Command>>>,
}

impl CommandReloader {
    pub fn new(
        module: impl Into<String>,
        catalog: Arc<ArtifactCatalog>,
        targets: Vec<Arc<Registry<dyn Command>>>,
    ) -> Self {
        Self {
            module: module.into(),
            catalog,
            targets,
        }
    }

    /// Apply one event. Returns the key that was (re)registered, if any.
    ///
    /// Errors are logged and never stop the caller's loop.
    pub async fn handle(&self, event: WatchEvent) -> Option<String> {
        let (path, created) = match event {
            WatchEvent::Add(path) => (path, true),
            WatchEvent::Change(path) => (path, false),
            WatchEvent::Remove(path) => {
                if loader::matches_filter(&path, ARTIFACT_EXTENSIONS) {
                    tracing::debug!(
                        module = %self.module,
                        file = %path.display(),
                        "Command file removed, it stays registered until restart"
                    );
                }
                return None;
            }
            WatchEvent::Error(e) => {
                tracing::error!(module = %self.module, "Error watching commands: {}", e);
                return None;
            }
        };

        if !loader::matches_filter(&path, ARTIFACT_EXTENSIONS) {
            return None;
        }

        let label = loader::file_label(&path);
        let catalog = &self.catalog;
        match loader::load_artifact(&path, |export| catalog.command(export)).await {
            Ok(command) => {
                let key = command_key(command.as_ref());
                for target in &self.targets {
                    target.upsert(key.clone(), Arc::clone(&command));
                }
                if created {
                    tracing::debug!(module = %self.module, key = %key, "Command {} loaded", label);
                } else {
                    tracing::debug!(module = %self.module, key = %key, "Command {} reloaded", label);
                }
                Some(key)
            }
            Err(e) => {
                tracing::error!(
                    module = %self.module,
                    file = %path.display(),
                    "Error {} command {}: {}",
                    if created { "loading" } else { "reloading" },
                    label,
                    e
                );
                None
            }
        }
    }
}

/// Background watcher over one module's `commands/` directory.
///
/// Runs until dropped.
pub struct CommandWatcher {
    directory: PathBuf,
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl CommandWatcher {
    pub fn spawn(directory: &Path, reloader: CommandReloader) -> Result<Self, FrameworkError> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                for event in WatchEvent::from_notify(res) {
                    let _ = tx.send(event);
                }
            },
            notify::Config::default(),
        )?;
        watcher.watch(directory, RecursiveMode::Recursive)?;

        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                reloader.handle(event).await;
            }
        });

        tracing::info!(dir = %directory.display(), "Watching commands for changes");

        Ok(Self {
            directory: directory.to_path_buf(),
            _watcher: watcher,
            task,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Drop for CommandWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
