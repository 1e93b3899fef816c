//! A single module directory and its load phases

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::catalog::ArtifactCatalog;
use super::loader::{self, LoadReport, LoadResult, ARTIFACT_EXTENSIONS, JSON_EXTENSIONS};
use super::registry::{Registries, Registry};
use super::translations;
use super::watcher::{CommandReloader, CommandWatcher};
use crate::application::errors::ArtifactError;
use crate::application::framework::FrameworkContext;
use crate::application::messaging::EventArgs;
use crate::domain::entities::{command_key, emitter_event_name, event_key, Command, Event, EventArg, RouteFn};
use crate::domain::traits::{EventHandler, HandlerFuture};

pub const COMMANDS_DIR: &str = "commands";
pub const EVENTS_DIR: &str = "events";
pub const CLIENT_EVENTS_DIR: &str = "discord";
pub const MODELS_DIR: &str = "models";
pub const ROUTES_DIR: &str = "routes";

/// Initialization progress. Phases always run in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModuleState {
    Uninitialized,
    CommandsLoaded,
    EventsLoaded,
    TranslationsLoaded,
    ModelsLoaded,
    Ready,
}

/// One discovered module directory
pub struct Module {
    name: String,
    root: PathBuf,
    catalog: Arc<ArtifactCatalog>,
    context: FrameworkContext,
    registries: Registries,
    state: ModuleState,
    watcher: Option<CommandWatcher>,
}

impl Module {
    pub fn new(root: impl Into<PathBuf>, catalog: Arc<ArtifactCatalog>, context: FrameworkContext) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        Self {
            name,
            root,
            catalog,
            context,
            registries: Registries::new(),
            state: ModuleState::Uninitialized,
            watcher: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn context(&self) -> &FrameworkContext {
        &self.context
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn commands(&self) -> &Arc<Registry<dyn Command>> {
        &self.registries.commands
    }

    pub fn events(&self) -> &Arc<Registry<dyn Event>> {
        &self.registries.events
    }

    pub fn models(&self) -> &Arc<Registry<serde_json::Value>> {
        &self.registries.models
    }

    pub fn routes(&self) -> &Arc<Registry<RouteFn>> {
        &self.registries.routes
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Run every phase in order.
    ///
    /// Failed artifacts are logged and collected in the returned report; they
    /// never stop a phase or the phases after it.
    pub async fn initialize(&mut self) -> LoadReport {
        let mut report = LoadReport::default();

        report.absorb(self.register_commands().await);
        self.state = ModuleState::CommandsLoaded;

        report.absorb(self.register_events().await);
        self.state = ModuleState::EventsLoaded;

        report.absorb(self.register_translations().await);
        self.state = ModuleState::TranslationsLoaded;

        report.absorb(self.register_models().await);
        self.state = ModuleState::ModelsLoaded;

        report.absorb(self.register_routes().await);
        self.state = ModuleState::Ready;

        tracing::info!(
            module = %self.name,
            commands = self.registries.commands.len(),
            events = self.registries.events.len(),
            models = self.registries.models.len(),
            routes = self.registries.routes.len(),
            failures = report.failures.len(),
            "Module initialized"
        );
        report.for_module(&self.name)
    }

    /// Load `commands/*` and, in development, start watching the directory
    pub async fn register_commands(&mut self) -> LoadReport {
        let dir = self.root.join(COMMANDS_DIR);
        let mut report = LoadReport::default();
        if !dir.is_dir() {
            return report;
        }

        let catalog = Arc::clone(&self.catalog);
        let results = loader::load_artifacts(&dir, ARTIFACT_EXTENSIONS, |export| catalog.command(export)).await;
        for result in results {
            match result {
                LoadResult::Success { artifact, .. } => {
                    let key = command_key(artifact.as_ref());
                    self.registries.commands.upsert(key.clone(), artifact);
                    report.loaded.push(key);
                }
                LoadResult::Failure { file_name, error } => {
                    tracing::error!(
                        module = %self.name,
                        file = %file_name,
                        "Error loading {} command: {}",
                        loader::file_label(Path::new(&file_name)),
                        error
                    );
                    report.record_failure(file_name, error);
                }
            }
        }

        if self.context.settings().is_development() && self.watcher.is_none() {
            let reloader = CommandReloader::new(
                self.name.clone(),
                Arc::clone(&self.catalog),
                vec![
                    Arc::clone(&self.registries.commands),
                    Arc::clone(&self.context.registries().commands),
                ],
            );
            match CommandWatcher::spawn(&dir, reloader) {
                Ok(watcher) => self.watcher = Some(watcher),
                Err(e) => tracing::error!(module = %self.name, "Failed to watch commands: {}", e),
            }
        }

        report
    }

    /// Load `events/discord/*` and subscribe them on the chat client
    pub async fn register_events(&mut self) -> LoadReport {
        let dir = self.root.join(EVENTS_DIR).join(CLIENT_EVENTS_DIR);
        let mut report = LoadReport::default();

        let catalog = Arc::clone(&self.catalog);
        let results = loader::load_artifacts(&dir, ARTIFACT_EXTENSIONS, |export| catalog.event(export)).await;
        for result in results {
            match result {
                LoadResult::Success { artifact, .. } => {
                    let key = event_key(artifact.as_ref());
                    self.registries.events.upsert(key.clone(), Arc::clone(&artifact));
                    self.subscribe(artifact);
                    report.loaded.push(key);
                }
                LoadResult::Failure { file_name, error } => {
                    tracing::error!(
                        module = %self.name,
                        file = %file_name,
                        "Error loading {} event: {}",
                        loader::file_label(Path::new(&file_name)),
                        error
                    );
                    report.record_failure(file_name, error);
                }
            }
        }
        report
    }

    fn subscribe(&self, event: Arc<dyn Event>) {
        if event.disabled() {
            tracing::debug!(module = %self.name, event = event.name(), "Event disabled, not subscribing");
            return;
        }

        let event_name = emitter_event_name(event.name());
        let once = event.once();
        let context = self.context.clone();
        let module = self.name.clone();

        let handler: EventHandler = Arc::new(move |args: Vec<EventArg>| -> HandlerFuture {
            let event = Arc::clone(&event);
            let module = module.clone();
            let bag = Module::parse_event_args(&args, &context);
            Box::pin(async move {
                if let Err(e) = event.execute(bag).await {
                    tracing::error!(module = %module, event = event.name(), "Event handler failed: {}", e);
                }
            })
        });

        let client = self.context.client();
        if once {
            client.once(&event_name, handler);
        } else {
            client.on(&event_name, handler);
        }
        tracing::debug!(module = %self.name, event = %event_name, once, "Event subscribed");
    }

    /// Named view over positional callback arguments
    pub fn parse_event_args(args: &[EventArg], context: &FrameworkContext) -> EventArgs {
        EventArgs::normalize(args, context)
    }

    /// Load `translations/**/<lang>.json` into the shared store
    pub async fn register_translations(&self) -> LoadReport {
        translations::build_translations(&self.root, self.context.translations(), &self.name).await
    }

    /// Load `models/*.json` verbatim under their capitalised file stem
    pub async fn register_models(&self) -> LoadReport {
        let dir = self.root.join(MODELS_DIR);
        let mut report = LoadReport::default();

        let entries = match loader::list_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(module = %self.name, "Failed to read models directory: {}", e);
                return report;
            }
        };

        for entry in entries {
            if entry.is_dir || !loader::matches_filter(&entry.path, JSON_EXTENSIONS) {
                continue;
            }

            let model_name = model_name(&loader::file_label(&entry.path));
            match loader::read_json(&entry.path).await {
                Ok(definition) => {
                    self.registries.models.upsert(model_name.clone(), Arc::new(definition));
                    report.loaded.push(model_name);
                }
                Err(error) => {
                    tracing::error!(module = %self.name, file = %entry.name, "Error loading model {}: {}", model_name, error);
                    report.record_failure(entry.name, error);
                }
            }
        }
        report
    }

    /// Load `routes/**` routers and merge their route maps
    pub async fn register_routes(&self) -> LoadReport {
        let base = self.root.join(ROUTES_DIR);
        let mut report = LoadReport::default();

        for file in loader::walk_files(&base, ARTIFACT_EXTENSIONS).await {
            let relative = file.relative_name();
            match self.load_router(&file.entry.path, route_base_path(&file.segments)).await {
                Ok(keys) => report.loaded.extend(keys),
                Err(error @ ArtifactError::Mismatch { .. }) => {
                    tracing::warn!(
                        module = %self.name,
                        file = %relative,
                        "{} is not a valid router: {}",
                        relative,
                        error
                    );
                    report.record_failure(relative, error);
                }
                Err(error) => {
                    tracing::error!(module = %self.name, file = %relative, "Error loading router: {}", error);
                    report.record_failure(relative, error);
                }
            }
        }
        report
    }

    async fn load_router(&self, path: &Path, base_path: String) -> Result<Vec<String>, ArtifactError> {
        let manifest = super::manifest::ArtifactManifest::from_file(path).await?;
        let export = manifest.export()?;

        let router = self.catalog.router(export, base_path)?;

        let mut keys = Vec::new();
        for (key, handler) in router.routes() {
            self.registries.routes.upsert(key.clone(), handler);
            keys.push(key);
        }
        Ok(keys)
    }
}

/// `user` becomes `User`
pub fn model_name(stem: &str) -> String {
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Empty at the routes root, `/a/b` for `routes/a/b`
pub fn route_base_path(segments: &[String]) -> String {
    if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    }
}
