//! Host - discovers module directories and merges their registries

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::application::errors::FrameworkError;
use crate::application::services::TranslationManager;
use crate::domain::entities::{Command, Event, RouteFn};
use crate::domain::traits::ChatClient;
use crate::infrastructure::config::FrameworkSettings;
use crate::infrastructure::modules::{loader, ArtifactCatalog, LoadReport, Module, Registries, Registry};

/// Shared back-reference handed to modules, events and commands
#[derive(Clone)]
pub struct FrameworkContext {
    settings: Arc<FrameworkSettings>,
    translations: Arc<TranslationManager>,
    registries: Arc<Registries>,
    client: Arc<dyn ChatClient>,
}

impl FrameworkContext {
    pub fn new(settings: FrameworkSettings, client: Arc<dyn ChatClient>) -> Self {
        let translations = TranslationManager::new(settings.bot.default_language.clone());
        Self {
            settings: Arc::new(settings),
            translations: Arc::new(translations),
            registries: Arc::new(Registries::new()),
            client,
        }
    }

    pub fn settings(&self) -> &FrameworkSettings {
        &self.settings
    }

    pub fn translations(&self) -> &TranslationManager {
        &self.translations
    }

    /// Global registries
    pub fn registries(&self) -> &Arc<Registries> {
        &self.registries
    }

    pub fn client(&self) -> &Arc<dyn ChatClient> {
        &self.client
    }
}

/// The module host
pub struct Framework {
    context: FrameworkContext,
    catalog: Arc<ArtifactCatalog>,
    modules: Vec<Module>,
}

impl Framework {
    pub fn new(settings: FrameworkSettings, catalog: ArtifactCatalog, client: Arc<dyn ChatClient>) -> Self {
        Self {
            context: FrameworkContext::new(settings, client),
            catalog: Arc::new(catalog),
            modules: Vec::new(),
        }
    }

    /// Discover, initialize and merge every module.
    ///
    /// Modules initialize concurrently; merging happens afterwards in module
    /// name order so collisions resolve the same way on every start.
    pub async fn initialize(&mut self) -> Result<LoadReport, FrameworkError> {
        let directory = self.context.settings().modules.directory.clone();
        let roots = discover_modules(&directory).await?;
        tracing::info!(dir = %directory.display(), count = roots.len(), "Discovered modules");

        let mut tasks = JoinSet::new();
        for root in roots {
            let mut module = Module::new(root, Arc::clone(&self.catalog), self.context.clone());
            tasks.spawn(async move {
                let report = module.initialize().await;
                (module, report)
            });
        }

        let mut report = LoadReport::default();
        let mut modules = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((module, module_report)) => {
                    report.absorb(module_report);
                    modules.push(module);
                }
                Err(e) => tracing::error!("Module initialization task failed: {}", e),
            }
        }

        modules.sort_by(|a, b| a.name().cmp(b.name()));
        for module in &modules {
            let collisions = self.context.registries().merge_from(module.registries(), module.name());
            if collisions > 0 {
                tracing::warn!(module = module.name(), collisions, "Module overrides existing entries");
            }
        }
        self.modules.extend(modules);

        tracing::info!(
            modules = self.modules.len(),
            commands = self.commands().len(),
            events = self.context.registries().events.len(),
            models = self.context.registries().models.len(),
            routes = self.context.registries().routes.len(),
            translations = self.context.translations().len(),
            failures = report.failures.len(),
            "Framework initialized"
        );
        Ok(report)
    }

    pub fn context(&self) -> &FrameworkContext {
        &self.context
    }

    pub fn catalog(&self) -> &ArtifactCatalog {
        &self.catalog
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name() == name)
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(Module::name).collect()
    }

    pub fn commands(&self) -> &Arc<Registry<dyn Command>> {
        &self.context.registries().commands
    }

    pub fn events(&self) -> &Arc<Registry<dyn Event>> {
        &self.context.registries().events
    }

    pub fn models(&self) -> &Arc<Registry<serde_json::Value>> {
        &self.context.registries().models
    }

    pub fn routes(&self) -> &Arc<Registry<RouteFn>> {
        &self.context.registries().routes
    }

    pub fn translations(&self) -> &TranslationManager {
        self.context.translations()
    }
}

/// Visible sub-directories of `dir`, sorted. A missing directory holds no modules.
pub async fn discover_modules(dir: &Path) -> Result<Vec<PathBuf>, FrameworkError> {
    if !dir.is_dir() {
        tracing::warn!("Modules directory does not exist: {}", dir.display());
        return Ok(Vec::new());
    }

    let entries = loader::list_dir(dir).await?;
    Ok(entries.into_iter().filter(|e| e.is_dir).map(|e| e.path).collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::errors::BotError;
    use crate::domain::traits::EventHandler;
    use async_trait::async_trait;

    pub(crate) struct NullClient;

    #[async_trait]
    impl ChatClient for NullClient {
        fn on(&self, _event: &str, _handler: EventHandler) {}

        fn once(&self, _event: &str, _handler: EventHandler) {}

        async fn send_message(&self, _channel_id: &str, _text: &str) -> Result<(), BotError> {
            Ok(())
        }
    }

    pub(crate) fn test_context() -> FrameworkContext {
        FrameworkContext::new(FrameworkSettings::default(), Arc::new(NullClient))
    }

    #[tokio::test]
    async fn test_discover_skips_files_and_hidden() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("core")).unwrap();
        std::fs::create_dir(dir.path().join("admin")).unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();

        let roots = discover_modules(dir.path()).await.unwrap();
        let names: Vec<_> = roots.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, vec!["admin", "core"]);
    }

    #[tokio::test]
    async fn test_missing_modules_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = FrameworkSettings::default();
        settings.modules.directory = dir.path().join("missing");

        let mut framework = Framework::new(settings, ArtifactCatalog::new(), Arc::new(NullClient));
        let report = framework.initialize().await.unwrap();

        assert!(report.is_clean());
        assert!(framework.modules().is_empty());
        assert!(framework.commands().is_empty());
    }
}
