//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Once};

use bot_host::application::errors::CommandError;
use bot_host::application::framework::{Framework, FrameworkContext};
use bot_host::builtin;
use bot_host::domain::entities::{Command, CommandContext};
use bot_host::infrastructure::adapters::ConsoleClient;
use bot_host::infrastructure::config::FrameworkSettings;
use bot_host::infrastructure::modules::ArtifactCatalog;

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Write `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

pub fn manifest(export: &str) -> String {
    format!("export: {}\n", export)
}

/// Same declared name as the built-in ping, different reply
pub struct LoudPing;

#[async_trait]
impl Command for LoudPing {
    fn name(&self) -> &str {
        "ping"
    }

    async fn execute(&self, _ctx: &CommandContext) -> Result<String, CommandError> {
        Ok("PONG!".to_string())
    }
}

pub fn loud_ping() -> Arc<dyn Command> {
    Arc::new(LoudPing)
}

/// Built-in exports plus test-only ones
pub fn catalog() -> ArtifactCatalog {
    builtin::catalog().with_command("LoudPing", loud_ping)
}

pub fn settings_for(modules_dir: &Path) -> FrameworkSettings {
    let mut settings = FrameworkSettings::default();
    settings.modules.directory = modules_dir.to_path_buf();
    settings
}

pub fn context(settings: FrameworkSettings) -> (Arc<ConsoleClient>, FrameworkContext) {
    let client = Arc::new(ConsoleClient::new().quiet());
    let context = FrameworkContext::new(settings, client.clone());
    (client, context)
}

pub fn framework(modules_dir: &Path) -> (Arc<ConsoleClient>, Framework) {
    ensure_init();
    let client = Arc::new(ConsoleClient::new().quiet());
    let framework = Framework::new(settings_for(modules_dir), catalog(), client.clone());
    (client, framework)
}
