//! Command hot reload integration tests
//! Run with: cargo test --test hot_reload

mod common;

use std::sync::Arc;
use std::time::Duration;

use bot_host::domain::entities::{Command, CommandContext};
use bot_host::infrastructure::modules::{CommandReloader, CommandWatcher, Module, Registry, WatchEvent};
use common::{manifest, write_file};

fn registries() -> (Arc<Registry<dyn Command>>, Arc<Registry<dyn Command>>) {
    (Arc::new(Registry::new("commands")), Arc::new(Registry::new("commands")))
}

#[tokio::test]
async fn test_change_replaces_only_the_reloaded_key() {
    common::ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("commands");
    write_file(&commands, "ping.yaml", &manifest("Ping"));
    write_file(&commands, "help.yaml", &manifest("Help"));

    let (module, global) = registries();
    let catalog = Arc::new(common::catalog());
    let reloader = CommandReloader::new("core", catalog, vec![Arc::clone(&module), Arc::clone(&global)]);

    reloader.handle(WatchEvent::Add(commands.join("ping.yaml"))).await;
    reloader.handle(WatchEvent::Add(commands.join("help.yaml"))).await;
    let help_before = module.get("help").unwrap();
    assert_eq!(module.len(), 2);

    write_file(&commands, "ping.yaml", &manifest("LoudPing"));
    let key = reloader.handle(WatchEvent::Change(commands.join("ping.yaml"))).await;
    assert_eq!(key.as_deref(), Some("ping"));

    assert_eq!(module.len(), 2);
    assert_eq!(global.len(), 2);
    assert!(Arc::ptr_eq(&help_before, &module.get("help").unwrap()));

    let (_client, context) = common::context(common::settings_for(dir.path()));
    let ctx = CommandContext::new(context, "c1");
    let reply = global.get("ping").unwrap().execute(&ctx).await.unwrap();
    assert_eq!(reply, "PONG!");
}

#[tokio::test]
async fn test_broken_reload_keeps_previous_command() {
    common::ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("commands");
    write_file(&commands, "ping.yaml", &manifest("Ping"));

    let (module, global) = registries();
    let reloader = CommandReloader::new("core", Arc::new(common::catalog()), vec![Arc::clone(&module), global]);
    reloader.handle(WatchEvent::Add(commands.join("ping.yaml"))).await;
    let before = module.get("ping").unwrap();

    write_file(&commands, "ping.yaml", "export: [not, a, symbol\n");
    assert!(reloader.handle(WatchEvent::Change(commands.join("ping.yaml"))).await.is_none());
    assert!(Arc::ptr_eq(&before, &module.get("ping").unwrap()));
}

#[tokio::test]
async fn test_remove_keeps_registration() {
    common::ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("commands");
    write_file(&commands, "ping.yaml", &manifest("Ping"));

    let (module, global) = registries();
    let reloader = CommandReloader::new("core", Arc::new(common::catalog()), vec![Arc::clone(&module), global]);
    reloader.handle(WatchEvent::Add(commands.join("ping.yaml"))).await;

    std::fs::remove_file(commands.join("ping.yaml")).unwrap();
    assert!(reloader.handle(WatchEvent::Remove(commands.join("ping.yaml"))).await.is_none());
    assert!(module.contains_key("ping"));
}

#[tokio::test]
async fn test_non_manifest_files_are_ignored() {
    common::ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("commands");
    write_file(&commands, "notes.md", "# notes");

    let (module, global) = registries();
    let reloader = CommandReloader::new("core", Arc::new(common::catalog()), vec![Arc::clone(&module), global]);
    assert!(reloader.handle(WatchEvent::Add(commands.join("notes.md"))).await.is_none());
    assert!(module.is_empty());
}

#[tokio::test]
async fn test_development_mode_watches_commands() {
    common::ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("core");
    write_file(&root, "commands/ping.yaml", &manifest("Ping"));

    let mut settings = common::settings_for(dir.path());
    settings.development = true;
    let (_client, context) = common::context(settings);
    let global = Arc::clone(&context.registries().commands);

    let mut module = Module::new(&root, Arc::new(common::catalog()), context);
    let report = module.register_commands().await;
    assert!(report.is_clean());
    assert!(module.is_watching());

    write_file(&root, "commands/version.yaml", &manifest("Version"));

    for _ in 0..100 {
        if global.contains_key("version") && module.commands().contains_key("version") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(global.contains_key("version"));
    assert_eq!(module.commands().keys(), vec!["ping", "version"]);
}

#[tokio::test]
async fn test_watcher_off_outside_development() {
    common::ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("core");
    write_file(&root, "commands/ping.yaml", &manifest("Ping"));

    let (_client, context) = common::context(common::settings_for(dir.path()));
    let mut module = Module::new(&root, Arc::new(common::catalog()), context);
    module.register_commands().await;

    assert!(!module.is_watching());
}

/// Uses the OS file watcher, timing depends on the platform
#[tokio::test]
#[ignore]
async fn test_watcher_picks_up_new_command() {
    common::ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("commands");
    std::fs::create_dir_all(&commands).unwrap();

    let (module, global) = registries();
    let reloader = CommandReloader::new("core", Arc::new(common::catalog()), vec![Arc::clone(&module), global]);
    let watcher = CommandWatcher::spawn(&commands, reloader).unwrap();
    assert_eq!(watcher.directory(), commands.as_path());

    write_file(&commands, "ping.yaml", &manifest("Ping"));

    for _ in 0..50 {
        if module.contains_key("ping") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(module.contains_key("ping"));
}
