use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use bot_host::application::framework::Framework;
use bot_host::builtin;
use bot_host::infrastructure::adapters::{run_console, ConsoleClient};
use bot_host::infrastructure::config::{debug_enabled, FrameworkSettings};

#[derive(Parser)]
#[command(name = "bot-host")]
#[command(about = "A modular chat bot host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Modules directory (overrides config)
    #[arg(short, long)]
    modules: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console client
    Run,
    /// Load every module and print what it registered
    List,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    let level = if debug_enabled() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let settings = load_settings(&cli.config, cli.modules);
            block_on(run_bot(settings));
        }
        Commands::List => {
            let settings = load_settings(&cli.config, cli.modules);
            block_on(list_modules(settings));
        }
        Commands::Version => {
            println!("bot-host v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn block_on<F: std::future::Future<Output = ()>>(future: F) {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => tracing::error!("Failed to start runtime: {}", e),
    }
}

fn load_settings(config_path: &str, modules_override: Option<PathBuf>) -> FrameworkSettings {
    let settings = if std::path::Path::new(config_path).exists() {
        FrameworkSettings::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            FrameworkSettings::default()
        })
    } else {
        FrameworkSettings::default()
    };

    let mut settings = settings.apply_env();
    if let Some(dir) = modules_override {
        settings.modules.directory = dir;
    }
    settings
}

async fn run_bot(settings: FrameworkSettings) {
    tracing::info!("Starting {}", settings.bot.name);
    let prefix = settings.bot.prefix.clone();

    let client = Arc::new(ConsoleClient::new());
    let mut framework = Framework::new(settings, builtin::catalog(), client.clone());
    match framework.initialize().await {
        Ok(report) if !report.is_clean() => {
            tracing::warn!("{} artifact(s) failed to load", report.failures.len());
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Failed to initialize modules: {}", e);
            return;
        }
    }

    tokio::select! {
        result = run_console(client, &prefix) => {
            if let Err(e) = result {
                tracing::error!("Console client stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }
}

async fn list_modules(settings: FrameworkSettings) {
    let client = Arc::new(ConsoleClient::new().quiet());
    let mut framework = Framework::new(settings, builtin::catalog(), client);
    let report = match framework.initialize().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Failed to initialize modules: {}", e);
            return;
        }
    };

    for module in framework.modules() {
        println!("{}", module.name());
        println!("  commands: {}", module.commands().keys().join(", "));
        println!("  events:   {}", module.events().keys().join(", "));
        println!("  models:   {}", module.models().keys().join(", "));
        println!("  routes:   {}", module.routes().keys().join(", "));
    }
    println!("translations: {} key(s)", framework.translations().len());

    for failure in &report.failures {
        println!("failed: {}/{} ({})", failure.module, failure.file_name, failure.error);
    }
}

fn init_config() {
    match serde_yaml::to_string(&FrameworkSettings::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to render config: {}", e),
    }
}
