use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::CommandService;
use crate::domain::entities::{Command, CommandContext};

/// Ping command
pub struct PingCommand;

#[async_trait]
impl Command for PingCommand {
    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> Option<&str> {
        Some("Check if the bot is alive")
    }

    async fn execute(&self, ctx: &CommandContext) -> Result<String, CommandError> {
        Ok(ctx.t("ping.reply").unwrap_or_else(|| "Pong!".to_string()))
    }
}

/// Help command
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> Option<&str> {
        Some("Show available commands")
    }

    fn aliases(&self) -> &[&str] {
        &["h", "?"]
    }

    fn usage(&self) -> Option<&str> {
        Some("help [command]")
    }

    async fn execute(&self, ctx: &CommandContext) -> Result<String, CommandError> {
        let service = CommandService::new(ctx.framework.clone());
        Ok(service.get_help(ctx.args.first().map(String::as_str)))
    }
}

/// Version command
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    fn name(&self) -> &str {
        "version"
    }

    fn description(&self) -> Option<&str> {
        Some("Show bot version")
    }

    async fn execute(&self, ctx: &CommandContext) -> Result<String, CommandError> {
        Ok(format!("{} v{}", ctx.framework.settings().bot.name, env!("CARGO_PKG_VERSION")))
    }
}

pub fn ping() -> Arc<dyn Command> {
    Arc::new(PingCommand)
}

pub fn help() -> Arc<dyn Command> {
    Arc::new(HelpCommand)
}

pub fn version() -> Arc<dyn Command> {
    Arc::new(VersionCommand)
}
