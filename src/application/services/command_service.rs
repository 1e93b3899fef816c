use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::framework::FrameworkContext;
use crate::domain::entities::command::matches;
use crate::domain::entities::{Command, CommandContext, CommandInteraction};

/// Resolves and runs commands from the global registry
pub struct CommandService {
    context: FrameworkContext,
}

impl CommandService {
    pub fn new(context: FrameworkContext) -> Self {
        Self { context }
    }

    /// Find a command by name or alias, case-insensitively
    pub fn find(&self, input: &str) -> Option<Arc<dyn Command>> {
        let commands = &self.context.registries().commands;
        if let Some(command) = commands.get(&input.to_lowercase()) {
            return Some(command);
        }

        let snapshot = commands.snapshot();
        let mut keys: Vec<&String> = snapshot.keys().collect();
        keys.sort();
        keys.into_iter()
            .filter_map(|k| snapshot.get(k))
            .find(|c| matches(c.as_ref(), input))
            .cloned()
    }

    pub async fn handle(&self, interaction: &CommandInteraction) -> Result<String, CommandError> {
        let command = self
            .find(&interaction.command_name)
            .ok_or_else(|| CommandError::NotFound(interaction.command_name.clone()))?;

        let language = interaction
            .user
            .as_ref()
            .and_then(|u| u.locale.clone())
            .unwrap_or_else(|| self.context.settings().bot.default_language.clone());

        let ctx = CommandContext::new(self.context.clone(), interaction.channel_id.clone())
            .with_args(interaction.args.clone())
            .with_user(interaction.user.clone())
            .with_language(language);

        tracing::debug!(command = command.name(), args = ?interaction.args, "Executing command");
        command.execute(&ctx).await
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        let prefix = &self.context.settings().bot.prefix;

        if let Some(name) = command {
            if let Some(cmd) = self.find(name) {
                let mut help = format!("{}{} - {}", prefix, cmd.name(), cmd.description().unwrap_or("No description"));
                if let Some(usage) = cmd.usage() {
                    help.push_str(&format!("\nUsage: {}", usage));
                }
                if !cmd.aliases().is_empty() {
                    help.push_str(&format!("\nAliases: {}", cmd.aliases().join(", ")));
                }
                return help;
            }
            return format!("Command {}{} not found", prefix, name);
        }

        // List all commands
        let snapshot = self.context.registries().commands.snapshot();
        let mut keys: Vec<&String> = snapshot.keys().collect();
        keys.sort();

        let mut help = "Available commands:\n".to_string();
        for cmd in keys.into_iter().filter_map(|k| snapshot.get(k)) {
            help.push_str(&format!("  {}{} - {}\n", prefix, cmd.name(), cmd.description().unwrap_or("")));
        }
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::framework::tests::test_context;
    use async_trait::async_trait;

    struct Ban;

    #[async_trait]
    impl Command for Ban {
        fn name(&self) -> &str {
            "Ban"
        }

        fn description(&self) -> Option<&str> {
            Some("Ban a member")
        }

        fn aliases(&self) -> &[&str] {
            &["b"]
        }

        async fn execute(&self, ctx: &CommandContext) -> Result<String, CommandError> {
            match ctx.args.first() {
                Some(who) => Ok(format!("banned {}", who)),
                None => Err(CommandError::InvalidArgs("missing member".to_string())),
            }
        }
    }

    fn service() -> CommandService {
        let ctx = test_context();
        ctx.registries().commands.upsert("ban", Arc::new(Ban));
        CommandService::new(ctx)
    }

    #[test]
    fn test_find_by_name_and_alias() {
        let service = service();
        assert!(service.find("BAN").is_some());
        assert!(service.find("b").is_some());
        assert!(service.find("kick").is_none());
    }

    #[tokio::test]
    async fn test_handle() {
        let service = service();
        let interaction = CommandInteraction::new("c1", "ban", vec!["alice".to_string()]);
        assert_eq!(service.handle(&interaction).await.unwrap(), "banned alice");

        let missing = CommandInteraction::new("c1", "kick", vec![]);
        assert!(matches!(service.handle(&missing).await, Err(CommandError::NotFound(n)) if n == "kick"));
    }

    #[test]
    fn test_help() {
        let service = service();
        assert!(service.get_help(None).contains("/Ban - Ban a member"));
        assert!(service.get_help(Some("b")).contains("Aliases: b"));
        assert_eq!(service.get_help(Some("kick")), "Command /kick not found");
    }
}
