use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::{CommandError, EventError};
use crate::application::messaging::EventArgs;
use crate::application::services::CommandService;
use crate::domain::entities::{BotInfo, CommandInteraction, Event};

/// Logs the connected bot account once
pub struct ReadyEvent;

#[async_trait]
impl Event for ReadyEvent {
    fn name(&self) -> &str {
        "ready"
    }

    fn once(&self) -> bool {
        true
    }

    async fn execute(&self, args: EventArgs) -> Result<(), EventError> {
        match args.get_as::<BotInfo>("botinfo") {
            Some(info) => tracing::info!("Bot started: {} (@{})", info.name, info.username),
            None => tracing::info!("Bot started"),
        }
        Ok(())
    }
}

/// Runs the command named by a command interaction and replies in its channel
pub struct InteractionCreateEvent;

#[async_trait]
impl Event for InteractionCreateEvent {
    fn name(&self) -> &str {
        "InteractionCreate"
    }

    async fn execute(&self, args: EventArgs) -> Result<(), EventError> {
        let Some(interaction) = args.interaction_as::<CommandInteraction>() else {
            return Ok(());
        };

        let framework = args.framework();
        let service = CommandService::new(framework.clone());
        let reply = match service.handle(interaction).await {
            Ok(text) => text,
            Err(CommandError::NotFound(name)) => {
                let language = interaction
                    .user
                    .as_ref()
                    .and_then(|u| u.locale.as_deref())
                    .unwrap_or(framework.translations().default_language());
                framework
                    .translations()
                    .render("errors.commandNotFound", language, &[("command", name.as_str())])
            }
            Err(e) => {
                tracing::warn!(command = %interaction.command_name, "Command failed: {}", e);
                format!("Error: {}", e)
            }
        };

        args.client().send_message(&interaction.channel_id, &reply).await?;
        Ok(())
    }
}

pub fn ready() -> Arc<dyn Event> {
    Arc::new(ReadyEvent)
}

pub fn interaction_create() -> Arc<dyn Event> {
    Arc::new(InteractionCreateEvent)
}
