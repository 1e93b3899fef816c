//! User-initiated interactions delivered by the chat client

use chrono::{DateTime, Utc};
use std::any::Any;

use super::event::{EventValue, InteractionKind};
use super::User;

/// A command invocation, e.g. `/ping` or a slash command
#[derive(Debug, Clone)]
pub struct CommandInteraction {
    pub id: String,
    pub channel_id: String,
    pub user: Option<User>,
    pub command_name: String,
    pub args: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CommandInteraction {
    pub fn new(channel_id: impl Into<String>, command_name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            user: None,
            command_name: command_name.into(),
            args,
            created_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user: Option<User>) -> Self {
        self.user = user;
        self
    }
}

impl EventValue for CommandInteraction {
    fn type_name(&self) -> &str {
        "CommandInteraction"
    }

    fn interaction_kind(&self) -> Option<InteractionKind> {
        Some(InteractionKind::Command)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A selection made in a select menu component
#[derive(Debug, Clone)]
pub struct SelectMenuInteraction {
    pub id: String,
    pub channel_id: String,
    pub user: Option<User>,
    /// Dotted component id, e.g. `settings.language`
    pub custom_id: String,
    pub values: Vec<String>,
}

impl SelectMenuInteraction {
    pub fn new(channel_id: impl Into<String>, custom_id: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            user: None,
            custom_id: custom_id.into(),
            values,
        }
    }

    /// Segments of the component id
    pub fn path(&self) -> Vec<&str> {
        self.custom_id.split('.').collect()
    }
}

impl EventValue for SelectMenuInteraction {
    fn type_name(&self) -> &str {
        "SelectMenuInteraction"
    }

    fn interaction_kind(&self) -> Option<InteractionKind> {
        Some(InteractionKind::SelectMenu)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
