//! Message parser - Turns raw console text into client events

use std::sync::Arc;

use crate::domain::entities::{CommandInteraction, EventArg, Message, User};

pub const MESSAGE_CREATE: &str = "messageCreate";
pub const INTERACTION_CREATE: &str = "interactionCreate";

/// An event ready to be emitted on the chat client
pub struct Inbound {
    pub event: &'static str,
    pub args: Vec<EventArg>,
}

/// Parses incoming text into client events
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Prefixed text becomes an `interactionCreate` carrying a
    /// [`CommandInteraction`]; anything else is a `messageCreate`.
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Inbound {
        let text = text.into();
        let chat_id = chat_id.into();

        if let Some(interaction) = self.parse_command(&chat_id, &text, sender.clone()) {
            return Inbound {
                event: INTERACTION_CREATE,
                args: vec![Arc::new(interaction)],
            };
        }

        let message = Message::new(chat_id, text)
            .with_platform("console")
            .with_sender_opt(sender);
        Inbound {
            event: MESSAGE_CREATE,
            args: vec![Arc::new(message)],
        }
    }

    /// Parse a command line, `None` when `text` is not a command
    pub fn parse_command(&self, chat_id: &str, text: &str, sender: Option<User>) -> Option<CommandInteraction> {
        let cmd_text = text.trim().strip_prefix(self.command_prefix.as_str())?;

        let mut parts = cmd_text.split_whitespace();
        let name = parts.next()?.to_string();
        let args = parts.map(str::to_string).collect();

        Some(CommandInteraction::new(chat_id, name, args).with_user(sender))
    }
}
