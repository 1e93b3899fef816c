use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use crate::application::errors::EventError;
use crate::application::messaging::EventArgs;

/// A handler subscribed to one chat-client event.
///
/// The emitter event name is `name()` with only its first character
/// lower-cased (`InteractionCreate` subscribes to `interactionCreate`).
#[async_trait]
pub trait Event: Send + Sync {
    fn name(&self) -> &str;

    /// Unsubscribe after the first delivery
    fn once(&self) -> bool {
        false
    }

    /// Keep the event registered but never subscribe it
    fn disabled(&self) -> bool {
        false
    }

    async fn execute(&self, args: EventArgs) -> Result<(), EventError>;
}

/// Registry key for an event.
pub fn event_key(event: &dyn Event) -> String {
    event.name().to_lowercase()
}

/// Name under which an event handler is subscribed on the emitter.
pub fn emitter_event_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Interaction subtypes that are promoted to the `interaction` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Command,
    SelectMenu,
}

/// A raw argument delivered by the chat client to an event callback.
pub trait EventValue: Any + Send + Sync {
    /// Constructed type name, e.g. `Guild` or `CommandInteraction`
    fn type_name(&self) -> &str;

    fn interaction_kind(&self) -> Option<InteractionKind> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a raw event argument.
pub type EventArg = Arc<dyn EventValue>;
