use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::entities::EventArg;

/// Future returned by a subscribed event handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback receiving the raw, positional event arguments
pub type EventHandler = Arc<dyn Fn(Vec<EventArg>) -> HandlerFuture + Send + Sync>;

/// Chat client boundary - event subscription plus replies
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Subscribe for every emission of `event`
    fn on(&self, event: &str, handler: EventHandler);

    /// Subscribe for the next emission of `event` only
    fn once(&self, event: &str, handler: EventHandler);

    /// Send a text message to a channel
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), BotError>;
}
