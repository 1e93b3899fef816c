//! Console client for development/testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{BotInfo, EventArg, User};
use crate::domain::traits::{ChatClient, EventHandler};

pub const CONSOLE_CHANNEL: &str = "console";

struct Subscription {
    handler: EventHandler,
    once: bool,
}

/// In-process chat client: stores subscriptions and prints replies
pub struct ConsoleClient {
    info: BotInfo,
    handlers: Mutex<HashMap<String, Vec<Subscription>>>,
    sent: Mutex<Vec<(String, String)>>,
    echo: bool,
}

impl ConsoleClient {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "bot-host".to_string(),
                username: "console".to_string(),
            },
            handlers: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            echo: true,
        }
    }

    /// Keep replies in memory only
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }

    /// Deliver `args` to every handler subscribed to `event`.
    ///
    /// Handlers run one after another; `once` handlers are dropped before
    /// they run. Returns the number of handlers invoked.
    pub async fn emit(&self, event: &str, args: Vec<EventArg>) -> usize {
        let handlers: Vec<EventHandler> = {
            let mut subscriptions = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(list) = subscriptions.get_mut(event) else {
                return 0;
            };
            let handlers = list.iter().map(|s| Arc::clone(&s.handler)).collect();
            list.retain(|s| !s.once);
            handlers
        };

        for handler in &handlers {
            handler(args.clone()).await;
        }
        handlers.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Replies sent so far as `(channel, text)`
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn subscribe(&self, event: &str, handler: EventHandler, once: bool) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.to_string())
            .or_default()
            .push(Subscription { handler, once });
    }
}

impl Default for ConsoleClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for ConsoleClient {
    fn on(&self, event: &str, handler: EventHandler) {
        self.subscribe(event, handler, false);
    }

    fn once(&self, event: &str, handler: EventHandler) {
        self.subscribe(event, handler, true);
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), BotError> {
        if self.echo {
            println!("[BOT] {}", text);
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// Read stdin line by line and emit each line as a client event until EOF
pub async fn run_console(client: Arc<ConsoleClient>, prefix: &str) -> Result<(), BotError> {
    let info = client.bot_info();
    client.emit("ready", vec![Arc::new(info.clone())]).await;
    tracing::info!("Console client started: @{}", info.username);

    let parser = MessageParser::new(prefix);
    let user = User::new("console-user").with_username("you");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(BotError::Network(format!("Failed to read stdin: {}", e))),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let inbound = parser.parse(CONSOLE_CHANNEL, input, Some(user.clone()));
        if client.emit(inbound.event, inbound.args).await == 0 {
            tracing::debug!(event = inbound.event, "No handler subscribed");
        }
    }

    tracing::info!("Console input closed");
    Ok(())
}
