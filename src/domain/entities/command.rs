use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::application::framework::FrameworkContext;
use crate::domain::entities::User;

/// A chat command contributed by a module.
///
/// The registry key is `name()` lower-cased, so renaming the implementing
/// type never changes how the command is addressed.
#[async_trait]
pub trait Command: Send + Sync {
    /// Declared identifier of the command
    fn name(&self) -> &str;

    /// Short human-readable description
    fn description(&self) -> Option<&str> {
        None
    }

    /// Alternative names that also resolve to this command
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Usage hint shown by help listings
    fn usage(&self) -> Option<&str> {
        None
    }

    /// Run the command and produce the reply text
    async fn execute(&self, ctx: &CommandContext) -> Result<String, CommandError>;
}

/// Registry key for a command.
pub fn command_key(command: &dyn Command) -> String {
    command.name().to_lowercase()
}

/// Check whether `input` names the command or one of its aliases.
pub fn matches(command: &dyn Command, input: &str) -> bool {
    let input_lower = input.to_lowercase();
    command.name().to_lowercase() == input_lower
        || command.aliases().iter().any(|a| a.to_lowercase() == input_lower)
}

/// Everything a command sees while it runs.
#[derive(Clone)]
pub struct CommandContext {
    pub framework: FrameworkContext,
    pub channel_id: String,
    pub user: Option<User>,
    pub args: Vec<String>,
    pub language: String,
}

impl CommandContext {
    pub fn new(framework: FrameworkContext, channel_id: impl Into<String>) -> Self {
        let language = framework.settings().bot.default_language.clone();
        Self {
            framework,
            channel_id: channel_id.into(),
            user: None,
            args: Vec::new(),
            language,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_user(mut self, user: Option<User>) -> Self {
        self.user = user;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Translate `key` in the caller's language
    pub fn t(&self, key: &str) -> Option<String> {
        self.framework.translations().get(key, &self.language)
    }
}
