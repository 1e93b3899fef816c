//! Event argument normalization
//!
//! Chat clients deliver callback arguments positionally, and their order and
//! types depend on the event. Handlers instead receive an [`EventArgs`] bag
//! keyed by each argument's lower-cased type name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::framework::FrameworkContext;
use crate::domain::entities::EventArg;
use crate::domain::traits::ChatClient;

pub const FRAMEWORK_KEY: &str = "framework";
pub const CLIENT_KEY: &str = "client";
pub const INTERACTION_KEY: &str = "interaction";

/// Named view over one event invocation's arguments
#[derive(Clone)]
pub struct EventArgs {
    framework: FrameworkContext,
    client: Arc<dyn ChatClient>,
    values: HashMap<String, EventArg>,
    interaction: Option<EventArg>,
}

impl EventArgs {
    /// Build the bag for one invocation.
    ///
    /// Later arguments with the same type name replace earlier ones. The first
    /// command or select-menu interaction is also exposed as `interaction`.
    pub fn normalize(args: &[EventArg], framework: &FrameworkContext) -> Self {
        let mut values = HashMap::with_capacity(args.len());
        for arg in args {
            values.insert(arg.type_name().to_lowercase(), Arc::clone(arg));
        }

        let interaction = args
            .iter()
            .find(|arg| arg.interaction_kind().is_some())
            .cloned();

        Self {
            framework: framework.clone(),
            client: Arc::clone(framework.client()),
            values,
            interaction,
        }
    }

    pub fn framework(&self) -> &FrameworkContext {
        &self.framework
    }

    pub fn client(&self) -> &Arc<dyn ChatClient> {
        &self.client
    }

    pub fn interaction(&self) -> Option<&EventArg> {
        self.interaction.as_ref()
    }

    /// Interaction downcast to a concrete type
    pub fn interaction_as<T: 'static>(&self) -> Option<&T> {
        self.interaction.as_ref()?.as_any().downcast_ref::<T>()
    }

    /// Argument by lower-cased type name. `interaction` resolves to the
    /// promoted interaction first.
    pub fn get(&self, key: &str) -> Option<&EventArg> {
        match key {
            INTERACTION_KEY => self.interaction.as_ref().or_else(|| self.values.get(key)),
            other => self.values.get(other),
        }
    }

    /// Argument by lower-cased type name, downcast to a concrete type
    pub fn get_as<T: 'static>(&self, key: &str) -> Option<&T> {
        self.get(key)?.as_any().downcast_ref::<T>()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match key {
            FRAMEWORK_KEY | CLIENT_KEY => true,
            INTERACTION_KEY => self.interaction.is_some() || self.values.contains_key(key),
            other => self.values.contains_key(other),
        }
    }

    /// Every key present in the bag, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.push(FRAMEWORK_KEY.to_string());
        keys.push(CLIENT_KEY.to_string());
        if self.interaction.is_some() {
            keys.push(INTERACTION_KEY.to_string());
        }
        keys.sort();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::framework::tests::test_context;
    use crate::domain::entities::{CommandInteraction, EventValue, Message, SelectMenuInteraction};
    use std::any::Any;

    struct Guild {
        id: String,
    }

    impl EventValue for Guild {
        fn type_name(&self) -> &str {
            "Guild"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_guild_and_interaction() {
        let ctx = test_context();
        let guild: EventArg = Arc::new(Guild { id: "g1".to_string() });
        let interaction: EventArg = Arc::new(CommandInteraction::new("c1", "ping", vec![]));

        let args = EventArgs::normalize(&[guild, Arc::clone(&interaction)], &ctx);

        assert_eq!(
            args.keys(),
            vec!["client", "commandinteraction", "framework", "guild", "interaction"]
        );
        let promoted = args.interaction().unwrap();
        assert!(Arc::ptr_eq(promoted, &interaction));
        assert_eq!(args.get_as::<Guild>("guild").map(|g| g.id.as_str()), Some("g1"));
        assert_eq!(
            args.interaction_as::<CommandInteraction>().map(|i| i.command_name.as_str()),
            Some("ping")
        );
    }

    #[test]
    fn test_interaction_key_resolves_to_promoted_value() {
        let ctx = test_context();
        let interaction: EventArg = Arc::new(CommandInteraction::new("c1", "ping", vec![]));

        let args = EventArgs::normalize(&[Arc::clone(&interaction)], &ctx);

        assert!(args.contains_key("interaction"));
        assert!(Arc::ptr_eq(args.get("interaction").unwrap(), &interaction));
        assert!(Arc::ptr_eq(args.get("commandinteraction").unwrap(), &interaction));
        assert_eq!(
            args.get_as::<CommandInteraction>("interaction").map(|i| i.command_name.as_str()),
            Some("ping")
        );
    }

    #[test]
    fn test_promoted_interaction_overrides_same_named_argument() {
        struct Interaction;

        impl EventValue for Interaction {
            fn type_name(&self) -> &str {
                "Interaction"
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let ctx = test_context();
        let plain: EventArg = Arc::new(Interaction);
        let command: EventArg = Arc::new(CommandInteraction::new("c1", "ping", vec![]));

        let args = EventArgs::normalize(&[plain, Arc::clone(&command)], &ctx);
        assert!(Arc::ptr_eq(args.get("interaction").unwrap(), &command));
    }

    #[test]
    fn test_no_interaction() {
        let ctx = test_context();
        let message: EventArg = Arc::new(Message::new("c1", "hello"));

        let args = EventArgs::normalize(&[message], &ctx);

        assert!(args.interaction().is_none());
        assert!(!args.contains_key("interaction"));
        assert!(args.contains_key("message"));
        assert!(args.contains_key("framework"));
        assert!(args.contains_key("client"));
    }

    #[test]
    fn test_first_interaction_wins() {
        let ctx = test_context();
        let menu: EventArg = Arc::new(SelectMenuInteraction::new("c1", "settings.language", vec![]));
        let command: EventArg = Arc::new(CommandInteraction::new("c1", "ping", vec![]));

        let args = EventArgs::normalize(&[Arc::clone(&menu), command], &ctx);

        assert!(Arc::ptr_eq(args.interaction().unwrap(), &menu));
        assert!(args.interaction_as::<SelectMenuInteraction>().is_some());
    }

    #[test]
    fn test_same_type_last_argument_wins() {
        let ctx = test_context();
        let old: EventArg = Arc::new(Message::new("c1", "old"));
        let new: EventArg = Arc::new(Message::new("c1", "new"));

        let args = EventArgs::normalize(&[old, new], &ctx);

        assert_eq!(args.get_as::<Message>("message").map(|m| m.text.as_str()), Some("new"));
    }
}
