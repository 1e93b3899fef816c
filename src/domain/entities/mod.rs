//! Domain entities - Artifact contracts and chat objects

pub mod artifact;
pub mod command;
pub mod event;
pub mod interaction;
pub mod message;
pub mod router;
pub mod user;

pub use artifact::ArtifactKind;
pub use command::{command_key, Command, CommandContext};
pub use event::{emitter_event_name, event_key, Event, EventArg, EventValue, InteractionKind};
pub use interaction::{CommandInteraction, SelectMenuInteraction};
pub use message::Message;
pub use router::{route_key, Request, Response, RouteFn, RouteHandler, Router};
pub use user::{BotInfo, User};
