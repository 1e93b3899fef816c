//! Event handling - argument normalization and inbound parsing

pub mod event_args;
pub mod parser;

pub use event_args::EventArgs;
pub use parser::{Inbound, MessageParser, INTERACTION_CREATE, MESSAGE_CREATE};
