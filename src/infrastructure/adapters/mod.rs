//! Chat client adapters

pub mod console;

pub use console::{run_console, ConsoleClient};
