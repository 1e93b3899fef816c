//! Application services

pub mod command_service;
pub mod translations;

pub use command_service::CommandService;
pub use translations::TranslationManager;
