//! Command implementations

pub mod action;
pub mod config;
pub mod credentials;
pub mod deploy;
pub mod prompt;
pub mod providers;
pub mod status;
