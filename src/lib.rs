#![forbid(unsafe_code)]

//! `ai-cli-bridge` — detects, installs, and drives AI assistant CLI tools,
//! relaying their output as an ordered stream of text fragments.

pub mod bridge;
pub mod config;
pub mod errors;
pub mod installer;
pub mod models;
pub mod platform;
pub mod probe;
pub mod session;
pub mod shell;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
