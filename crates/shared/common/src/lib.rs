//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling for HTTP handlers and the CLI
//! - Configuration structures loaded from the environment

pub mod config;
pub mod constants;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
