//! Shared utilities for stockbot
//!
//! This crate provides common functionality used across the stockbot workspace:
//! tracing setup and typed environment variable lookups.

pub mod config;
pub mod logging;

pub use config::{EnvError, env_or, env_parse, env_required};
pub use logging::{LogFormat, init_tracing};
