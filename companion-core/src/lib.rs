//! # companion-core
//!
//! Application plumbing shared by the binaries: [`CompanionError`], tracing
//! initialization, and [`AppConfig`] loaded from the environment.

pub mod config;
pub mod error;
pub mod logger;

pub use config::{AppConfig, StoreType, DEFAULT_DATABASE_URL, DEFAULT_LOG_FILE};
pub use error::{CompanionError, Result};
pub use logger::{init_console_tracing, init_tracing};
