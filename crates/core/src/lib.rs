//! Core types and shared functionality for mcp-spider.
//!
//! This crate provides:
//! - Unified error types mapped to MCP error codes
//! - Layered application configuration

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
