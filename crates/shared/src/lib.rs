//! Shared types, errors, and configuration for ShareDesk.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for users, scripts and share transactions
//! - Pagination types for list endpoints
//! - Money rounding and display helpers
//! - Authentication payloads exchanged with the upstream API
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::{AccessToken, LoginRequest, LoginResponse, ResetPasswordRequest};
pub use config::{AppConfig, DisplayConfig, LogConfig, ServerConfig, UpstreamConfig};
pub use error::AppError;
