//! Client for the upstream ShareDesk API.
//!
//! This crate provides:
//! - `ApiClient`, a thin `reqwest` wrapper carrying the base URL and bearer token
//! - Entity definitions matching the upstream wire format
//! - One repository per upstream resource
//!
//! `ShareRepository` implements the core `LedgerStore` trait.

pub mod client;
pub mod entities;
pub mod error;
pub mod repositories;
mod wire;

pub use client::ApiClient;
pub use error::ClientError;
pub use repositories::{
    AuthRepository, DashboardRepository, ScriptRepository, ShareRepository, UserRepository,
};
