//! Request middleware.

pub mod auth;

pub use auth::{Session, auth_middleware};
