//! Upstream entity definitions.
//!
//! Read models decode the upstream's loose wire format; input models carry
//! validation for what this service forwards.

pub mod dashboard;
pub mod script;
pub mod share;
pub mod user;

pub use dashboard::DashboardCounters;
pub use script::{Exchange, PricePoint, Script, ScriptInput};
pub use share::{NamedRef, ShareListFilter, ShareListItem};
pub use user::{User, UserInput};
