//! Dashboard counters.

use serde::{Deserialize, Serialize};

use crate::wire;

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounters {
    /// Number of users.
    #[serde(default, deserialize_with = "wire::count")]
    pub users: u64,
    /// Number of scripts.
    #[serde(default, deserialize_with = "wire::count")]
    pub scripts: u64,
    /// Number of share transactions.
    #[serde(
        default,
        rename(deserialize = "shareData"),
        alias = "share_data",
        deserialize_with = "wire::count"
    )]
    pub share_data: u64,
}
