//! Dashboard counters.

use crate::client::ApiClient;
use crate::entities::DashboardCounters;
use crate::error::ClientError;
use crate::wire::Envelope;

/// Dashboard queries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    client: ApiClient,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Counts users, scripts and share transactions.
    pub async fn counters(&self) -> Result<DashboardCounters, ClientError> {
        let envelope: Envelope<DashboardCounters> = self.client.post_empty("/user/dashboard").await?;
        Ok(envelope.into_inner())
    }
}
