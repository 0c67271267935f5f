use async_trait::async_trait;
use tokio_postgres::Client;

use crate::db;
use crate::error::StoreError;
use crate::models::TelemetrySubmission;

/// Destination for accepted submissions. Implementations assign the record id
/// and insertion time themselves.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    async fn insert(&self, submission: &TelemetrySubmission) -> Result<(), StoreError>;
}

pub struct PostgresTelemetryStore {
    client: Client,
}

impl PostgresTelemetryStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TelemetryStore for PostgresTelemetryStore {
    async fn insert(&self, submission: &TelemetrySubmission) -> Result<(), StoreError> {
        if self.client.is_closed() {
            return Err(StoreError::Closed);
        }
        let rows = db::insert_telemetry(&self.client, submission).await?;
        tracing::debug!(rows, "telemetry row inserted");
        Ok(())
    }
}
