//! Config-file-backed provider store

use async_trait::async_trait;
use gatehouse_application::ports::{ProviderError, ProviderStore};
use gatehouse_domain::ProviderRecord;

use crate::config::FileConfig;

/// Provider store backed by the loaded configuration file.
///
/// The record list is fixed at construction; reloading configuration
/// means building a new store.
pub struct ConfigProviderStore {
    records: Vec<ProviderRecord>,
}

impl ConfigProviderStore {
    pub fn new(config: &FileConfig) -> Self {
        Self {
            records: config.provider_records(),
        }
    }

    pub fn from_records(records: Vec<ProviderRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ProviderStore for ConfigProviderStore {
    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, ProviderError> {
        Ok(self.records.clone())
    }
}
