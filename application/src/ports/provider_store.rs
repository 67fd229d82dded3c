//! Provider configuration store port
//!
//! Supplies the configured provider records. Read-only from the
//! application layer's perspective; the file-backed adapter lives in
//! the infrastructure layer.

use async_trait::async_trait;
use gatehouse_domain::ProviderRecord;

use super::capability_client::ProviderError;

/// Port for reading configured capability providers.
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// All configured providers, enabled or not, in listing order.
    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, ProviderError>;

    /// Look up one provider by exact name.
    async fn get_provider(&self, name: &str) -> Result<ProviderRecord, ProviderError> {
        self.list_providers()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))
    }
}
