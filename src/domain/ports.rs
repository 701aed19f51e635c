use crate::domain::model::{Dataset, LoadSummary};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persisted key-value slots. Missing keys read as `None`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn state_dir(&self) -> &str;
    fn sheet_url(&self) -> Option<&str>;
    fn proxies(&self) -> &[String];
    fn timeout_seconds(&self) -> u64;
    fn refresh_interval_secs(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Raw CSV text from the source.
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, csv_text: String) -> Result<Dataset>;
    async fn load(&self, dataset: Dataset) -> Result<LoadSummary>;
    /// Short description of where the data comes from, used in messages.
    fn origin(&self) -> String;
}
