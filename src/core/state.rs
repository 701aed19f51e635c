use crate::core::query::total_tickets;
use crate::core::seed::seed_dataset;
use crate::domain::model::{DataSource, Dataset, LoadSummary};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DATA_KEY: &str = "raffle-data";
pub const LAST_UPDATED_KEY: &str = "raffle-last-updated";
pub const SHEET_URL_KEY: &str = "raffle-sheet-url";
pub const DATA_SOURCE_KEY: &str = "raffle-data-source";

/// Today's date the way the summary line shows it, e.g. `10/15/2026`.
pub fn today() -> String {
    chrono::Local::now().format("%-m/%-d/%Y").to_string()
}

/// Typed access to the persisted slots. Every value is stored as JSON.
#[derive(Debug, Clone)]
pub struct AppState<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).await
    }

    /// Current dataset, or the seed dataset on first run.
    pub async fn dataset(&self) -> Result<Dataset> {
        Ok(self.read(DATA_KEY).await?.unwrap_or_else(seed_dataset))
    }

    pub async fn last_updated(&self) -> Result<String> {
        Ok(self.read(LAST_UPDATED_KEY).await?.unwrap_or_else(today))
    }

    pub async fn sheet_url(&self) -> Result<Option<String>> {
        self.read(SHEET_URL_KEY).await
    }

    pub async fn set_sheet_url(&self, url: &str) -> Result<()> {
        self.write(SHEET_URL_KEY, url).await
    }

    pub async fn data_source(&self) -> Result<DataSource> {
        Ok(self.read(DATA_SOURCE_KEY).await?.unwrap_or_default())
    }

    /// Swaps in a new dataset wholesale and stamps it with today's date.
    pub async fn replace_dataset(&self, dataset: &Dataset, source: DataSource) -> Result<LoadSummary> {
        let last_updated = today();

        self.write(DATA_KEY, dataset).await?;
        self.write(LAST_UPDATED_KEY, &last_updated).await?;
        self.write(DATA_SOURCE_KEY, &source).await?;

        tracing::debug!(
            "Stored {} entries from {} as the current dataset",
            dataset.len(),
            source
        );

        Ok(LoadSummary {
            tickets: total_tickets(&dataset.entries),
            sellers: dataset.len(),
            source,
            last_updated,
        })
    }

    /// Back to the bundled seed dataset. The connected sheet URL is kept.
    pub async fn reset(&self) -> Result<LoadSummary> {
        self.replace_dataset(&seed_dataset(), DataSource::Default).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::ingest::parse_csv;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    pub(crate) struct MemoryStore {
        slots: Arc<Mutex<HashMap<String, String>>>,
    }

    impl MemoryStore {
        pub(crate) async fn raw(&self, key: &str) -> Option<String> {
            self.slots.lock().await.get(key).cloned()
        }
    }

    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.slots.lock().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.slots
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_defaults_on_first_run() {
        let state = AppState::new(MemoryStore::default());

        assert_eq!(state.dataset().await.unwrap(), seed_dataset());
        assert_eq!(state.data_source().await.unwrap(), DataSource::Default);
        assert_eq!(state.sheet_url().await.unwrap(), None);
        assert_eq!(state.last_updated().await.unwrap(), today());
    }

    #[tokio::test]
    async fn test_replace_dataset_writes_all_slots() {
        let store = MemoryStore::default();
        let state = AppState::new(store.clone());
        let dataset = parse_csv("Ticket Number,Seller\n1,Lee\n2,Lee\n").unwrap();

        let summary = state
            .replace_dataset(&dataset, DataSource::File)
            .await
            .unwrap();

        assert_eq!(summary.tickets, 2);
        assert_eq!(summary.sellers, 1);
        assert_eq!(summary.message(), "Loaded 2 tickets from 1 sellers");
        assert_eq!(state.dataset().await.unwrap(), dataset);
        assert_eq!(state.data_source().await.unwrap(), DataSource::File);
        assert_eq!(store.raw(DATA_SOURCE_KEY).await.as_deref(), Some("\"file\""));
    }

    #[tokio::test]
    async fn test_reset_keeps_sheet_url() {
        let state = AppState::new(MemoryStore::default());
        state.set_sheet_url("https://example.com/pub?output=csv").await.unwrap();
        let dataset = parse_csv("Ticket Number,Seller\n1,Lee\n").unwrap();
        state.replace_dataset(&dataset, DataSource::Sheet).await.unwrap();

        state.reset().await.unwrap();

        assert_eq!(state.dataset().await.unwrap(), seed_dataset());
        assert_eq!(state.data_source().await.unwrap(), DataSource::Default);
        assert_eq!(
            state.sheet_url().await.unwrap().as_deref(),
            Some("https://example.com/pub?output=csv")
        );
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_an_error() {
        let store = MemoryStore::default();
        store.set(DATA_KEY, "{not json").await.unwrap();
        let state = AppState::new(store);

        assert!(state.dataset().await.is_err());
    }
}
