use crate::adapters::sheets::{normalize_sheet_url, SheetFetcher};
use crate::core::ingest::parse_csv;
use crate::core::state::AppState;
use crate::domain::model::{DataSource, Dataset, LoadSummary};
use crate::domain::ports::{ConfigProvider, KeyValueStore, Pipeline};
use crate::utils::error::Result;
use std::time::Duration;

/// Pulls a published Google Sheet and stores it as the new dataset.
pub struct SheetPipeline<S: KeyValueStore> {
    sheet_url: String,
    fetcher: SheetFetcher,
    state: AppState<S>,
}

impl<S: KeyValueStore> SheetPipeline<S> {
    pub fn new(sheet_url: impl Into<String>, fetcher: SheetFetcher, state: AppState<S>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            fetcher,
            state,
        }
    }

    pub fn from_config<C: ConfigProvider>(
        config: &C,
        sheet_url: impl Into<String>,
        state: AppState<S>,
    ) -> Self {
        let fetcher = SheetFetcher::new(
            config.proxies().to_vec(),
            Duration::from_secs(config.timeout_seconds()),
        );
        Self::new(sheet_url, fetcher, state)
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }
}

#[async_trait::async_trait]
impl<S: KeyValueStore> Pipeline for SheetPipeline<S> {
    async fn extract(&self) -> Result<String> {
        let export_url = normalize_sheet_url(&self.sheet_url)?;
        tracing::info!("🚀 Syncing sheet from {}", export_url);
        self.fetcher.fetch_csv(&export_url).await
    }

    async fn transform(&self, csv_text: String) -> Result<Dataset> {
        let dataset = parse_csv(&csv_text)?;
        tracing::info!("🔧 Parsed {} sellers from sheet", dataset.len());
        Ok(dataset)
    }

    async fn load(&self, dataset: Dataset) -> Result<LoadSummary> {
        let summary = self.state.replace_dataset(&dataset, DataSource::Sheet).await?;
        self.state.set_sheet_url(&self.sheet_url).await?;
        Ok(summary)
    }

    fn origin(&self) -> String {
        "the sheet - check that it has 'Ticket Number' and 'Seller' columns".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sheets::DIRECT;
    use crate::core::state::tests::MemoryStore;
    use crate::utils::error::RaffleError;
    use httpmock::prelude::*;

    fn direct_fetcher() -> SheetFetcher {
        SheetFetcher::new(vec![DIRECT.to_string()], Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_extract_uses_normalized_url() {
        let server = MockServer::start();
        let sheet_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/d/e/SHEET/pub")
                .query_param("output", "csv");
            then.status(200).body("Ticket Number,Seller\n7,Lee\n");
        });

        let state = AppState::new(MemoryStore::default());
        let pipeline = SheetPipeline::new(
            server.url("/d/e/SHEET/pub?output=tsv"),
            direct_fetcher(),
            state,
        );

        let text = pipeline.extract().await.unwrap();

        sheet_mock.assert();
        assert!(text.contains("7,Lee"));
    }

    #[tokio::test]
    async fn test_load_records_sheet_url_and_source() {
        let state = AppState::new(MemoryStore::default());
        let pipeline = SheetPipeline::new("ABC123", direct_fetcher(), state.clone());

        let dataset = pipeline
            .transform("Ticket Number,Seller\n1,Lee\n".to_string())
            .await
            .unwrap();
        let summary = pipeline.load(dataset).await.unwrap();

        assert_eq!(summary.source, DataSource::Sheet);
        assert_eq!(state.data_source().await.unwrap(), DataSource::Sheet);
        assert_eq!(state.sheet_url().await.unwrap().as_deref(), Some("ABC123"));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_fetching() {
        let state = AppState::new(MemoryStore::default());
        let pipeline = SheetPipeline::new("not a sheet link", direct_fetcher(), state);

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, RaffleError::InvalidSheetUrl { .. }));
    }
}
