use crate::core::ingest::parse_csv;
use crate::core::state::AppState;
use crate::domain::model::{DataSource, Dataset, LoadSummary};
use crate::domain::ports::{KeyValueStore, Pipeline};
use crate::utils::error::Result;
use crate::utils::validation::validate_csv_extension;
use std::path::PathBuf;

/// Loads a local CSV file as the new dataset.
pub struct UploadPipeline<S: KeyValueStore> {
    path: PathBuf,
    state: AppState<S>,
}

impl<S: KeyValueStore> UploadPipeline<S> {
    pub fn new(path: impl Into<PathBuf>, state: AppState<S>) -> Self {
        Self {
            path: path.into(),
            state,
        }
    }
}

#[async_trait::async_trait]
impl<S: KeyValueStore> Pipeline for UploadPipeline<S> {
    async fn extract(&self) -> Result<String> {
        // 副檔名不對就直接拒絕，不讀檔
        validate_csv_extension(&self.path)?;

        tracing::info!("📂 Reading {}", self.path.display());
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn transform(&self, csv_text: String) -> Result<Dataset> {
        let dataset = parse_csv(&csv_text)?;
        tracing::info!("🔧 Parsed {} sellers from upload", dataset.len());
        Ok(dataset)
    }

    async fn load(&self, dataset: Dataset) -> Result<LoadSummary> {
        self.state.replace_dataset(&dataset, DataSource::File).await
    }

    fn origin(&self) -> String {
        format!("CSV file '{}'", self.path.display())
    }
}
