use crate::core::Pipeline;
use crate::domain::model::LoadSummary;
use crate::utils::error::{RaffleError, Result};
use std::time::Duration;

pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Extract, transform, load. An empty dataset stops before anything is stored.
    pub async fn run(&self) -> Result<LoadSummary> {
        tracing::info!("Starting load from {}", self.pipeline.origin());

        let raw = self.pipeline.extract().await?;
        tracing::debug!("Extracted {} bytes", raw.len());

        let dataset = self.pipeline.transform(raw).await?;
        if dataset.is_empty() {
            return Err(RaffleError::EmptyResultError {
                origin: self.pipeline.origin(),
            });
        }

        let summary = self.pipeline.load(dataset).await?;
        tracing::info!("💾 {}", summary.message());
        Ok(summary)
    }

    /// Runs back-to-back rounds on a fixed interval. A failed round is logged and the
    /// stored dataset stays as it was. Stops after `max_rounds` when given.
    ///
    /// Returns the number of successful rounds.
    pub async fn run_every(&self, period: Duration, max_rounds: Option<usize>) -> usize {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut rounds = 0;
        let mut succeeded = 0;
        while max_rounds.map_or(true, |max| rounds < max) {
            ticker.tick().await;
            rounds += 1;

            match self.run().await {
                Ok(_) => succeeded += 1,
                Err(e) => tracing::warn!(
                    "Refresh round {} failed: {} ({})",
                    rounds,
                    e,
                    e.recovery_suggestion()
                ),
            }
        }
        succeeded
    }
}
