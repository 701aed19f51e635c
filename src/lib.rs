pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::sheets::{normalize_sheet_url, SheetFetcher};
pub use crate::adapters::store::LocalStore;
pub use crate::app::pipelines::{SheetPipeline, UploadPipeline};
pub use crate::config::Settings;
pub use crate::core::etl::SyncEngine;
pub use crate::core::ingest::{parse_csv, write_csv};
pub use crate::core::query::{search, total_tickets};
pub use crate::core::state::AppState;
pub use crate::domain::model::{
    DataSource, Dataset, LoadSummary, RaffleEntry, Schema, TicketDetail, Tickets,
};
pub use crate::utils::error::{RaffleError, Result};
