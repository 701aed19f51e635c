pub mod aggregate;
pub mod builder;
pub mod etl;
pub mod ingest;
pub mod query;
pub mod seed;
pub mod state;
pub mod tokenizer;

pub use crate::domain::model::{Dataset, RaffleEntry, Schema, TicketDetail, Tickets};
pub use crate::domain::ports::{ConfigProvider, KeyValueStore, Pipeline};
pub use crate::utils::error::Result;
