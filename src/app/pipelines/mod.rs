pub mod sheet_pipeline;
pub mod upload_pipeline;

pub use sheet_pipeline::SheetPipeline;
pub use upload_pipeline::UploadPipeline;
