pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use config::lambda::LambdaConfig;
#[cfg(feature = "lambda")]
pub use config::lambda::S3Storage;

pub use adapters::airtable::AirtableClient;
pub use core::{engine::PackingListEngine, pipeline::PackingListPipeline};
pub use utils::error::{PackingListError, Result};
