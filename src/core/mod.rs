pub mod engine;
pub mod fetcher;
pub mod formula;
pub mod grid;
pub mod layout;
pub mod pipeline;
pub mod publisher;
pub mod writer;

pub use crate::domain::model::{DomesticShipment, LineItem, PackingList, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RecordStore, Storage};
pub use crate::utils::error::Result;
