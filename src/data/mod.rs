//! Data module - CSV loading, schema normalization and filtering

mod filter;
pub(crate) mod loader;
pub mod schema;

pub use filter::FilterSelections;
pub use loader::{BankDataset, DataLoader};
pub use schema::{DatasetSchema, Dimension};
