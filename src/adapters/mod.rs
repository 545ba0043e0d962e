// Adapters layer: concrete implementations for external systems (dataset sources).

pub mod dataset;

pub use dataset::{CsvFileDataset, HttpCsvDataset};
