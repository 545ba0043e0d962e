pub mod advisory;
pub mod engine;
pub mod features;
pub mod model_store;

pub use crate::domain::model::{ClientRecord, PredictionResult, Quote, RawClientInput};
pub use crate::domain::ports::{ChargeModel, ConfigProvider, DatasetSource, Storage};
pub use crate::utils::error::Result;
