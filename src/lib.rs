pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod ml;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{AppConfig, LocalStorage};
pub use crate::core::{
    advisory::AdvisoryEngine,
    engine::QuoteEngine,
    features::{BmiPolicy, FeatureDeriver},
    model_store::{ModelHandle, ModelStore},
};
pub use utils::error::{PremiumError, Result};
