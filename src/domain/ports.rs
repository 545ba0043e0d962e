use crate::core::features::BmiPolicy;
use crate::domain::model::{ClientRecord, TrainingSample};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub trait Storage: Send + Sync {
    /// Filesystem location of `path`, for writers that only take a path.
    fn local_path(&self, path: &str) -> PathBuf;

    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where the reference dataset for training comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    fn describe(&self) -> String;
    async fn load(&self) -> Result<Vec<TrainingSample>>;
}

/// Given a single feature row, return a scalar prediction.
pub trait ChargeModel: Send + Sync {
    fn algorithm(&self) -> &str;
    fn predict(&self, record: &ClientRecord) -> Result<f64>;
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> &str;
    fn session_id(&self) -> u64;
    fn train_fraction(&self) -> f64;
    fn bmi_policy(&self) -> BmiPolicy;
}
