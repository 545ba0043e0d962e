use crate::adapters::dataset::{CsvFileDataset, HttpCsvDataset};
use crate::core::features::{BmiPolicy, DEFAULT_BMI_SENTINEL, MANUAL_BMI_RANGE};
use crate::core::ConfigProvider;
use crate::domain::ports::DatasetSource;
use crate::ml::selection::{DEFAULT_SESSION_ID, DEFAULT_TRAIN_FRACTION};
use crate::utils::error::{PremiumError, Result};
use crate::utils::validation::{validate_fraction, validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL_PATH: &str = "insurance_model";
pub const DEFAULT_DATASET_PATH: &str = "insurance.csv";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub dataset: DatasetConfig,
    pub features: FeatureConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
    pub session_id: u64,
    pub train_fraction: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_MODEL_PATH.to_string(),
            session_id: DEFAULT_SESSION_ID,
            train_fraction: DEFAULT_TRAIN_FRACTION,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiPolicyKind {
    #[default]
    Measurements,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub bmi_policy: BmiPolicyKind,
    pub bmi_sentinel: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            bmi_policy: BmiPolicyKind::Measurements,
            bmi_sentinel: DEFAULT_BMI_SENTINEL,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

/// 訓練資料來源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    File(String),
    Url(String),
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PremiumError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PremiumError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PremiumError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn dataset_location(&self) -> Result<DatasetLocation> {
        match (&self.dataset.path, &self.dataset.url) {
            (Some(_), Some(_)) => Err(PremiumError::ConfigValidationError {
                field: "dataset".to_string(),
                message: "set either dataset.path or dataset.url, not both".to_string(),
            }),
            (None, Some(url)) => Ok(DatasetLocation::Url(url.clone())),
            (Some(path), None) => Ok(DatasetLocation::File(path.clone())),
            (None, None) => Ok(DatasetLocation::File(DEFAULT_DATASET_PATH.to_string())),
        }
    }

    pub fn dataset_source(&self) -> Result<Box<dyn DatasetSource>> {
        Ok(match self.dataset_location()? {
            DatasetLocation::File(path) => Box::new(CsvFileDataset::new(path)),
            DatasetLocation::Url(url) => Box::new(HttpCsvDataset::new(url)),
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("model.path", &self.model.path)?;
        validate_fraction("model.train_fraction", self.model.train_fraction)?;

        match self.dataset_location()? {
            DatasetLocation::File(path) => validate_path("dataset.path", &path)?,
            DatasetLocation::Url(url) => validate_url("dataset.url", &url)?,
        }

        if self.features.bmi_policy == BmiPolicyKind::Manual {
            validate_range(
                "features.bmi_sentinel",
                self.features.bmi_sentinel,
                MANUAL_BMI_RANGE.0,
                MANUAL_BMI_RANGE.1,
            )?;
        }

        if let Some(level) = &self.logging.level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(PremiumError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn model_path(&self) -> &str {
        &self.model.path
    }

    fn session_id(&self) -> u64 {
        self.model.session_id
    }

    fn train_fraction(&self) -> f64 {
        self.model.train_fraction
    }

    fn bmi_policy(&self) -> BmiPolicy {
        match self.features.bmi_policy {
            BmiPolicyKind::Measurements => BmiPolicy::Measurements,
            BmiPolicyKind::Manual => BmiPolicy::ManualUnlessSentinel {
                sentinel: self.features.bmi_sentinel,
            },
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
