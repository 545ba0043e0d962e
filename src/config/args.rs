use crate::config::toml_config::AppConfig;
use crate::domain::model::{RawClientInput, Region, Sex, Smoker};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "insurance-premium")]
#[command(about = "Predicts a monthly insurance charge and suggests how to lower it")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Model artifact path (without extension)
    #[arg(long, global = true)]
    pub model_path: Option<String>,

    /// Training dataset CSV file
    #[arg(long, global = true, conflicts_with = "dataset_url")]
    pub dataset: Option<String>,

    /// Training dataset CSV URL
    #[arg(long, global = true)]
    pub dataset_url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Predict the monthly charge and print cost-reduction tips
    Predict(ClientArgs),
    /// Print cost-reduction tips only (no model needed)
    Advise(ClientArgs),
    /// Train the model if missing (or always, with --force) and show the leaderboard
    Train {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    #[arg(long)]
    pub age: u32,

    #[arg(long, value_enum)]
    pub sex: Sex,

    /// Body-mass index, used when height/weight are not given
    #[arg(long)]
    pub bmi: Option<f64>,

    #[arg(long, default_value_t = 0)]
    pub children: u32,

    #[arg(long, value_enum)]
    pub smoker: Smoker,

    #[arg(long, value_enum)]
    pub region: Region,

    #[arg(long, requires = "weight_kg")]
    pub height_cm: Option<f64>,

    #[arg(long, requires = "height_cm")]
    pub weight_kg: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ClientArgs {
    pub fn to_input(&self) -> RawClientInput {
        RawClientInput {
            age: self.age,
            sex: self.sex,
            bmi: self.bmi,
            children: self.children,
            smoker: self.smoker,
            region: self.region,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
        }
    }
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(model_path) = &self.model_path {
            config.model.path = model_path.clone();
        }
        if let Some(path) = &self.dataset {
            config.dataset.path = Some(path.clone());
            config.dataset.url = None;
        }
        if let Some(url) = &self.dataset_url {
            config.dataset.url = Some(url.clone());
            config.dataset.path = None;
        }
    }

    pub fn load_app_config(&self) -> crate::utils::error::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }
}
