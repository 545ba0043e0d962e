use crate::domain::model::{ClientRecord, Region, Sex, Smoker, TrainingSample};
use crate::domain::ports::DatasetSource;
use crate::utils::error::{PremiumError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRow {
    age: u32,
    sex: Sex,
    bmi: f64,
    children: u32,
    smoker: Smoker,
    region: Region,
    charges: f64,
}

/// Parses `age,sex,bmi,children,smoker,region,charges` rows. Extra columns are ignored.
pub fn parse_training_csv(data: &[u8]) -> Result<Vec<TrainingSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut samples = Vec::new();
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        if !row.bmi.is_finite() || row.bmi <= 0.0 || !row.charges.is_finite() {
            return Err(PremiumError::invalid_input(
                "dataset",
                format!("row {}", line + 1),
                "bmi must be positive and charges finite",
            ));
        }
        samples.push(TrainingSample {
            record: ClientRecord {
                age: row.age,
                sex: row.sex,
                bmi: row.bmi,
                children: row.children,
                smoker: row.smoker,
                region: row.region,
            },
            charges: row.charges,
        });
    }

    Ok(samples)
}

#[derive(Debug, Clone)]
pub struct CsvFileDataset {
    path: PathBuf,
}

impl CsvFileDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for CsvFileDataset {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn load(&self) -> Result<Vec<TrainingSample>> {
        let data = tokio::fs::read(&self.path).await?;
        parse_training_csv(&data)
    }
}

#[derive(Debug, Clone)]
pub struct HttpCsvDataset {
    url: String,
    client: Client,
}

impl HttpCsvDataset {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DatasetSource for HttpCsvDataset {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    async fn load(&self) -> Result<Vec<TrainingSample>> {
        tracing::debug!("Downloading dataset from: {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        tracing::debug!("Dataset response status: {}", response.status());

        let response = response.error_for_status()?;
        let body = response.bytes().await?;
        parse_training_csv(&body)
    }
}
