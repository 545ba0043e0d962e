use crate::domain::model::{ClientRecord, TrainingSample};
use crate::ml::encoding::FeatureSet;
use crate::utils::error::{PremiumError, Result};
use aprender::linear_model::{LinearRegression, Ridge};
use aprender::preprocessing::StandardScaler;
use aprender::primitives::{Matrix, Vector};
use aprender::traits::{Estimator, Transformer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a candidate is fitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateSpec {
    Linear { feature_set: FeatureSet },
    Ridge { feature_set: FeatureSet, alpha: f32 },
    Mean,
}

#[derive(Serialize, Deserialize)]
enum Regressor {
    Linear(LinearRegression),
    Ridge(Ridge),
    /// Intercept-only model: the mean training charge.
    Mean { value: f32 },
}

impl Regressor {
    fn kind(&self) -> &'static str {
        match self {
            Regressor::Linear(_) => "linear",
            Regressor::Ridge(_) => "ridge",
            Regressor::Mean { .. } => "mean",
        }
    }
}

/// A candidate fitted on standardised features, ready to predict.
#[derive(Serialize, Deserialize)]
pub struct FittedModel {
    algorithm: String,
    feature_set: FeatureSet,
    scaler: Option<StandardScaler>,
    regressor: Regressor,
}

impl fmt::Debug for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittedModel")
            .field("algorithm", &self.algorithm)
            .field("feature_set", &self.feature_set)
            .field("regressor", &self.regressor.kind())
            .finish()
    }
}

fn fit_error(algorithm: &str, e: impl fmt::Display) -> PremiumError {
    PremiumError::model_unavailable(format!("candidate '{}' failed to fit: {}", algorithm, e))
}

fn targets(samples: &[TrainingSample]) -> Vector<f32> {
    Vector::from_vec(samples.iter().map(|s| s.charges as f32).collect())
}

fn scaled_features(
    algorithm: &str,
    feature_set: FeatureSet,
    samples: &[TrainingSample],
) -> Result<(StandardScaler, Matrix<f32>)> {
    let x = feature_set.encode_matrix(samples.iter().map(|s| &s.record))?;
    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&x).map_err(|e| fit_error(algorithm, e))?;
    Ok((scaler, scaled))
}

impl FittedModel {
    pub fn fit(algorithm: &str, spec: CandidateSpec, samples: &[TrainingSample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(fit_error(algorithm, "no training rows"));
        }
        let y = targets(samples);

        let (feature_set, scaler, regressor) = match spec {
            CandidateSpec::Mean => (FeatureSet::Base, None, Regressor::Mean { value: y.mean() }),
            CandidateSpec::Linear { feature_set } => {
                let (scaler, x) = scaled_features(algorithm, feature_set, samples)?;
                let mut model = LinearRegression::new();
                model.fit(&x, &y).map_err(|e| fit_error(algorithm, e))?;
                (feature_set, Some(scaler), Regressor::Linear(model))
            }
            CandidateSpec::Ridge { feature_set, alpha } => {
                let (scaler, x) = scaled_features(algorithm, feature_set, samples)?;
                let mut model = Ridge::new(alpha);
                model.fit(&x, &y).map_err(|e| fit_error(algorithm, e))?;
                (feature_set, Some(scaler), Regressor::Ridge(model))
            }
        };

        Ok(Self {
            algorithm: algorithm.to_string(),
            feature_set,
            scaler,
            regressor,
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Predictions for every record, in order.
    pub fn predict_many<'a, I>(&self, records: I) -> Result<Vector<f32>>
    where
        I: IntoIterator<Item = &'a ClientRecord>,
    {
        let x = self.feature_set.encode_matrix(records)?;
        let (rows, _) = x.shape();

        let x = match &self.scaler {
            Some(scaler) => scaler.transform(&x).map_err(|e| {
                PremiumError::model_unavailable(format!("failed to scale features: {}", e))
            })?,
            None => x,
        };

        Ok(match &self.regressor {
            Regressor::Linear(model) => model.predict(&x),
            Regressor::Ridge(model) => model.predict(&x),
            Regressor::Mean { value } => Vector::from_vec(vec![*value; rows]),
        })
    }

    pub fn predict(&self, record: &ClientRecord) -> Result<f64> {
        let predicted = self.predict_many(std::iter::once(record))?;
        predicted
            .as_slice()
            .first()
            .map(|value| f64::from(*value))
            .ok_or_else(|| {
                PremiumError::model_unavailable(format!(
                    "model '{}' returned no prediction",
                    self.algorithm
                ))
            })
    }
}
