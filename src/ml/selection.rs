use crate::domain::model::TrainingSample;
use crate::ml::encoding::FeatureSet;
use crate::ml::regressor::{CandidateSpec, FittedModel};
use crate::utils::error::{PremiumError, Result};
use aprender::metrics::{mae, r_squared, rmse};
use aprender::primitives::Vector;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

pub const MIN_TRAINING_ROWS: usize = 10;
pub const DEFAULT_SESSION_ID: u64 = 123;
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.7;

#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub name: &'static str,
    pub spec: CandidateSpec,
}

pub const CANDIDATES: &[Candidate] = &[
    Candidate {
        name: "lr",
        spec: CandidateSpec::Linear {
            feature_set: FeatureSet::Base,
        },
    },
    Candidate {
        name: "ridge",
        spec: CandidateSpec::Ridge {
            feature_set: FeatureSet::Base,
            alpha: 1.0,
        },
    },
    Candidate {
        name: "lr_interact",
        spec: CandidateSpec::Linear {
            feature_set: FeatureSet::Interactions,
        },
    },
    Candidate {
        name: "dummy",
        spec: CandidateSpec::Mean,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupOptions {
    pub session_id: u64,
    pub train_fraction: f64,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            session_id: DEFAULT_SESSION_ID,
            train_fraction: DEFAULT_TRAIN_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub algorithm: String,
    pub r2: f64,
    pub mae: f64,
    pub rmse: f64,
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub model: FittedModel,
    pub leaderboard: Vec<CandidateScore>,
    pub training_rows: usize,
}

/// Seeded shuffle, then split into (train, holdout).
pub fn train_test_split(
    samples: &[TrainingSample],
    options: &SetupOptions,
) -> (Vec<TrainingSample>, Vec<TrainingSample>) {
    let mut shuffled = samples.to_vec();
    let mut rng = StdRng::seed_from_u64(options.session_id);
    shuffled.shuffle(&mut rng);

    let n = shuffled.len();
    let train_len = ((n as f64) * options.train_fraction).round() as usize;
    let train_len = train_len.clamp(1, n.saturating_sub(1).max(1));
    let holdout = shuffled.split_off(train_len);
    (shuffled, holdout)
}

fn score(candidate: &Candidate, model: &FittedModel, holdout: &[TrainingSample]) -> Result<CandidateScore> {
    let actual = Vector::from_vec(holdout.iter().map(|s| s.charges as f32).collect());
    let predicted = model.predict_many(holdout.iter().map(|s| &s.record))?;

    Ok(CandidateScore {
        algorithm: candidate.name.to_string(),
        r2: f64::from(r_squared(&predicted, &actual)),
        mae: f64::from(mae(&predicted, &actual)),
        rmse: f64::from(rmse(&predicted, &actual)),
    })
}

/// Fits every candidate on the training split, scores it on the holdout and
/// refits the best one (by R²) on the full dataset.
pub fn compare_models(samples: &[TrainingSample], options: &SetupOptions) -> Result<TrainingOutcome> {
    if samples.len() < MIN_TRAINING_ROWS {
        return Err(PremiumError::model_unavailable(format!(
            "dataset has {} rows, at least {} are required for training",
            samples.len(),
            MIN_TRAINING_ROWS
        )));
    }

    let (train, holdout) = train_test_split(samples, options);
    tracing::info!(
        "Comparing {} candidates on {} training / {} holdout rows (session_id={})",
        CANDIDATES.len(),
        train.len(),
        holdout.len(),
        options.session_id
    );

    let mut scored: Vec<(CandidateScore, &Candidate)> = Vec::new();

    for candidate in CANDIDATES {
        let result = FittedModel::fit(candidate.name, candidate.spec, &train)
            .and_then(|model| score(candidate, &model, &holdout));
        let candidate_score = match result {
            Ok(candidate_score) => candidate_score,
            Err(e) => {
                tracing::warn!("⚠️ Candidate '{}' failed: {}", candidate.name, e);
                continue;
            }
        };

        if !candidate_score.r2.is_finite() {
            tracing::warn!("⚠️ Candidate '{}' produced a non-finite score", candidate.name);
            continue;
        }

        tracing::debug!(
            "Candidate {}: R2={:.4} MAE={:.2} RMSE={:.2}",
            candidate_score.algorithm,
            candidate_score.r2,
            candidate_score.mae,
            candidate_score.rmse
        );
        scored.push((candidate_score, candidate));
    }

    // 穩定排序，同分時保留候選清單順序
    scored.sort_by(|a, b| b.0.r2.total_cmp(&a.0.r2));

    let (best_score, best) = scored
        .first()
        .cloned()
        .ok_or_else(|| PremiumError::model_unavailable("no candidate model could be trained"))?;

    let model = FittedModel::fit(best.name, best.spec, samples)?;
    tracing::info!(
        "🏆 Best model: {} (holdout R2={:.4})",
        best_score.algorithm,
        best_score.r2
    );

    Ok(TrainingOutcome {
        model,
        leaderboard: scored.into_iter().map(|(score, _)| score).collect(),
        training_rows: samples.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClientRecord, Region, Sex, Smoker};

    /// 吸菸者的 BMI 影響較大，只有交互作用特徵能完整擬合
    fn dataset(rows: u32) -> Vec<TrainingSample> {
        (0..rows)
            .map(|i| {
                let smoker = if matches!(i % 8, 0 | 3) { Smoker::Yes } else { Smoker::No };
                let record = ClientRecord {
                    age: 18 + (i * 7) % 60,
                    sex: if i % 3 == 0 { Sex::Male } else { Sex::Female },
                    bmi: 17.0 + f64::from((i * 5) % 23),
                    children: i % 5,
                    smoker,
                    region: Region::ALL[(i % 4) as usize],
                };
                let smoking = if smoker.is_smoker() { 1.0 } else { 0.0 };
                let charges = 2_000.0
                    + 260.0 * f64::from(record.age)
                    + 300.0 * f64::from(record.children)
                    + 50.0 * record.bmi
                    + smoking * (14_000.0 + 1_400.0 * (record.bmi - 17.0));
                TrainingSample { record, charges }
            })
            .collect()
    }

    #[test]
    fn test_split_is_deterministic_and_complete() {
        let samples = dataset(50);
        let options = SetupOptions::default();
        let (train_a, holdout_a) = train_test_split(&samples, &options);
        let (train_b, holdout_b) = train_test_split(&samples, &options);

        assert_eq!(train_a, train_b);
        assert_eq!(holdout_a, holdout_b);
        assert_eq!(train_a.len(), 35);
        assert_eq!(holdout_a.len(), 15);
    }

    #[test]
    fn test_different_session_changes_split() {
        let samples = dataset(50);
        let (a, _) = train_test_split(&samples, &SetupOptions::default());
        let (b, _) = train_test_split(
            &samples,
            &SetupOptions {
                session_id: 7,
                ..SetupOptions::default()
            },
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_compare_models_prefers_interaction_model() {
        let samples = dataset(200);
        let outcome = compare_models(&samples, &SetupOptions::default()).unwrap();

        assert_eq!(outcome.model.algorithm(), "lr_interact");
        assert_eq!(outcome.training_rows, 200);
        assert_eq!(outcome.leaderboard[0].algorithm, "lr_interact");
        assert!(outcome.leaderboard[0].r2 > 0.99);
        assert!(outcome.leaderboard.len() >= 3);

        let sample = &samples[5];
        let predicted = outcome.model.predict(&sample.record).unwrap();
        assert!((predicted - sample.charges).abs() / sample.charges < 0.005);
    }

    #[test]
    fn test_too_few_rows() {
        let err = compare_models(&dataset(9), &SetupOptions::default()).unwrap_err();
        assert!(matches!(err, PremiumError::ModelUnavailable { .. }));
    }
}
