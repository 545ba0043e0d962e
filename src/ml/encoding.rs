use crate::domain::model::{ClientRecord, Region, Sex};
use crate::utils::error::{PremiumError, Result};
use aprender::primitives::Matrix;
use serde::{Deserialize, Serialize};

const BASE_WIDTH: usize = 8;
const INTERACTION_WIDTH: usize = 3;

/// Column layout fed to the linear candidates. Categoricals are one-hot
/// encoded with the first level dropped (female, non-smoker, northeast).
///
/// Base: `age, bmi, children, sex_male, smoker_yes, region_northwest,
/// region_southeast, region_southwest`. Interactions add `age²`,
/// `bmi×smoker` and `age×smoker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    Base,
    Interactions,
}

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

impl FeatureSet {
    pub fn width(&self) -> usize {
        match self {
            FeatureSet::Base => BASE_WIDTH,
            FeatureSet::Interactions => BASE_WIDTH + INTERACTION_WIDTH,
        }
    }

    pub fn encode(&self, record: &ClientRecord) -> Vec<f32> {
        let age = record.age as f32;
        let bmi = record.bmi as f32;
        let smoker = flag(record.smoker.is_smoker());

        let mut row = Vec::with_capacity(self.width());
        row.push(age);
        row.push(bmi);
        row.push(record.children as f32);
        row.push(flag(record.sex == Sex::Male));
        row.push(smoker);
        row.push(flag(record.region == Region::Northwest));
        row.push(flag(record.region == Region::Southeast));
        row.push(flag(record.region == Region::Southwest));

        if *self == FeatureSet::Interactions {
            row.push(age * age);
            row.push(bmi * smoker);
            row.push(age * smoker);
        }

        row
    }

    /// One row per record, in order.
    pub fn encode_matrix<'a, I>(&self, records: I) -> Result<Matrix<f32>>
    where
        I: IntoIterator<Item = &'a ClientRecord>,
    {
        let mut data = Vec::new();
        let mut rows = 0;
        for record in records {
            data.extend(self.encode(record));
            rows += 1;
        }

        Matrix::from_vec(rows, self.width(), data).map_err(|e| {
            PremiumError::model_unavailable(format!("failed to build feature matrix: {}", e))
        })
    }
}
