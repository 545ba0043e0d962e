use crate::utils::error::PremiumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Smoker {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Southwest,
    Southeast,
    Northwest,
    Northeast,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl Smoker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Smoker::Yes => "yes",
            Smoker::No => "no",
        }
    }

    pub fn is_smoker(&self) -> bool {
        matches!(self, Smoker::Yes)
    }
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Southwest,
        Region::Southeast,
        Region::Northwest,
        Region::Northeast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Southwest => "southwest",
            Region::Southeast => "southeast",
            Region::Northwest => "northwest",
            Region::Northeast => "northeast",
        }
    }
}

macro_rules! impl_text_enum {
    ($ty:ty, $field:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PremiumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        PremiumError::invalid_input(
                            $field,
                            s,
                            format!(
                                "expected one of: {}",
                                [$($variant.as_str()),+].join(", ")
                            ),
                        )
                    })
            }
        }
    };
}

impl_text_enum!(Sex, "sex", [Sex::Male, Sex::Female]);
impl_text_enum!(Smoker, "smoker", [Smoker::Yes, Smoker::No]);
impl_text_enum!(
    Region,
    "region",
    [Region::Southwest, Region::Southeast, Region::Northwest, Region::Northeast]
);

/// 表單送出的原始資料，尚未推導 BMI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClientInput {
    pub age: u32,
    pub sex: Sex,
    pub bmi: Option<f64>,
    pub children: u32,
    pub smoker: Smoker,
    pub region: Region,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

/// Canonical feature row consumed by the model. `bmi` is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub age: u32,
    pub sex: Sex,
    pub bmi: f64,
    pub children: u32,
    pub smoker: Smoker,
    pub region: Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub monthly_charge: f64,
}

/// One row of the reference dataset (`age,sex,bmi,children,smoker,region,charges`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub record: ClientRecord,
    pub charges: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub record: ClientRecord,
    pub prediction: PredictionResult,
    pub tips: Vec<String>,
}
