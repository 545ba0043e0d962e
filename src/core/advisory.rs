use crate::domain::model::{ClientRecord, PredictionResult};
use serde::Serialize;

pub const BMI_THRESHOLD: f64 = 30.0;
pub const YOUNG_AGE_LIMIT: u32 = 25;
pub const LARGE_FAMILY_CHILDREN: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipKind {
    QuitSmoking,
    ReduceBmi,
    YouthPlan,
    FamilyPolicy,
    AlreadyOptimal,
}

impl TipKind {
    pub fn message(&self) -> &'static str {
        match self {
            TipKind::QuitSmoking => {
                "🚭 Quitting smoking will lower the premium significantly - smokers pay up to 2-3x more."
            }
            TipKind::ReduceBmi => "⚖️ Bringing your BMI below 25 noticeably improves the risk assessment.",
            TipKind::YouthPlan => "🎓 Younger clients can take advantage of student or family plans.",
            TipKind::FamilyPolicy => {
                "👨‍👩‍👧‍👦 Family insurance is often cheaper with a shared policy."
            }
            TipKind::AlreadyOptimal => {
                "✅ Your data looks good! It will be hard to lower the premium significantly."
            }
        }
    }
}

pub struct AdvisoryRule {
    pub kind: TipKind,
    pub applies: fn(&ClientRecord, Option<&PredictionResult>) -> bool,
}

fn is_smoker(record: &ClientRecord, _: Option<&PredictionResult>) -> bool {
    record.smoker.is_smoker()
}

fn has_high_bmi(record: &ClientRecord, _: Option<&PredictionResult>) -> bool {
    record.bmi > BMI_THRESHOLD
}

fn is_young(record: &ClientRecord, _: Option<&PredictionResult>) -> bool {
    record.age < YOUNG_AGE_LIMIT
}

fn has_large_family(record: &ClientRecord, _: Option<&PredictionResult>) -> bool {
    record.children > LARGE_FAMILY_CHILDREN
}

/// 規則順序即輸出順序
pub static RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        kind: TipKind::QuitSmoking,
        applies: is_smoker,
    },
    AdvisoryRule {
        kind: TipKind::ReduceBmi,
        applies: has_high_bmi,
    },
    AdvisoryRule {
        kind: TipKind::YouthPlan,
        applies: is_young,
    },
    AdvisoryRule {
        kind: TipKind::FamilyPolicy,
        applies: has_large_family,
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisoryEngine;

impl AdvisoryEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        record: &ClientRecord,
        prediction: Option<&PredictionResult>,
    ) -> Vec<TipKind> {
        let matched: Vec<TipKind> = RULES
            .iter()
            .filter(|rule| (rule.applies)(record, prediction))
            .map(|rule| rule.kind)
            .collect();

        if matched.is_empty() {
            vec![TipKind::AlreadyOptimal]
        } else {
            matched
        }
    }

    /// Never empty; falls back to the "already optimal" message.
    pub fn advise(&self, record: &ClientRecord) -> Vec<String> {
        Self::messages(self.evaluate(record, None))
    }

    pub fn advise_with_prediction(
        &self,
        record: &ClientRecord,
        prediction: &PredictionResult,
    ) -> Vec<String> {
        Self::messages(self.evaluate(record, Some(prediction)))
    }

    fn messages(kinds: Vec<TipKind>) -> Vec<String> {
        kinds.into_iter().map(|k| k.message().to_string()).collect()
    }
}
