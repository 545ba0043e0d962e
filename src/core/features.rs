use crate::domain::model::{ClientRecord, RawClientInput};
use crate::utils::error::{PremiumError, Result};
use crate::utils::validation::{check_input_range, check_positive_finite};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BMI_SENTINEL: f64 = 25.0;

// 表單欄位範圍
pub const AGE_RANGE: (u32, u32) = (18, 100);
pub const CHILDREN_RANGE: (u32, u32) = (0, 10);
pub const MANUAL_BMI_RANGE: (f64, f64) = (10.0, 60.0);
pub const HEIGHT_CM_RANGE: (f64, f64) = (120.0, 220.0);
pub const WEIGHT_KG_RANGE: (f64, f64) = (40.0, 200.0);

/// Which BMI wins when the form carries both a manual value and height/weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BmiPolicy {
    /// Always recompute from height and weight.
    #[default]
    Measurements,
    /// Keep a manually entered BMI unless it equals the form's placeholder.
    ManualUnlessSentinel { sentinel: f64 },
}

/// Round half to even on the exact binary value, the way Python's
/// `round(x, 1)` does. `22.25 -> 22.2`, `22.75 -> 22.8`, `0.35 -> 0.3`.
fn round_one_decimal(value: f64) -> f64 {
    let scaled = value * 10.0;
    // 乘法的捨入誤差，用來判斷是否真的剛好落在 .5
    let residual = value.mul_add(10.0, -scaled);
    let floor = scaled.floor();
    let fraction = scaled - floor;

    let round_up = if fraction != 0.5 {
        fraction > 0.5
    } else if residual != 0.0 {
        residual > 0.0
    } else {
        floor.rem_euclid(2.0) == 1.0
    };

    (if round_up { floor + 1.0 } else { floor }) / 10.0
}

/// `weight_kg / (height_cm / 100)^2`, rounded to one decimal place.
pub fn bmi_from_measurements(height_cm: f64, weight_kg: f64) -> Result<f64> {
    check_positive_finite("height_cm", height_cm)?;
    check_positive_finite("weight_kg", weight_kg)?;

    let height_m = height_cm / 100.0;
    Ok(round_one_decimal(weight_kg / (height_m * height_m)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureDeriver {
    policy: BmiPolicy,
}

impl FeatureDeriver {
    pub fn new(policy: BmiPolicy) -> Self {
        Self { policy }
    }

    pub fn derive(&self, height_cm: f64, weight_kg: f64, raw_bmi: Option<f64>) -> Result<f64> {
        match (self.policy, raw_bmi) {
            (BmiPolicy::ManualUnlessSentinel { sentinel }, Some(bmi)) if bmi != sentinel => {
                check_positive_finite("bmi", bmi)?;
                Ok(bmi)
            }
            _ => bmi_from_measurements(height_cm, weight_kg),
        }
    }

    /// Validates a form submission and turns it into the canonical row.
    pub fn canonicalize(&self, input: &RawClientInput) -> Result<ClientRecord> {
        check_input_range("age", input.age, AGE_RANGE.0, AGE_RANGE.1)?;
        check_input_range("children", input.children, CHILDREN_RANGE.0, CHILDREN_RANGE.1)?;
        if let Some(bmi) = input.bmi {
            check_input_range("bmi", bmi, MANUAL_BMI_RANGE.0, MANUAL_BMI_RANGE.1)?;
        }

        let bmi = match (input.height_cm, input.weight_kg, input.bmi) {
            (Some(height_cm), Some(weight_kg), raw_bmi) => {
                check_input_range("height_cm", height_cm, HEIGHT_CM_RANGE.0, HEIGHT_CM_RANGE.1)?;
                check_input_range("weight_kg", weight_kg, WEIGHT_KG_RANGE.0, WEIGHT_KG_RANGE.1)?;
                self.derive(height_cm, weight_kg, raw_bmi)?
            }
            (Some(_), None, _) => {
                return Err(PremiumError::invalid_input(
                    "weight_kg",
                    "missing",
                    "height was given without weight",
                ))
            }
            (None, Some(_), _) => {
                return Err(PremiumError::invalid_input(
                    "height_cm",
                    "missing",
                    "weight was given without height",
                ))
            }
            (None, None, Some(bmi)) => bmi,
            (None, None, None) => {
                return Err(PremiumError::invalid_input(
                    "bmi",
                    "missing",
                    "bmi or height+weight required",
                ))
            }
        };

        tracing::debug!("Canonical BMI {} (policy {:?})", bmi, self.policy);

        Ok(ClientRecord {
            age: input.age,
            sex: input.sex,
            bmi,
            children: input.children,
            smoker: input.smoker,
            region: input.region,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Region, Sex, Smoker};

    fn raw(bmi: Option<f64>, height_cm: Option<f64>, weight_kg: Option<f64>) -> RawClientInput {
        RawClientInput {
            age: 30,
            sex: Sex::Male,
            bmi,
            children: 0,
            smoker: Smoker::No,
            region: Region::Southwest,
            height_cm,
            weight_kg,
        }
    }

    #[test]
    fn test_bmi_from_height_and_weight() {
        assert_eq!(bmi_from_measurements(175.0, 70.0).unwrap(), 22.9);
        assert_eq!(bmi_from_measurements(180.0, 81.0).unwrap(), 25.0);
        assert_eq!(bmi_from_measurements(160.0, 100.0).unwrap(), 39.1);
    }

    #[test]
    fn test_bmi_reference_values() {
        // round(w / (h / 100) ** 2, 1)
        let cases = [
            (120.0, 40.0, 27.8),
            (150.5, 63.3, 27.9),
            (199.9, 118.0, 29.5),
            (220.0, 200.0, 41.3),
        ];
        for (height, weight, expected) in cases {
            assert_eq!(bmi_from_measurements(height, weight).unwrap(), expected);
        }
    }

    #[test]
    fn test_bmi_ties_round_half_to_even() {
        assert_eq!(bmi_from_measurements(200.0, 89.0).unwrap(), 22.2);
        assert_eq!(bmi_from_measurements(200.0, 91.0).unwrap(), 22.8);
        assert_eq!(bmi_from_measurements(200.0, 90.0).unwrap(), 22.5);
    }

    #[test]
    fn test_round_one_decimal_uses_exact_value() {
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(0.35), 0.3);
        assert_eq!(round_one_decimal(22.94), 22.9);
        assert_eq!(round_one_decimal(22.96), 23.0);
    }

    #[test]
    fn test_zero_height_or_weight_is_rejected() {
        let deriver = FeatureDeriver::default();
        assert!(matches!(
            deriver.derive(0.0, 70.0, None),
            Err(PremiumError::InvalidInput { .. })
        ));
        assert!(matches!(
            deriver.derive(175.0, 0.0, None),
            Err(PremiumError::InvalidInput { .. })
        ));
        assert!(deriver.derive(-175.0, 70.0, None).is_err());
        assert!(deriver.derive(f64::NAN, 70.0, None).is_err());
    }

    #[test]
    fn test_measurements_policy_ignores_manual_bmi() {
        let deriver = FeatureDeriver::new(BmiPolicy::Measurements);
        assert_eq!(deriver.derive(175.0, 70.0, Some(31.0)).unwrap(), 22.9);
    }

    #[test]
    fn test_sentinel_policy_prefers_manual_value() {
        let deriver = FeatureDeriver::new(BmiPolicy::ManualUnlessSentinel {
            sentinel: DEFAULT_BMI_SENTINEL,
        });
        assert_eq!(deriver.derive(175.0, 70.0, Some(31.0)).unwrap(), 31.0);
        assert_eq!(deriver.derive(175.0, 70.0, Some(25.0)).unwrap(), 22.9);
        assert_eq!(deriver.derive(175.0, 70.0, None).unwrap(), 22.9);
    }

    #[test]
    fn test_canonicalize_uses_manual_bmi_without_measurements() {
        let record = FeatureDeriver::default()
            .canonicalize(&raw(Some(27.4), None, None))
            .unwrap();
        assert_eq!(record.bmi, 27.4);
        assert_eq!(record.age, 30);
    }

    #[test]
    fn test_canonicalize_derives_from_measurements() {
        let record = FeatureDeriver::default()
            .canonicalize(&raw(Some(25.0), Some(175.0), Some(70.0)))
            .unwrap();
        assert_eq!(record.bmi, 22.9);
    }

    #[test]
    fn test_canonicalize_rejects_incomplete_input() {
        let deriver = FeatureDeriver::default();
        assert!(deriver.canonicalize(&raw(None, None, None)).is_err());
        assert!(deriver.canonicalize(&raw(None, Some(175.0), None)).is_err());
        assert!(deriver.canonicalize(&raw(None, None, Some(70.0))).is_err());
    }

    #[test]
    fn test_canonicalize_enforces_form_ranges() {
        let deriver = FeatureDeriver::default();

        let mut young = raw(Some(22.0), None, None);
        young.age = 17;
        assert!(deriver.canonicalize(&young).is_err());

        let mut big_family = raw(Some(22.0), None, None);
        big_family.children = 11;
        assert!(deriver.canonicalize(&big_family).is_err());

        assert!(deriver.canonicalize(&raw(Some(9.9), None, None)).is_err());
        assert!(deriver.canonicalize(&raw(None, Some(100.0), Some(70.0))).is_err());
        assert!(deriver.canonicalize(&raw(None, Some(175.0), Some(250.0))).is_err());
    }
}
