use crate::utils::error::{PremiumError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PremiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PremiumError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PremiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(PremiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PremiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 開區間 (0, 1)，用於 train/holdout 比例
pub fn validate_fraction(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(PremiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be strictly between 0 and 1".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PremiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Same as [`validate_range`] but reports a client-input error.
pub fn check_input_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if !(value >= min && value <= max) {
        return Err(PremiumError::invalid_input(
            field_name,
            value,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn check_positive_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PremiumError::invalid_input(
            field_name,
            value,
            "must be a positive, finite number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("dataset.url", "https://example.com/insurance.csv").is_ok());
        assert!(validate_url("dataset.url", "http://example.com").is_ok());
        assert!(validate_url("dataset.url", "").is_err());
        assert!(validate_url("dataset.url", "invalid-url").is_err());
        assert!(validate_url("dataset.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_fraction() {
        assert!(validate_fraction("model.train_fraction", 0.7).is_ok());
        assert!(validate_fraction("model.train_fraction", 0.0).is_err());
        assert!(validate_fraction("model.train_fraction", 1.0).is_err());
        assert!(validate_fraction("model.train_fraction", f64::NAN).is_err());
    }

    #[test]
    fn test_check_input_range_rejects_nan() {
        assert!(check_input_range("bmi", 25.0, 10.0, 60.0).is_ok());
        assert!(check_input_range("bmi", f64::NAN, 10.0, 60.0).is_err());
        assert!(check_input_range("age", 17u32, 18, 100).is_err());
    }

    #[test]
    fn test_check_positive_finite() {
        assert!(check_positive_finite("height_cm", 175.0).is_ok());
        assert!(check_positive_finite("height_cm", 0.0).is_err());
        assert!(check_positive_finite("weight_kg", -3.0).is_err());
        assert!(check_positive_finite("weight_kg", f64::INFINITY).is_err());
    }
}
