//! Validation helpers
//!
//! Custom validators plugged into the `validator` derives of the request
//! DTOs, plus a few conversion helpers.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use validator::ValidationError;

/// Earliest model year accepted for a listing
pub const MIN_VEHICLE_YEAR: i32 = 1950;

/// Validate and convert a `YYYY-MM-DD` string into a date
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validator form of [`parse_date`]
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value).map(|_| ())
}

/// Validate that a string is not blank
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validate that an amount of money is not negative
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validate a model year: not before 1950 and not past next year
pub fn validate_vehicle_year(value: i32) -> Result<(), ValidationError> {
    let max_year = Utc::now().year() + 1;
    if value < MIN_VEHICLE_YEAR || value > max_year {
        let mut error = ValidationError::new("year");
        error.add_param("min".into(), &MIN_VEHICLE_YEAR);
        error.add_param("max".into(), &max_year);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Toyota").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(&Decimal::new(4_250_000, 0)).is_ok());
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_vehicle_year() {
        assert!(validate_vehicle_year(2018).is_ok());
        assert!(validate_vehicle_year(1949).is_err());
        assert!(validate_vehicle_year(Utc::now().year() + 2).is_err());
    }
}
