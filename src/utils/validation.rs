//! Utilidades de validación
//!
//! Helpers de validación compartidos por los controllers.

use chrono::NaiveDate;

use crate::utils::errors::AppError;

/// Parsear una fecha de alquiler en formato YYYY-MM-DD
pub fn parse_rent_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date format for {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rent_date_ok() {
        let date = parse_rent_date("2025-06-01", "rentStartDate").unwrap();
        assert_eq!(date.to_string(), "2025-06-01");
    }

    #[test]
    fn test_parse_rent_date_trims_whitespace() {
        assert!(parse_rent_date(" 2025-06-01 ", "rentStartDate").is_ok());
    }

    #[test]
    fn test_parse_rent_date_invalid() {
        assert!(parse_rent_date("01/06/2025", "rentStartDate").is_err());
        assert!(parse_rent_date("2025-13-40", "rentStartDate").is_err());
        assert!(parse_rent_date("", "rentStartDate").is_err());
    }
}
