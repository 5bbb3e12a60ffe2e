// Core ledger primitives and transaction orchestrators
pub mod production;
pub mod purchasing;
pub mod sales;
pub mod stock_ledger;

// Catalog, master data and formulas
pub mod catalog;
pub mod formulas;
pub mod partners;

// Finance, reporting and administration
pub mod finance;
pub mod reports;
pub mod system;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::ServiceError;

/// Parses a `YYYY-MM-DD` date arriving from the API boundary.
pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ServiceError::ValidationError(format!(
            "{} must be a YYYY-MM-DD date, got '{}'",
            field, value
        ))
    })
}

/// Rejects zero or negative quantities/amounts where the contract requires
/// a positive value.
pub(crate) fn require_positive(field: &str, value: Decimal) -> Result<(), ServiceError> {
    if value <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date("validade", "2027-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2027, 3, 1).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let err = parse_date("validade", "01/03/2027").unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
        assert!(err.to_string().contains("validade"));
    }

    #[test]
    fn require_positive_rejects_zero_and_negative() {
        assert!(require_positive("quantidade", dec!(0)).is_err());
        assert!(require_positive("quantidade", dec!(-1)).is_err());
        assert!(require_positive("quantidade", dec!(0.0001)).is_ok());
    }
}
