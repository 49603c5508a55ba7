//! Field validation shared by the admin routes.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ApiError;

/// Prices may be absent but never negative.
pub fn validate_price(price: Option<Decimal>) -> Result<(), ApiError> {
    match price {
        Some(p) if p < Decimal::ZERO => Err(ApiError::validation(
            "Price must be a positive number",
        )),
        _ => Ok(()),
    }
}

/// Parse a "YYYY-MM-DD" date; `field` names the date in the error
/// message ("start", "end", ...).
pub fn parse_iso_date(raw: &str, field: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ApiError::validation(format!("Invalid {field} date format. Use YYYY-MM-DD"))
    })
}

/// When both bounds are present, the end may not precede the start.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ApiError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ApiError::validation("End date must be after start date"));
        }
    }
    Ok(())
}
