//! Parsing of raw form values into typed fields

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// How malformed numeric input is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Non-numeric input becomes zero
    #[default]
    Lenient,
    /// Non-numeric input is an [`FarmError::InvalidInput`]
    Strict,
}

impl InputPolicy {
    /// Parse an amount according to this policy
    pub fn amount(&self, raw: &str) -> FarmResult<BigDecimal> {
        match self {
            InputPolicy::Lenient => Ok(parse_amount(raw)),
            InputPolicy::Strict => parse_amount_strict(raw),
        }
    }
}

/// Parse a decimal amount, defaulting to zero when the input isn't a number
pub fn parse_amount(raw: &str) -> BigDecimal {
    parse_amount_strict(raw).unwrap_or_else(|_| BigDecimal::from(0))
}

/// Parse a decimal amount, rejecting anything that isn't a number
pub fn parse_amount_strict(raw: &str) -> FarmResult<BigDecimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FarmError::InvalidInput("amount is empty".to_string()));
    }

    BigDecimal::from_str(trimmed)
        .map_err(|e| FarmError::InvalidInput(format!("'{}' is not a number: {}", raw, e)))
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(raw: &str) -> FarmResult<NaiveDate> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| FarmError::InvalidInput(format!("'{}' is not a date", raw)))
}

/// Parse an optional date; blank input means "no bound"
pub fn parse_optional_date(raw: &str) -> FarmResult<Option<NaiveDate>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(raw).map(Some)
    }
}

/// Turn blank optional text into `None`
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
