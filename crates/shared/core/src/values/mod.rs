use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ParseError;

/// Share count - executions are always whole units
pub type Quantity = u64;

/// Exchange-local wall clock time of a replayed session
pub type Timestamp = NaiveDateTime;

/// Trading day of a replayed session
pub type TradingDate = NaiveDate;

/// Ticker of a replayed security
pub type Security = String;

/// Compact date format used by the historical data store (e.g. `20190621`)
const DATE_FORMAT: &str = "%Y%m%d";

/// Parse a `YYYYMMDD` trading date
pub fn parse_date(value: &str) -> Result<TradingDate, ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(value.to_string()))
}

/// Format a trading date as `YYYYMMDD`
pub fn format_date(date: TradingDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
