use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

/// Parses a `YYYY-MM-DD` calendar date into epoch milliseconds at UTC midnight.
pub fn parse_date_millis(input: &str) -> Result<i64, ValidationError> {
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(input.trim(), &format).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })?;
    let midnight = date.midnight().assume_utc();
    Ok((midnight.unix_timestamp_nanos() / 1_000_000) as i64)
}

/// Formats epoch milliseconds as an RFC3339 UTC timestamp.
pub fn format_millis_rfc3339(millis: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|value| value.format(&Rfc3339).ok())
        .unwrap_or_else(|| millis.to_string())
}
