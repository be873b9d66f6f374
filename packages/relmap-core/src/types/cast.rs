//! Shared casting helpers.

use chrono::format::{Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::characteristics::{DefaultValue, Formatted, Nullable};
use crate::error::CastError;
use crate::metadata::{Field, Metadata};
use crate::value::{Value, DEFAULT_DATE_FORMAT};

/// Value for a missing input: null when nullable, else the field default,
/// else `zero`.
pub(crate) fn absent(field: &Field, zero: Value) -> Value {
    if field.is::<Nullable>() {
        return Value::Null;
    }
    field
        .characteristic::<DefaultValue>()
        .map(|d| d.value.clone())
        .unwrap_or(zero)
}

/// Date format for a field: its own `Formatted`, then the owning connection's,
/// then [`DEFAULT_DATE_FORMAT`].
pub(crate) fn date_format(field: &Field, metadata: &dyn Metadata) -> String {
    if let Some(formatted) = field.characteristic::<Formatted>() {
        return formatted.format.clone();
    }
    metadata
        .as_entity()
        .and_then(|entity| entity.connection())
        .map(|connection| connection.date_format().to_string())
        .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string())
}

/// Parses a date-time string with the field's [`date_format`]. A `Formatted`
/// field is parsed strictly; otherwise the common layouts are tried after the
/// connection format.
pub(crate) fn parse_date_time(
    field: &Field,
    metadata: &dyn Metadata,
    raw: &str,
) -> Result<NaiveDateTime, CastError> {
    let format = date_format(field, metadata);
    let invalid = || CastError::InvalidDateTime {
        field: field.property().to_string(),
        value: raw.to_string(),
        format: format.clone(),
    };

    let trimmed = raw.trim();
    if let Some(parsed) = parse_with_format(trimmed, &format) {
        return Ok(parsed);
    }
    if field.is::<Formatted>() {
        return Err(invalid());
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, DEFAULT_DATE_FORMAT) {
        return Ok(parsed);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)
}

/// Parses with a strftime pattern that may leave out the time or parts of
/// the date. Missing month and day become 1, a missing time is midnight.
fn parse_with_format(raw: &str, format: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, raw, StrftimeItems::new(format)).ok()?;

    let week_based = parsed.ordinal().is_some()
        || parsed.isoweek().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some();
    if !week_based {
        if parsed.month().is_none() {
            parsed.set_month(1).ok()?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1).ok()?;
        }
    }
    let date = parsed.to_naive_date().ok()?;

    if parsed.hour_div_12().is_none() && parsed.hour_mod_12().is_none() {
        return date.and_hms_opt(0, 0, 0);
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0).ok()?;
    }
    parsed.to_naive_time().ok().map(|time| date.and_time(time))
}

/// Date-time from a unix timestamp.
pub(crate) fn from_timestamp(field: &Field, seconds: i64) -> Result<NaiveDateTime, CastError> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| CastError::InvalidDateTime {
            field: field.property().to_string(),
            value: seconds.to_string(),
            format: "%s".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_with_partial_formats() {
        assert_eq!(parse_with_format("2024", "%Y"), Some(at(2024, 1, 1, 0, 0)));
        assert_eq!(parse_with_format("09/03/2024", "%d/%m/%Y"), Some(at(2024, 3, 9, 0, 0)));
        assert_eq!(parse_with_format("2024-03-09 14", "%Y-%m-%d %H"), Some(at(2024, 3, 9, 14, 0)));
        assert_eq!(
            parse_with_format("2024-03-09 14:05:00", DEFAULT_DATE_FORMAT),
            Some(at(2024, 3, 9, 14, 5))
        );
    }

    #[test]
    fn test_parse_with_rejects_mismatch() {
        assert_eq!(parse_with_format("2024-03-09", "%Y"), None);
        assert_eq!(parse_with_format("31/02/2024", "%d/%m/%Y"), None);
    }
}
