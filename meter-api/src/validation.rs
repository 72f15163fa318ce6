use std::borrow::Cow;

use meter_core::MeterCatalog;
use serde::Deserialize;
use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    Duration, OffsetDateTime, UtcOffset,
};

use crate::error::ApiError;

/// Raw `/meter-usage` query string. Every field is optional here so that a
/// missing parameter is reported through the same error path as a bad one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageQuery {
    pub meter_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// A query that passed validation: known meter, UTC bounds, `start < end`,
/// span within the configured maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageWindow {
    pub meter_id: String,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing query parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("Meter {0} not found")]
    UnknownMeter(String),
    #[error("Invalid timestamp format: {field}={value:?}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("start_time must be before end_time")]
    InvertedRange,
    #[error(
        "Time range too large. Maximum {hours} hours ({max_minutes} minutes) allowed.",
        hours = .max_minutes / 60
    )]
    RangeTooLarge { max_minutes: i64 },
}

impl ValidationError {
    /// Label used on the rejection counter.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::MissingParameter(_) => "missing_parameter",
            ValidationError::UnknownMeter(_) => "unknown_meter",
            ValidationError::InvalidTimestamp { .. } => "invalid_timestamp",
            ValidationError::InvertedRange => "inverted_range",
            ValidationError::RangeTooLarge { .. } => "range_too_large",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::UnknownMeter(meter_id) => ApiError::NotFound { meter_id },
            other => ApiError::InvalidArgument(other.to_string()),
        }
    }
}

/// Parses an ISO-8601 timestamp carrying an offset (`Z` or `±HH:MM`) and
/// normalises it to UTC. A space may stand in for the `T` separator, as
/// RFC 3339 allows. Naive timestamps are rejected.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<OffsetDateTime, ValidationError> {
    let trimmed = value.trim();
    let normalised: Cow<'_, str> = match trimmed.as_bytes().get(DATE_LEN) {
        Some(b' ') => Cow::Owned(format!("{}T{}", &trimmed[..DATE_LEN], &trimmed[DATE_LEN + 1..])),
        _ => Cow::Borrowed(trimmed),
    };

    OffsetDateTime::parse(&normalised, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(&normalised, &Iso8601::DEFAULT))
        .map(|ts| ts.to_offset(UtcOffset::UTC))
        .map_err(|_| ValidationError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Length of the `YYYY-MM-DD` date part preceding the time separator.
const DATE_LEN: usize = 10;

/// True when `span` is longer than `max_minutes`, without overflowing for
/// any configured limit.
fn exceeds_minutes(span: Duration, max_minutes: i64) -> bool {
    let limit_secs = max_minutes.saturating_mul(60);
    let secs = span.whole_seconds();
    secs > limit_secs || (secs == limit_secs && span.subsec_nanoseconds() > 0)
}

/// Pure validation of a usage query against the catalog.
///
/// Rules, checked in order so no computation starts on bad input:
/// - all three parameters present
/// - meter_id is in the catalog
/// - both timestamps parse
/// - start_time strictly before end_time
/// - end_time - start_time no longer than `max_range_minutes`
pub fn validate_usage_query(
    catalog: &MeterCatalog,
    query: UsageQuery,
    max_range_minutes: i64,
) -> Result<UsageWindow, ValidationError> {
    let meter_id = query.meter_id.ok_or(ValidationError::MissingParameter("meter_id"))?;
    let start_raw = query.start_time.ok_or(ValidationError::MissingParameter("start_time"))?;
    let end_raw = query.end_time.ok_or(ValidationError::MissingParameter("end_time"))?;

    if !catalog.is_valid(&meter_id) {
        return Err(ValidationError::UnknownMeter(meter_id));
    }

    let start = parse_timestamp("start_time", &start_raw)?;
    let end = parse_timestamp("end_time", &end_raw)?;

    if start >= end {
        return Err(ValidationError::InvertedRange);
    }

    if exceeds_minutes(end - start, max_range_minutes) {
        return Err(ValidationError::RangeTooLarge {
            max_minutes: max_range_minutes,
        });
    }

    Ok(UsageWindow { meter_id, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const MAX: i64 = 1440;

    fn query(meter_id: &str, start: &str, end: &str) -> UsageQuery {
        UsageQuery {
            meter_id: Some(meter_id.to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
        }
    }

    #[test]
    fn accepts_valid_query() {
        let catalog = MeterCatalog::default();
        let window = validate_usage_query(
            &catalog,
            query("1020100000", "2025-01-01T00:00:00Z", "2025-01-01T00:03:00Z"),
            MAX,
        )
        .unwrap();

        assert_eq!(
            window,
            UsageWindow {
                meter_id: "1020100000".to_string(),
                start: datetime!(2025-01-01 00:00:00 UTC),
                end: datetime!(2025-01-01 00:03:00 UTC),
            }
        );
    }

    #[test]
    fn rejects_unknown_meter() {
        let catalog = MeterCatalog::default();
        let err = validate_usage_query(
            &catalog,
            query("9999999999", "2025-01-01T00:00:00Z", "2025-01-01T00:03:00Z"),
            MAX,
        )
        .unwrap_err();

        assert_eq!(err, ValidationError::UnknownMeter("9999999999".to_string()));
        assert!(matches!(ApiError::from(err), ApiError::NotFound { .. }));
    }

    #[test]
    fn unknown_meter_is_reported_before_bad_timestamps() {
        let catalog = MeterCatalog::default();
        let err = validate_usage_query(&catalog, query("nope", "garbage", "garbage"), MAX).unwrap_err();
        assert_eq!(err.reason(), "unknown_meter");
    }

    #[test]
    fn rejects_missing_parameters() {
        let catalog = MeterCatalog::default();
        let mut q = query("1020100000", "2025-01-01T00:00:00Z", "2025-01-01T00:03:00Z");
        q.end_time = None;

        assert_eq!(
            validate_usage_query(&catalog, q, MAX).unwrap_err(),
            ValidationError::MissingParameter("end_time")
        );
        assert_eq!(
            validate_usage_query(&catalog, UsageQuery::default(), MAX).unwrap_err(),
            ValidationError::MissingParameter("meter_id")
        );
    }

    #[test]
    fn rejects_unparseable_and_naive_timestamps() {
        let catalog = MeterCatalog::default();
        for bad in ["yesterday", "2025-13-01T00:00:00Z", "2025-01-01T00:00:00", ""] {
            let err = validate_usage_query(
                &catalog,
                query("1020100000", bad, "2025-01-01T00:03:00Z"),
                MAX,
            )
            .unwrap_err();
            assert_eq!(err.reason(), "invalid_timestamp", "accepted {bad:?}");
            assert!(matches!(ApiError::from(err), ApiError::InvalidArgument(_)));
        }
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        assert_eq!(
            parse_timestamp("start_time", "2025-01-01T02:00:00+02:00").unwrap(),
            datetime!(2025-01-01 00:00:00 UTC)
        );
        assert_eq!(
            parse_timestamp("start_time", "2025-01-01T00:00:00+00:00").unwrap(),
            parse_timestamp("start_time", "2025-01-01T00:00:00Z").unwrap()
        );
    }

    #[test]
    fn rejects_equal_and_inverted_bounds() {
        let catalog = MeterCatalog::default();
        let equal = validate_usage_query(
            &catalog,
            query("1020100000", "2025-01-01T00:00:00Z", "2025-01-01T00:00:00Z"),
            MAX,
        );
        assert_eq!(equal.unwrap_err(), ValidationError::InvertedRange);

        let inverted = validate_usage_query(
            &catalog,
            query("1020100000", "2025-01-01T01:00:00Z", "2025-01-01T00:00:00Z"),
            MAX,
        );
        assert_eq!(inverted.unwrap_err(), ValidationError::InvertedRange);
    }

    #[test]
    fn range_of_exactly_1440_minutes_is_accepted() {
        let catalog = MeterCatalog::default();
        assert!(validate_usage_query(
            &catalog,
            query("1020100000", "2025-01-01T00:00:00Z", "2025-01-02T00:00:00Z"),
            MAX,
        )
        .is_ok());
    }

    #[test]
    fn range_of_1441_minutes_is_rejected() {
        let catalog = MeterCatalog::default();
        let err = validate_usage_query(
            &catalog,
            query("1020100000", "2025-01-01T00:00:00Z", "2025-01-02T00:01:00Z"),
            MAX,
        )
        .unwrap_err();

        assert_eq!(err, ValidationError::RangeTooLarge { max_minutes: 1440 });
        assert_eq!(
            err.to_string(),
            "Time range too large. Maximum 24 hours (1440 minutes) allowed."
        );
    }

    #[test]
    fn range_a_few_seconds_over_1440_minutes_is_rejected() {
        let catalog = MeterCatalog::default();
        let err = validate_usage_query(
            &catalog,
            query("1020100000", "2025-01-01T00:00:00Z", "2025-01-02T00:00:30Z"),
            MAX,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::RangeTooLarge { max_minutes: 1440 });

        let err = validate_usage_query(
            &catalog,
            query("1020100000", "2025-01-01T00:00:00Z", "2025-01-02T00:00:00.001Z"),
            MAX,
        )
        .unwrap_err();
        assert_eq!(err.reason(), "range_too_large");
    }

    #[test]
    fn very_large_range_limit_does_not_overflow() {
        let catalog = MeterCatalog::default();
        let window = validate_usage_query(
            &catalog,
            query("1020100000", "2025-01-01T00:00:00Z", "2025-01-03T00:00:00Z"),
            i64::MAX,
        );
        assert!(window.is_ok());
    }

    #[test]
    fn space_separator_is_accepted() {
        assert_eq!(
            parse_timestamp("start_time", "2025-01-01 00:00:00Z").unwrap(),
            datetime!(2025-01-01 00:00:00 UTC)
        );
        assert_eq!(
            parse_timestamp("start_time", "2025-01-01 02:00:00+02:00").unwrap(),
            datetime!(2025-01-01 00:00:00 UTC)
        );
        assert!(parse_timestamp("start_time", "2025-01-01 00:00:00").is_err());
    }
}
