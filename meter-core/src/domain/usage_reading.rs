use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime, UtcOffset};

/// Wire format for reading timestamps: UTC, whole seconds, literal `Z`.
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// One minute of synthetic usage for a meter.
///
/// Readings are produced on demand and never stored. `ts` is always held in
/// UTC; sub-second precision is dropped when the timestamp is formatted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UsageReading {
    #[cfg_attr(
        feature = "serde",
        serde(rename = "timestamp", serialize_with = "serialize_timestamp")
    )]
    pub ts: OffsetDateTime,
    pub value: f64,
}

impl UsageReading {
    pub fn new(ts: OffsetDateTime, value: f64) -> Self {
        Self {
            ts: ts.to_offset(UtcOffset::UTC),
            value,
        }
    }

    pub fn timestamp_string(&self) -> Result<String, time::error::Format> {
        self.ts.format(TIMESTAMP_FORMAT)
    }
}

#[cfg(feature = "serde")]
fn serialize_timestamp<S>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let formatted = ts.format(TIMESTAMP_FORMAT).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}
