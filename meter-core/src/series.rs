use time::{Duration, OffsetDateTime};

use crate::{
    domain::UsageReading,
    error::WaveformError,
    waveform::{meter_key, usage_value_for_key},
};

pub const STEP: Duration = Duration::MINUTE;

/// Lazily walks `[start, end)` one minute at a time.
///
/// The cursor is advanced with integer `Duration` arithmetic, so long walks
/// never drift off the minute grid set by `start`.
#[derive(Debug, Clone)]
pub struct UsageSeries {
    key: u32,
    cursor: Option<OffsetDateTime>,
    end: OffsetDateTime,
}

impl UsageSeries {
    pub fn new(meter_id: &str, start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, WaveformError> {
        Ok(Self::for_key(meter_key(meter_id)?, start, end))
    }

    pub fn for_key(key: u32, start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            key,
            cursor: Some(start),
            end,
        }
    }

    /// Number of readings still to be produced.
    pub fn remaining(&self) -> usize {
        match self.cursor {
            Some(cursor) if cursor < self.end => {
                let span = self.end - cursor;
                let whole = span.whole_minutes();
                let partial = span - Duration::minutes(whole) > Duration::ZERO;
                usize::try_from(whole).unwrap_or(usize::MAX) + usize::from(partial)
            }
            _ => 0,
        }
    }
}

impl Iterator for UsageSeries {
    type Item = UsageReading;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.filter(|c| *c < self.end)?;
        // Stop rather than panic at the edge of the representable range.
        self.cursor = cursor.checked_add(STEP);
        Some(UsageReading::new(cursor, usage_value_for_key(cursor, self.key)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

// Every instant produced lies before `end`, so stepping never runs off the
// representable range early and `remaining` is exact.
impl ExactSizeIterator for UsageSeries {}

/// One reading per minute in `[start, end)`, in strictly increasing order.
///
/// Returns an empty series when `start >= end`; callers are expected to have
/// rejected such ranges already.
pub fn series(
    meter_id: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<UsageReading>, WaveformError> {
    Ok(UsageSeries::new(meter_id, start, end)?.collect())
}
