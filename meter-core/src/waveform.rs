//! Deterministic synthetic load shape.
//!
//! A reading is a pure function of the UTC wall-clock minute and a per-meter
//! key taken from the trailing six digits of the meter id. The key is split
//! into three decimal buckets so neighbouring meters get visibly different
//! profiles:
//!
//! - units digit: base load and overall magnitude
//! - tens digit: how far the daily curve is shifted in time
//! - hundreds digit: morning vs evening weighting of the two usage spikes

use std::f64::consts::PI;

use time::{OffsetDateTime, UtcOffset};

use crate::error::WaveformError;

const KEY_DIGITS: usize = 6;

const HOURS_PER_DAY: f64 = 24.0;
/// Phase reference of the daily cosine: the curve is lowest here on the
/// shifted clock and highest twelve hours later.
const PEAK_HOUR: f64 = 14.0;
const SHIFT_OFFSET_HOURS: f64 = 4.0;

const BASE_LOAD_MIN: f64 = 3.0;
const DAILY_SWING: f64 = 8.0;

const MORNING_PEAK_HOUR: f64 = 7.5;
const MORNING_AMPLITUDE: f64 = 5.0;
const EVENING_PEAK_HOUR: f64 = 19.0;
const EVENING_AMPLITUDE: f64 = 6.0;

const RIPPLE_AMPLITUDE: f64 = 0.5;
const RIPPLE_FREQUENCY: f64 = 0.1;

/// Upper bound on the change between two consecutive minutes for any meter,
/// including across hour and day boundaries.
pub const MAX_MINUTE_STEP: f64 = 0.5;

/// Per-meter shape parameters, each in `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeterProfile {
    pub magnitude_bucket: u32,
    pub time_shift_bucket: u32,
    pub pattern_bucket: u32,
}

impl MeterProfile {
    pub fn from_key(key: u32) -> Self {
        Self {
            magnitude_bucket: key % 10,
            time_shift_bucket: (key / 10) % 10,
            pattern_bucket: (key / 100) % 10,
        }
    }

    fn base_load(&self) -> f64 {
        BASE_LOAD_MIN + f64::from(self.magnitude_bucket)
    }

    /// 0.5x to 1.5x.
    fn magnitude(&self) -> f64 {
        0.5 + f64::from(self.magnitude_bucket) / 9.0
    }

    fn morning_weight(&self) -> f64 {
        f64::from(10 - self.pattern_bucket) / 10.0
    }

    fn evening_weight(&self) -> f64 {
        f64::from(self.pattern_bucket) / 10.0
    }

    /// Moves the meter's clock by -5..=+4 hours, wrapped into `[0, 24)`.
    fn shift_hour(&self, hour: f64) -> f64 {
        (hour - f64::from(self.time_shift_bucket) + SHIFT_OFFSET_HOURS).rem_euclid(HOURS_PER_DAY)
    }
}

/// Numeric key embedded in the last six characters of a meter id.
pub fn meter_key(meter_id: &str) -> Result<u32, WaveformError> {
    let malformed = || WaveformError::MalformedMeterId(meter_id.to_string());

    let start = meter_id.len().saturating_sub(KEY_DIGITS);
    let suffix = meter_id.get(start..).ok_or_else(malformed)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    suffix.parse().map_err(|_| malformed())
}

/// Usage for `meter_id` during the minute containing `ts`.
pub fn usage_value(ts: OffsetDateTime, meter_id: &str) -> Result<f64, WaveformError> {
    let key = meter_key(meter_id)?;
    Ok(usage_value_for_key(ts, key))
}

pub fn usage_value_for_key(ts: OffsetDateTime, key: u32) -> f64 {
    let ts = ts.to_offset(UtcOffset::UTC);
    let profile = MeterProfile::from_key(key);

    let minute = f64::from(ts.minute());
    let hour = f64::from(ts.hour()) + minute / 60.0;
    let shifted = profile.shift_hour(hour);

    let daily = -((shifted - PEAK_HOUR) * (2.0 * PI / HOURS_PER_DAY)).cos();

    let morning = gaussian(shifted, MORNING_PEAK_HOUR) * MORNING_AMPLITUDE * profile.morning_weight();
    let evening = gaussian(shifted, EVENING_PEAK_HOUR) * EVENING_AMPLITUDE * profile.evening_weight();

    let ripple = (minute * RIPPLE_FREQUENCY + f64::from(key) * RIPPLE_FREQUENCY).sin() * RIPPLE_AMPLITUDE;

    let usage = profile.base_load()
        + ((daily + 1.0) * DAILY_SWING + morning + evening) * profile.magnitude()
        + ripple;

    round_to_cents(usage.max(0.0))
}

fn gaussian(x: f64, centre: f64) -> f64 {
    (-(x - centre).powi(2) / 2.0).exp()
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
