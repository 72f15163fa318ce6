pub mod meter;
pub mod usage_reading;

pub use meter::Meter;
pub use usage_reading::UsageReading;
