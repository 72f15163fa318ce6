pub mod catalog;
pub mod domain;
pub mod error;
pub mod series;
pub mod waveform;

pub use catalog::MeterCatalog;
pub use domain::{Meter, UsageReading};
pub use error::{CatalogError, WaveformError};
pub use series::{series, UsageSeries};
pub use waveform::usage_value;
