/// A synthetic electricity meter. Carries nothing but its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Meter {
    pub meter_id: String,
}

impl Meter {
    pub fn new(meter_id: impl Into<String>) -> Self {
        Self {
            meter_id: meter_id.into(),
        }
    }
}
