#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WaveformError {
    #[error("meter id '{0}' does not end in a numeric suffix")]
    MalformedMeterId(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog size {requested} exceeds the {max} identifiers the numbering scheme can hold")]
    TooLarge { requested: usize, max: usize },
}
