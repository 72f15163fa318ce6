use std::collections::HashSet;

use crate::{domain::Meter, error::CatalogError};

pub const METER_ID_PREFIX: &str = "1020";
pub const DEFAULT_CATALOG_SIZE: usize = 1000;

/// First numeric suffix handed out; keeps every suffix at six digits.
const FIRST_SUFFIX: usize = 100_000;
const LAST_SUFFIX: usize = 999_999;

/// Largest catalog the `<prefix><6-digit suffix>` scheme can hold.
pub const MAX_CATALOG_SIZE: usize = LAST_SUFFIX - FIRST_SUFFIX + 1;

/// Fixed, ordered set of meters built once at startup.
///
/// The catalog is never mutated after construction, so it can be shared by
/// reference across request handlers without synchronization.
#[derive(Debug, Clone)]
pub struct MeterCatalog {
    meters: Vec<Meter>,
    index: HashSet<String>,
}

impl MeterCatalog {
    pub fn new(size: usize) -> Result<Self, CatalogError> {
        if size > MAX_CATALOG_SIZE {
            return Err(CatalogError::TooLarge {
                requested: size,
                max: MAX_CATALOG_SIZE,
            });
        }
        Ok(Self::generate(size))
    }

    fn generate(size: usize) -> Self {
        let meters: Vec<Meter> = (0..size)
            .map(|i| Meter::new(format!("{METER_ID_PREFIX}{:06}", FIRST_SUFFIX + i)))
            .collect();
        let index = meters.iter().map(|m| m.meter_id.clone()).collect();

        Self { meters, index }
    }

    /// All meters, in catalog order.
    pub fn list_meters(&self) -> &[Meter] {
        &self.meters
    }

    pub fn is_valid(&self, meter_id: &str) -> bool {
        self.index.contains(meter_id)
    }

    pub fn len(&self) -> usize {
        self.meters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }
}

impl Default for MeterCatalog {
    fn default() -> Self {
        Self::generate(DEFAULT_CATALOG_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_1000_sequential_ids() {
        let catalog = MeterCatalog::default();
        let meters = catalog.list_meters();

        assert_eq!(meters.len(), 1000);
        assert_eq!(meters[0].meter_id, "1020100000");
        assert_eq!(meters[1].meter_id, "1020100001");
        assert_eq!(meters[999].meter_id, "1020100999");
    }

    #[test]
    fn listing_is_stable_across_calls() {
        let catalog = MeterCatalog::default();
        assert_eq!(catalog.list_meters(), catalog.list_meters());
        assert_eq!(MeterCatalog::default().list_meters(), catalog.list_meters());
    }

    #[test]
    fn ids_do_not_collide() {
        let catalog = MeterCatalog::default();
        let unique: HashSet<_> = catalog.list_meters().iter().map(|m| &m.meter_id).collect();
        assert_eq!(unique.len(), catalog.len());
    }

    #[test]
    fn membership_matches_generated_ids() {
        let catalog = MeterCatalog::default();

        assert!(catalog.is_valid("1020100000"));
        assert!(catalog.is_valid("1020100999"));
        assert!(!catalog.is_valid("1020101000"));
        assert!(!catalog.is_valid("9999999999"));
        assert!(!catalog.is_valid(""));
    }

    #[test]
    fn configured_size_is_honoured() {
        let catalog = MeterCatalog::new(25).unwrap();
        assert_eq!(catalog.len(), 25);
        assert!(catalog.is_valid("1020100024"));
        assert!(!catalog.is_valid("1020100025"));

        assert!(MeterCatalog::new(0).unwrap().is_empty());
    }

    #[test]
    fn oversized_catalog_is_rejected() {
        let err = MeterCatalog::new(MAX_CATALOG_SIZE + 1).unwrap_err();
        assert_eq!(
            err,
            CatalogError::TooLarge {
                requested: MAX_CATALOG_SIZE + 1,
                max: MAX_CATALOG_SIZE,
            }
        );
    }
}
