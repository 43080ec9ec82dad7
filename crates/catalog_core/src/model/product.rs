//! Product entity model.
//!
//! # Responsibility
//! - Define the persisted shape of one catalog product.
//! - Provide the derived, never-stored `description` projection.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never reused.
//! - All nine business fields are always populated once persisted.
//! - `price` carries two fractional digits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Storage-assigned identifier of a product row.
pub type ProductId = i64;

/// Separator placed between the two description halves.
pub const DESCRIPTION_SEPARATOR: &str = " <br/> ";

/// Maximum stored length of `name`, in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum stored length of `category`, in characters.
pub const CATEGORY_MAX_CHARS: usize = 50;
/// Maximum stored length of each description half, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Number of fractional digits kept for `price`.
pub const PRICE_SCALE: u32 = 2;
/// Largest absolute `price` in minor units (`DECIMAL(10, 2)`).
pub const PRICE_MAX_MINOR_UNITS: i64 = 9_999_999_999;

/// Persisted product record as owned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntity {
    pub id: ProductId,
    pub name: String,
    /// Absolute URL of the product photo.
    pub photo: String,
    pub category: String,
    pub offer_of_the_month: bool,
    pub availability: bool,
    pub self_pickup: bool,
    pub description1: String,
    pub description2: String,
    /// Non-negative by convention; not enforced here.
    pub price: Decimal,
}

impl ProductEntity {
    /// Returns both description halves joined with [`DESCRIPTION_SEPARATOR`].
    pub fn description(&self) -> String {
        compose_description(&self.description1, &self.description2)
    }
}

pub(crate) fn compose_description(first: &str, second: &str) -> String {
    format!("{first}{DESCRIPTION_SEPARATOR}{second}")
}

/// Converts a price to minor units, rounding half-to-even at
/// [`PRICE_SCALE`] decimals.
///
/// Returns `None` when the rounded price exceeds [`PRICE_MAX_MINOR_UNITS`].
pub fn price_to_minor_units(price: Decimal) -> Option<i64> {
    let mut scaled = price.round_dp(PRICE_SCALE);
    scaled.rescale(PRICE_SCALE);
    if scaled.scale() != PRICE_SCALE {
        return None;
    }
    i64::try_from(scaled.mantissa())
        .ok()
        .filter(|units| units.abs() <= PRICE_MAX_MINOR_UNITS)
}

pub fn price_from_minor_units(units: i64) -> Decimal {
    Decimal::new(units, PRICE_SCALE)
}

#[cfg(test)]
mod tests {
    use super::{price_from_minor_units, price_to_minor_units, ProductEntity};
    use rust_decimal::Decimal;

    #[test]
    fn description_joins_both_halves() {
        let entity = ProductEntity {
            id: 7,
            name: "Lamp".to_string(),
            photo: "http://x/lamp.jpg".to_string(),
            category: "Lighting".to_string(),
            offer_of_the_month: false,
            availability: true,
            self_pickup: true,
            description1: "Warm light".to_string(),
            description2: "E27 socket".to_string(),
            price: Decimal::new(4500, 2),
        };

        assert_eq!(entity.description(), "Warm light <br/> E27 socket");
    }

    #[test]
    fn minor_units_round_half_even_and_keep_two_decimals() {
        assert_eq!(price_to_minor_units(Decimal::new(20, 0)), Some(2000));
        assert_eq!(price_to_minor_units(Decimal::new(24995, 3)), Some(2500));
        assert_eq!(price_to_minor_units(Decimal::new(24985, 3)), Some(2498));
        assert_eq!(price_from_minor_units(2000).to_string(), "20.00");
    }

    #[test]
    fn minor_units_reject_prices_beyond_ten_digits() {
        assert_eq!(
            price_to_minor_units(Decimal::new(9_999_999_999, 2)),
            Some(9_999_999_999)
        );
        assert_eq!(price_to_minor_units(Decimal::new(100_000_000_000, 0)), None);
        assert_eq!(price_to_minor_units(Decimal::new(-100_000_000_000, 0)), None);
        assert_eq!(price_to_minor_units(Decimal::MAX), None);
    }
}
