//! Fare catalog resolution.
//!
//! Translates a desired cart (N cars, N adults) into priced line items
//! using the two upstream catalogs: the capacity-unit to item-code
//! mapping table and the price table. Resolution is all-or-nothing: if
//! any requested category cannot be priced, the whole cart fails.

use std::collections::HashMap;
use std::fmt;

use crate::praamid::types::{CapacityMapping, PriceEntry};

use super::types::{BoardingPass, CodeName, CodeRef, VehicleCountry};

/// Capacity-unit code for a regular passenger car.
pub const VEHICLE_CAPACITY_UNIT: &str = "M1";

/// Capacity-unit code for an adult passenger.
pub const PASSENGER_CAPACITY_UNIT: &str = "P";

/// The only price category this flow books.
pub const REGULAR_PRICE_CATEGORY: &str = "REGULAR";

/// A requested cart: quantities plus the vehicle plate, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartRequest {
    pub num_cars: u32,
    pub num_adults: u32,
    pub vehicle_reg_nr: Option<String>,
}

/// The two fare categories this flow resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareCategory {
    Car,
    AdultPassenger,
}

impl FareCategory {
    fn capacity_unit(self) -> &'static str {
        match self {
            FareCategory::Car => VEHICLE_CAPACITY_UNIT,
            FareCategory::AdultPassenger => PASSENGER_CAPACITY_UNIT,
        }
    }
}

impl fmt::Display for FareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FareCategory::Car => write!(f, "car"),
            FareCategory::AdultPassenger => write!(f, "adult passenger"),
        }
    }
}

/// Fare resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FareError {
    /// A category was requested but no mapping or price exists for it.
    #[error("{category} item ({unit}/REGULAR) not found in item mappings or price catalog", category = .0, unit = .0.capacity_unit())]
    ItemUnresolved(FareCategory),
}

/// Build the item-code to unit-amount map from the price catalog.
///
/// Entries without a code or amount are skipped; duplicate codes
/// overwrite earlier ones (last write wins).
pub fn build_price_map(prices: &[PriceEntry]) -> HashMap<String, f64> {
    let mut map = HashMap::new();
    for entry in prices {
        let code = entry.item.as_ref().and_then(|item| item.code.clone());
        let (Some(code), Some(amount)) = (code, entry.amount) else {
            continue;
        };
        map.insert(code, amount);
    }
    map
}

/// Resolve the cart into priced boarding passes.
///
/// A cart with zero of both categories resolves to an empty list with no
/// error; whether that is acceptable is the caller's policy decision.
pub fn resolve_boarding_passes(
    mappings: &[CapacityMapping],
    prices: &[PriceEntry],
    cart: &CartRequest,
) -> Result<Vec<BoardingPass>, FareError> {
    let price_map = build_price_map(prices);
    let mut passes = Vec::new();

    if cart.num_cars > 0 {
        let (item_code, item_price) = lookup(mappings, &price_map, FareCategory::Car)?;
        passes.push(car_pass(
            item_code,
            item_price,
            cart.num_cars,
            cart.vehicle_reg_nr.as_deref(),
        ));
    }

    if cart.num_adults > 0 {
        let (item_code, item_price) = lookup(mappings, &price_map, FareCategory::AdultPassenger)?;
        passes.push(adult_pass(item_code, item_price, cart.num_adults));
    }

    Ok(passes)
}

/// Find the item code and unit price for one category.
///
/// First mapping match in catalog order wins; the catalog is assumed to
/// hold at most one REGULAR entry per capacity unit, but if it does not,
/// the earliest listed entry is taken deterministically.
fn lookup<'a>(
    mappings: &'a [CapacityMapping],
    price_map: &HashMap<String, f64>,
    category: FareCategory,
) -> Result<(&'a str, f64), FareError> {
    let item_code = mappings
        .iter()
        .find(|m| {
            m.capacity_unit_code.as_deref() == Some(category.capacity_unit())
                && m.price_category.as_deref() == Some(REGULAR_PRICE_CATEGORY)
        })
        .and_then(|m| m.item_code.as_deref())
        .ok_or(FareError::ItemUnresolved(category))?;

    let item_price = *price_map
        .get(item_code)
        .ok_or(FareError::ItemUnresolved(category))?;

    Ok((item_code, item_price))
}

fn car_pass(item_code: &str, item_price: f64, quantity: u32, plate: Option<&str>) -> BoardingPass {
    let plate = plate.unwrap_or_default();
    BoardingPass {
        capacity_unit: CodeName {
            code: VEHICLE_CAPACITY_UNIT.to_string(),
            name: Some("Sõiduauto (M1)".to_string()),
        },
        quantity,
        item: CodeName {
            code: item_code.to_string(),
            name: Some("Sõiduauto".to_string()),
        },
        price_category: None,
        item_price,
        amount: item_price * f64::from(quantity),
        vehicle_reg_nr: plate.to_string(),
        vehicle_country: (!plate.is_empty()).then(VehicleCountry::estonia),
        dci: "D".to_string(),
        discount_subjects: None,
    }
}

fn adult_pass(item_code: &str, item_price: f64, quantity: u32) -> BoardingPass {
    BoardingPass {
        capacity_unit: CodeName {
            code: PASSENGER_CAPACITY_UNIT.to_string(),
            name: Some("Reisija".to_string()),
        },
        quantity,
        item: CodeName {
            code: item_code.to_string(),
            name: Some("Reisija täispilet".to_string()),
        },
        price_category: Some(CodeRef::new(REGULAR_PRICE_CATEGORY)),
        item_price,
        amount: item_price * f64::from(quantity),
        vehicle_reg_nr: String::new(),
        vehicle_country: None,
        dci: "D".to_string(),
        discount_subjects: None,
    }
}
