use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Static per-product attributes, generated once per simulation run and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
}

/// One sales transaction for a (product, day) pair.
///
/// `revenue` must equal `round2(quantity * unit_price)` at every pipeline
/// stage; transformations return new records instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub transaction_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub revenue: f64,
    pub date: NaiveDate,
}

impl Sale {
    /// Returns a copy with `quantity` replaced and `revenue` recomputed.
    pub fn with_quantity(&self, quantity: u32) -> Sale {
        Sale {
            quantity,
            revenue: round2(f64::from(quantity) * self.unit_price),
            ..self.clone()
        }
    }
}

/// Assignment-bookkeeping copy of a product. The canonical [`Product`]
/// record never carries the `enriched` marker.
///
/// Kept flat rather than nesting a [`Product`] so the record serializes
/// cleanly as a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedProduct {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub enriched: bool,
}

impl EnrichedProduct {
    pub fn new(product: &Product, enriched: bool) -> Self {
        Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            enriched,
        }
    }
}

/// Round to two decimal places, the precision used for prices and revenue.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
