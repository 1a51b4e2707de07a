use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::debug;

use retailsim_core::{EnrichedProduct, Sale};

use crate::effect::{EffectContext, EffectFn};
use crate::errors::EnrichResult;

/// Apply a treatment effect to the sales of treated products.
///
/// Every row belonging to a treated product is replaced by the effect
/// function's output; rows for untreated products pass through unchanged.
/// Rows are not pre-filtered by date, the effect function compares the
/// sale date against the cutover itself.
pub fn apply_enrichment_to_sales(
    sales: &[Sale],
    enriched_products: &[EnrichedProduct],
    cutover: NaiveDate,
    effect_fn: &EffectFn,
    params: Map<String, Value>,
) -> EnrichResult<Vec<Sale>> {
    let treated_ids: HashSet<&str> = enriched_products
        .iter()
        .filter(|product| product.enriched)
        .map(|product| product.product_id.as_str())
        .collect();

    let ctx = EffectContext::new(cutover, params);

    let mut treated_rows = 0_usize;
    let mut out = Vec::with_capacity(sales.len());
    for sale in sales {
        if treated_ids.contains(sale.product_id.as_str()) {
            treated_rows += 1;
            out.push(effect_fn(sale, &ctx)?);
        } else {
            out.push(sale.clone());
        }
    }

    debug!(
        treated_products = treated_ids.len(),
        treated_rows,
        total_rows = sales.len(),
        "applied enrichment effect"
    );

    Ok(out)
}
