//! Built-in treatment effect functions.
//!
//! Each function receives a sale row plus the [`EffectContext`] and returns
//! a new row. Rows dated strictly before the cutover pass through
//! untouched.

use retailsim_core::Sale;

use crate::effect::EffectContext;
use crate::errors::EnrichResult;

/// Effect size used when the spec does not provide one.
pub const DEFAULT_EFFECT_SIZE: f64 = 0.5;

/// Length of the [`combined_boost`] ramp-up window, in days.
pub const RAMP_DAYS: i64 = 7;

/// Scale quantity by `(1 + effect_size)` on/after the cutover, flooring to
/// an integer and recomputing revenue.
pub fn quantity_boost(sale: &Sale, ctx: &EffectContext) -> EnrichResult<Sale> {
    if sale.date < ctx.start {
        return Ok(sale.clone());
    }
    let effect_size = ctx.params.get_f64("effect_size").unwrap_or(DEFAULT_EFFECT_SIZE);
    Ok(scale_quantity(sale, effect_size))
}

/// Boost probability of sale, approximated by scaling quantity.
///
/// Sales are already generated when enrichment runs, so a higher
/// probability of sale cannot be realized directly; post-hoc quantity
/// scaling stands in for it.
pub fn probability_boost(sale: &Sale, ctx: &EffectContext) -> EnrichResult<Sale> {
    quantity_boost(sale, ctx)
}

/// Quantity boost with a linear ramp: the effect grows from zero to
/// `effect_size` over [`RAMP_DAYS`] days after the cutover, then holds.
pub fn combined_boost(sale: &Sale, ctx: &EffectContext) -> EnrichResult<Sale> {
    if sale.date < ctx.start {
        return Ok(sale.clone());
    }
    let effect_size = ctx.params.get_f64("effect_size").unwrap_or(DEFAULT_EFFECT_SIZE);
    let days_since_start = (sale.date - ctx.start).num_days();
    let ramp_factor = (days_since_start as f64 / RAMP_DAYS as f64).min(1.0);
    Ok(scale_quantity(sale, effect_size * ramp_factor))
}

fn scale_quantity(sale: &Sale, effect: f64) -> Sale {
    let scaled = (f64::from(sale.quantity) * (1.0 + effect)).floor() as u32;
    sale.with_quantity(scaled)
}
