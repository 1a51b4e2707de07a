use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use retailsim_core::{EnrichedProduct, Product};

use crate::errors::{EnrichError, EnrichResult};

/// Assign the enrichment treatment to a fixed-size random sample of
/// products.
///
/// Exactly `floor(n * fraction)` products are drawn without replacement
/// from a private rng seeded with `seed`, so the treated set is fully
/// determined by `(seed, fraction, product count)`. The input list is
/// never mutated; tagged copies are returned in input order.
pub fn assign_enrichment(
    products: &[Product],
    fraction: f64,
    seed: u64,
) -> EnrichResult<Vec<EnrichedProduct>> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(EnrichError::InvalidFraction(fraction));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n_enriched = (products.len() as f64 * fraction).floor() as usize;

    let mut treated = vec![false; products.len()];
    for index in rand::seq::index::sample(&mut rng, products.len(), n_enriched) {
        treated[index] = true;
    }

    Ok(products
        .iter()
        .zip(treated)
        .map(|(product, enriched)| EnrichedProduct::new(product, enriched))
        .collect())
}
