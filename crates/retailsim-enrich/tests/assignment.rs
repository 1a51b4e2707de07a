use retailsim_core::Product;
use retailsim_enrich::{EnrichError, assign_enrichment};

fn products(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| Product {
            product_id: format!("PROD{:04}", i + 1),
            name: "Novel".to_string(),
            category: "Books".to_string(),
            price: 12.5,
        })
        .collect()
}

#[test]
fn treated_set_size_is_exact_for_any_seed() {
    let products = products(100);
    for seed in [0_u64, 1, 42, 7777, u64::MAX] {
        let enriched = assign_enrichment(&products, 0.5, seed).expect("assign");
        let treated = enriched.iter().filter(|p| p.enriched).count();
        assert_eq!(treated, 50, "seed {seed}");
    }
}

#[test]
fn treated_set_size_floors() {
    let products = products(10);
    let enriched = assign_enrichment(&products, 0.33, 1).expect("assign");
    assert_eq!(enriched.iter().filter(|p| p.enriched).count(), 3);
}

#[test]
fn assignment_is_deterministic() {
    let products = products(60);
    let a = assign_enrichment(&products, 0.4, 42).expect("assign");
    let b = assign_enrichment(&products, 0.4, 42).expect("assign");
    assert_eq!(a, b);
}

#[test]
fn different_seeds_can_differ() {
    let products = products(60);
    let a = assign_enrichment(&products, 0.4, 1).expect("assign");
    let b = assign_enrichment(&products, 0.4, 2).expect("assign");
    let ids = |rows: &[retailsim_core::EnrichedProduct]| -> Vec<String> {
        rows.iter()
            .filter(|p| p.enriched)
            .map(|p| p.product_id.clone())
            .collect()
    };
    assert_ne!(ids(&a), ids(&b));
}

#[test]
fn zero_fraction_treats_nothing_and_one_treats_everything() {
    let products = products(20);

    let none = assign_enrichment(&products, 0.0, 42).expect("assign");
    assert!(none.iter().all(|p| !p.enriched));

    let all = assign_enrichment(&products, 1.0, 42).expect("assign");
    assert!(all.iter().all(|p| p.enriched));
}

#[test]
fn out_of_range_fraction_is_rejected() {
    let products = products(5);
    for fraction in [-0.1, 1.1, f64::NAN] {
        let err = assign_enrichment(&products, fraction, 42).expect_err("should fail");
        assert!(matches!(err, EnrichError::InvalidFraction(_)));
    }
}

#[test]
fn input_order_and_records_are_preserved() {
    let products = products(12);
    let enriched = assign_enrichment(&products, 0.5, 9).expect("assign");

    assert_eq!(enriched.len(), products.len());
    for (original, tagged) in products.iter().zip(&enriched) {
        assert_eq!(original.product_id, tagged.product_id);
        assert_eq!(original.price, tagged.price);
    }
}
