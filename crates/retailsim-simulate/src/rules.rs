//! Deterministic rule-based generators, the default registered
//! characteristics and metrics functions.
//!
//! Both generators are pure functions of their inputs and the rng stream:
//! re-running with the same seed and arguments reproduces the tables
//! byte for byte. Product and transaction ids are assigned by visitation
//! order, not by the random draws, so the id↔record mapping is stable.

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use retailsim_core::{Product, Sale, round2};

use crate::errors::{SimResult, SimulationError};

struct CategorySpec {
    name: &'static str,
    products: [&'static str; 8],
    price_range: (f64, f64),
}

const CATALOG: [CategorySpec; 8] = [
    CategorySpec {
        name: "Electronics",
        products: [
            "Laptop", "Smartphone", "Tablet", "Headphones", "Monitor", "Keyboard", "Mouse",
            "Webcam",
        ],
        price_range: (50.0, 1500.0),
    },
    CategorySpec {
        name: "Clothing",
        products: [
            "T-Shirt", "Jeans", "Jacket", "Sweater", "Dress", "Shorts", "Hoodie", "Socks",
        ],
        price_range: (15.0, 200.0),
    },
    CategorySpec {
        name: "Home & Garden",
        products: [
            "Chair", "Table", "Lamp", "Rug", "Curtains", "Vase", "Mirror", "Clock",
        ],
        price_range: (20.0, 500.0),
    },
    CategorySpec {
        name: "Books",
        products: [
            "Novel", "Textbook", "Cookbook", "Biography", "Comic", "Magazine", "Journal", "Guide",
        ],
        price_range: (10.0, 60.0),
    },
    CategorySpec {
        name: "Sports & Outdoors",
        products: [
            "Ball",
            "Bike",
            "Tent",
            "Backpack",
            "Yoga Mat",
            "Weights",
            "Running Shoes",
            "Water Bottle",
        ],
        price_range: (15.0, 300.0),
    },
    CategorySpec {
        name: "Toys & Games",
        products: [
            "Board Game",
            "Puzzle",
            "Action Figure",
            "Doll",
            "Building Blocks",
            "Card Game",
            "Stuffed Animal",
            "Remote Car",
        ],
        price_range: (10.0, 100.0),
    },
    CategorySpec {
        name: "Food & Beverage",
        products: [
            "Coffee", "Tea", "Snacks", "Chocolate", "Juice", "Cookies", "Nuts", "Energy Bar",
        ],
        price_range: (5.0, 50.0),
    },
    CategorySpec {
        name: "Health & Beauty",
        products: [
            "Shampoo",
            "Lotion",
            "Soap",
            "Toothpaste",
            "Perfume",
            "Makeup",
            "Vitamins",
            "Sunscreen",
        ],
        price_range: (8.0, 80.0),
    },
];

/// Quantity distribution for a sale occurrence. Weights, not
/// probabilities; the draw normalizes over their sum.
const QUANTITY_WEIGHTS: [(u32, f64); 5] = [(1, 50.0), (2, 25.0), (3, 15.0), (4, 7.0), (5, 3.0)];

/// Generate `n` products from a private rng seeded with `seed`.
pub fn generate_characteristics(n: usize, seed: u64) -> Vec<Product> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_characteristics_with(n, &mut rng)
}

/// Generate `n` products, drawing from the caller's rng stream.
///
/// Each product independently draws a category, then a name from that
/// category, then a price uniform in the category's range rounded to two
/// decimals. Ids are `PROD0001`, `PROD0002`, … in generation order.
pub fn generate_characteristics_with<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Product> {
    let mut products = Vec::with_capacity(n);
    for i in 0..n {
        let category = &CATALOG[rng.random_range(0..CATALOG.len())];
        let name = category.products[rng.random_range(0..category.products.len())];
        let (price_min, price_max) = category.price_range;
        let price = round2(rng.random_range(price_min..=price_max));
        products.push(Product {
            product_id: format!("PROD{:04}", i + 1),
            name: name.to_string(),
            category: category.name.to_string(),
            price,
        });
    }
    products
}

/// Generate daily sales for a date range from a private rng seeded with
/// `seed`.
pub fn generate_sales(
    products: &[Product],
    date_start: NaiveDate,
    date_end: NaiveDate,
    seed: u64,
    sale_probability: f64,
) -> SimResult<Vec<Sale>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_sales_with(products, date_start, date_end, sale_probability, &mut rng)
}

/// Generate daily sales, drawing from the caller's rng stream.
///
/// Visits every day in `[date_start, date_end]` inclusive, and every
/// product in input order within a day. Each visit draws a
/// Bernoulli(`sale_probability`) occurrence; on occurrence a weighted
/// quantity is drawn and revenue computed from the product price.
/// Transaction ids are `TXN000001`, … in strict visitation order, and no
/// row is emitted for non-occurrence.
pub fn generate_sales_with<R: Rng + ?Sized>(
    products: &[Product],
    date_start: NaiveDate,
    date_end: NaiveDate,
    sale_probability: f64,
    rng: &mut R,
) -> SimResult<Vec<Sale>> {
    if date_start > date_end {
        return Err(SimulationError::InvalidDateRange {
            start: date_start,
            end: date_end,
        });
    }

    let mut sales = Vec::new();
    let mut transaction_counter = 0_u64;
    for date in date_start.iter_days().take_while(|date| *date <= date_end) {
        for product in products {
            if rng.random::<f64>() >= sale_probability {
                continue;
            }
            transaction_counter += 1;
            let quantity = draw_quantity(rng);
            sales.push(Sale {
                transaction_id: format!("TXN{transaction_counter:06}"),
                product_id: product.product_id.clone(),
                quantity,
                unit_price: product.price,
                revenue: round2(f64::from(quantity) * product.price),
                date,
            });
        }
    }
    Ok(sales)
}

fn draw_quantity<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let total: f64 = QUANTITY_WEIGHTS.iter().map(|(_, weight)| weight).sum();
    let mut draw = rng.random_range(0.0..total);
    for (quantity, weight) in QUANTITY_WEIGHTS {
        if draw < weight {
            return quantity;
        }
        draw -= weight;
    }
    // Unreachable for a positive total, but keeps the draw total-safe.
    QUANTITY_WEIGHTS[QUANTITY_WEIGHTS.len() - 1].0
}
