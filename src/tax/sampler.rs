//! Stochastic couple-input sampler for grounded case construction.
//!
//! Draws plausible incomes, benefits, and memberships; every case gets an
//! independent draw with no cross-case coupling. Generic over the RNG so
//! tests can run against a seeded [`rand::rngs::StdRng`].

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand_distr::Normal;

use crate::schema::{CoupleInput, Person};

/// Income pairs with one clearly dominant earner.
const IMBALANCED: &[(f64, f64)] = &[
    (58_000.0, 0.0),
    (60_000.0, 6_000.0),
    (95_000.0, 22_000.0),
];

/// Income pairs of comparable size.
const SIMILAR: &[(f64, f64)] = &[
    (72_000.0, 70_000.0),
    (40_000.0, 42_000.0),
    (55_000.0, 53_000.0),
];

const WAGE_REPLACEMENT_CHOICES: &[f64] = &[0.0, 10_800.0, 21_600.0];
const MEDICAL_CHOICES: &[f64] = &[500.0, 2_000.0, 5_000.0];

/// Child-count weights for 0..=3 children.
const CHILD_WEIGHTS: [f64; 4] = [0.20, 0.24, 0.38, 0.18];

/// Gaussian noise with a defensive fallback to the mean.
fn gauss<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev)
        .map(|normal| normal.sample(rng))
        .unwrap_or(mean)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, choices: &[f64]) -> f64 {
    choices[rng.gen_range(0..choices.len())]
}

/// Draw one plausible couple input.
pub fn sample_couple_input<R: Rng + ?Sized>(rng: &mut R) -> CoupleInput {
    let (base_a, base_b) = if rng.gen_bool(0.5) {
        IMBALANCED[rng.gen_range(0..IMBALANCED.len())]
    } else {
        SIMILAR[rng.gen_range(0..SIMILAR.len())]
    };

    // Add noise, clamped to whole non-negative euros.
    let income_a = gauss(rng, base_a, 5_000.0).trunc().max(0.0);
    let income_b = gauss(rng, base_b, 5_000.0).trunc().max(0.0);

    let pays_church_a = rng.gen_bool(0.3);
    let pays_church_b = rng.gen_bool(0.3);

    let wage_replacement_a = pick(rng, WAGE_REPLACEMENT_CHOICES);
    let wage_replacement_b = 0.0;

    let medical_costs_a = if rng.gen_bool(0.3) {
        let mean = pick(rng, MEDICAL_CHOICES);
        gauss(rng, mean, 300.0).trunc().max(0.0)
    } else {
        0.0
    };
    let medical_costs_b = if rng.gen_bool(0.3) {
        let mean = pick(rng, MEDICAL_CHOICES);
        gauss(rng, mean, 300.0).trunc().max(0.0)
    } else {
        0.0
    };

    // Bavaria and Baden-Württemberg levy 8%.
    let church_tax_rate = if rng.gen_bool(0.8) { 0.09 } else { 0.08 };

    let live_together = rng.gen_bool(0.9);
    let children = WeightedIndex::new(CHILD_WEIGHTS)
        .map(|dist| dist.sample(rng) as u32)
        .unwrap_or(0);

    CoupleInput {
        a: Person {
            income: income_a,
            pays_church_tax: pays_church_a,
            wage_replacement: wage_replacement_a,
            medical_costs: medical_costs_a,
            fully_liable_for_tax: true,
        },
        b: Person {
            income: income_b,
            pays_church_tax: pays_church_b,
            wage_replacement: wage_replacement_b,
            medical_costs: medical_costs_b,
            fully_liable_for_tax: true,
        },
        church_tax_rate,
        married: true,
        children,
        live_together,
    }
}
