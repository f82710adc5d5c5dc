use std::ops::RangeInclusive;

use crate::prompts::{DEFAULT_ECO_PACKAGE, DEFAULT_PRICE};

/// Price slider bounds in USD
pub const PRICE_RANGE: RangeInclusive<f64> = 2.99..=9.99;
/// Eco-packaging slider bounds in percent
pub const ECO_PACKAGE_RANGE: RangeInclusive<f64> = 0.0..=100.0;
/// Base adoption used before any idea has been generated
pub const BASELINE_ADOPTION: f64 = 70.0;

/// Adoption probability after applying the price and eco-packaging sliders
pub fn adjusted_adoption(base: f64, price: f64, eco_package: f64) -> f64 {
    let eco_bonus = (eco_package - DEFAULT_ECO_PACKAGE) / 10.0;
    let price_penalty = (price - DEFAULT_PRICE) * 2.0;
    (base + eco_bonus - price_penalty).clamp(0.0, 100.0)
}

/// One decimal place, the way scores are displayed
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}")
}

pub fn clamp_to(range: &RangeInclusive<f64>, value: f64) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
