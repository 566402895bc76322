//! The cleaning step library.
//!
//! Each step is a plain function that takes the table by value plus its
//! slice of the configuration and returns the cleaned table with a step
//! report. Steps never fail: a value a step cannot interpret is nulled or
//! left untouched according to that step's policy, and the report counts
//! what happened.
//!
//! | Step | Function | Report |
//! |---|---|---|
//! | Missing values | [`impute_missing`] | [`MissingReport`](crate::report::MissingReport) |
//! | Dates | [`standardize_dates`] | [`DatesReport`](crate::report::DatesReport) |
//! | Prices | [`standardize_prices`] | [`PriceReport`](crate::report::PriceReport) |
//! | Ratings | [`standardize_ratings`] | [`RatingsReport`](crate::report::RatingsReport) |
//! | Categories | [`standardize_categories`] | [`CategoricalReport`](crate::report::CategoricalReport) |
//! | Cities | [`resolve_cities`] | [`GeoReport`](crate::report::GeoReport) |
//! | Booleans | [`standardize_booleans`] | [`BooleansReport`](crate::report::BooleansReport) |
//! | Delivery SLA | [`standardize_delivery`] | [`DeliveryReport`](crate::report::DeliveryReport) |
//! | Duplicates | [`deduplicate`] | [`DedupReport`](crate::report::DedupReport) |
//! | Scale outliers | [`correct_outliers`] | [`OutliersReport`](crate::report::OutliersReport) |
//! | Payment methods | [`normalize_payment`] | [`PaymentReport`](crate::report::PaymentReport) |
//!
//! The fixed order in which they run lives in [`crate::pipeline`].

pub mod booleans;
pub mod categorical;
pub mod dates;
pub mod dedup;
pub mod delivery;
pub mod geo;
pub mod missing;
pub mod outliers;
pub mod payment;
pub mod price;
pub mod ratings;
pub mod similarity;

pub use booleans::standardize_booleans;
pub use categorical::standardize_categories;
pub use dates::standardize_dates;
pub use dedup::deduplicate;
pub use delivery::standardize_delivery;
pub use geo::resolve_cities;
pub use missing::impute_missing;
pub use outliers::correct_outliers;
pub use payment::normalize_payment;
pub use price::standardize_prices;
pub use ratings::standardize_ratings;

/// Round half-to-even at `decimals` places, applied to the scaled value.
pub(crate) fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    if !factor.is_finite() {
        return x;
    }
    (x * factor).round_ties_even() / factor
}

/// Median of the given numbers; `None` when empty.
pub(crate) fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values.get(mid - 1)? + values.get(mid)?) / 2.0)
    } else {
        values.get(mid).copied()
    }
}

/// Arithmetic mean; `None` when empty.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
