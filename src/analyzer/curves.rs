use crate::analyzer::validator::has_enough_responses;
use crate::model::{CustomerResponse, PricePoint};
use tracing::debug;

/// Every distinct price mentioned in any answer, ascending.
pub fn distinct_prices(responses: &[CustomerResponse]) -> Vec<f64> {
    let mut prices: Vec<f64> = responses.iter().flat_map(|r| r.prices()).collect();
    prices.sort_by(|a, b| a.total_cmp(b));
    prices.dedup();
    prices
}

/// Builds the cumulative-percentage series over validated responses.
///
/// Percentages are shares of all valid respondents, not of distinct prices.
/// Returns an empty series when there are fewer than [`MIN_VALID_RESPONSES`](crate::analyzer::MIN_VALID_RESPONSES) rows.
pub fn build_curves(valid: &[CustomerResponse]) -> Vec<PricePoint> {
    if !has_enough_responses(valid) {
        debug!("Not enough valid responses for curves: {}", valid.len());
        return Vec::new();
    }

    let total = valid.len() as f64;
    let share = |count: usize| count as f64 / total * 100.0;

    let series: Vec<PricePoint> = distinct_prices(valid)
        .into_iter()
        .map(|price| PricePoint {
            price,
            too_cheap: share(valid.iter().filter(|r| r.too_cheap >= price).count()),
            not_cheap: share(valid.iter().filter(|r| r.bargain <= price).count()),
            expensive: share(valid.iter().filter(|r| r.expensive <= price).count()),
            not_expensive: share(valid.iter().filter(|r| r.too_expensive >= price).count()),
        })
        .collect();

    debug!("Built {} price points from {} responses", series.len(), valid.len());
    series
}
