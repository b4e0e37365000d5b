use crate::model::CustomerResponse;

/// Analysis is unavailable below this many valid responses.
pub const MIN_VALID_RESPONSES: usize = 5;

/// True when all four answers are finite, positive and non-decreasing.
pub fn is_valid(response: &CustomerResponse) -> bool {
    let prices = response.prices();
    prices.iter().all(|p| p.is_finite())
        && response.too_cheap > 0.0
        && prices.windows(2).all(|w| w[0] <= w[1])
}

/// Returns the internally consistent rows, keeping their original order.
pub fn validate(responses: &[CustomerResponse]) -> Vec<CustomerResponse> {
    responses.iter().filter(|r| is_valid(r)).cloned().collect()
}

pub fn has_enough_responses(valid: &[CustomerResponse]) -> bool {
    valid.len() >= MIN_VALID_RESPONSES
}
