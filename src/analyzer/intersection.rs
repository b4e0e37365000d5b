use crate::model::{AnalysisError, Curve, PricePoint};

/// Finds the first price, scanning upward, where `first` and `second` cross.
///
/// A crossing is bracketed by the first adjacent pair where `first - second`
/// is non-positive at one end and non-negative at the other. Inside that pair
/// both curves are linearly interpolated and the meeting price is returned.
/// Returns `None` when the curves never meet inside the observed range.
pub fn find_intersection(series: &[PricePoint], first: Curve, second: Curve) -> Option<f64> {
    series.windows(2).find_map(|pair| {
        let (curr, next) = (&pair[0], &pair[1]);
        let gap_curr = curr.value(first) - curr.value(second);
        let gap_next = next.value(first) - next.value(second);

        let brackets = (gap_curr <= 0.0 && gap_next >= 0.0) || (gap_curr >= 0.0 && gap_next <= 0.0);
        if !brackets {
            return None;
        }
        Some(crossing_between(curr, next, first, second))
    })
}

/// Same as [`find_intersection`], with curves given by name (`"tooCheap"`, `"not_expensive"`, ...).
pub fn find_intersection_by_name(
    series: &[PricePoint],
    first: &str,
    second: &str,
) -> Result<Option<f64>, AnalysisError> {
    let first: Curve = first.parse()?;
    let second: Curve = second.parse()?;
    Ok(find_intersection(series, first, second))
}

fn crossing_between(curr: &PricePoint, next: &PricePoint, first: Curve, second: Curve) -> f64 {
    if curr.price == next.price {
        return curr.price;
    }

    let run = next.price - curr.price;
    let slope_first = (next.value(first) - curr.value(first)) / run;
    let slope_second = (next.value(second) - curr.value(second)) / run;

    // Parallel segments never meet at a single point.
    if (slope_first - slope_second).abs() < f64::EPSILON {
        return curr.price;
    }

    curr.price + (curr.value(second) - curr.value(first)) / (slope_first - slope_second)
}
