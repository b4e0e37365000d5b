use crate::model::{Insight, PricePoints, Recommendation, RecommendationBasis, RecommendationOutcome};

/// Derives a recommended price and acceptable range from whichever price points exist.
///
/// The recommended price prefers OPP, then IPP, then the lowest point found.
/// The range runs from PMC to PME, falling back to the lowest and highest
/// present points, and is always reported low-to-high.
pub fn recommend(points: &PricePoints) -> RecommendationOutcome {
    let present = points.present();
    let (Some(lowest), Some(highest)) = (
        present.iter().copied().reduce(f64::min),
        present.iter().copied().reduce(f64::max),
    ) else {
        return RecommendationOutcome::InsufficientData;
    };

    let (recommended_price, basis) = match (points.opp, points.ipp) {
        (Some(opp), _) => (opp, RecommendationBasis::OptimalPricePoint),
        (None, Some(ipp)) => (ipp, RecommendationBasis::IndifferencePricePoint),
        (None, None) => (lowest, RecommendationBasis::LowestAvailable),
    };

    let low = points.pmc.unwrap_or(lowest);
    let high = points.pme.unwrap_or(highest);

    RecommendationOutcome::Recommended(Recommendation {
        recommended_price,
        range_low: low.min(high),
        range_high: low.max(high),
        basis,
        insights: insights(points),
    })
}

fn insights(points: &PricePoints) -> Vec<Insight> {
    [
        points.opp.map(Insight::Optimal),
        points.ipp.map(Insight::Indifference),
        points.pmc.map(Insight::BelowMarginalCheapness),
        points.pme.map(Insight::AboveMarginalExpensiveness),
    ]
    .into_iter()
    .flatten()
    .collect()
}
