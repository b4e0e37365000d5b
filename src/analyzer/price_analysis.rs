use crate::analyzer::curves::build_curves;
use crate::analyzer::price_points::resolve_price_points;
use crate::analyzer::recommendation;
use crate::analyzer::validator::validate;
use crate::model::{AnalysisResult, CustomerResponse, RecommendationOutcome};
use tracing::debug;

/// Trait defining the interface for a price sensitivity analyzer.
pub trait Analyzer {
    /// Runs validation, curve building and price point resolution over the raw responses.
    fn analyze(&self, responses: &[CustomerResponse]) -> AnalysisResult;
    fn recommend(&self, result: &AnalysisResult) -> RecommendationOutcome;
}

/// Van Westendorp implementation of the analyzer. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(&self, responses: &[CustomerResponse]) -> AnalysisResult {
        let valid = validate(responses);
        debug!("{} of {} responses passed validation", valid.len(), responses.len());

        let series = build_curves(&valid);
        let price_points = resolve_price_points(&series);
        debug!("Resolved price points: {:?}", price_points);

        AnalysisResult {
            respondents: valid.len(),
            price_points,
            series,
        }
    }

    fn recommend(&self, result: &AnalysisResult) -> RecommendationOutcome {
        recommendation::recommend(&result.price_points)
    }
}
