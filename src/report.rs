// Report rendering: the only place the currency label is applied.
use crate::analyzer::MIN_VALID_RESPONSES;
use crate::model::{AnalysisResult, Insight, RecommendationOutcome, ReportError};
use crate::utils::{format_price, to_kebab_case};
use serde::Serialize;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct Report<'a> {
    survey: &'a str,
    currency: &'a str,
    analysis: &'a AnalysisResult,
    recommendation: &'a RecommendationOutcome,
}

fn describe(insight: &Insight, currency: &str) -> String {
    format!(
        "{} {}: {}",
        insight.label(),
        format_price(insight.price(), currency),
        insight.detail()
    )
}

/// Human-readable summary for logs and chat messages.
pub fn render_text(
    survey: &str,
    result: &AnalysisResult,
    outcome: &RecommendationOutcome,
    currency: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 Price sensitivity: {}", survey);
    let _ = writeln!(out, "Valid responses: {}", result.respondents);

    match outcome {
        RecommendationOutcome::InsufficientData if result.respondents < MIN_VALID_RESPONSES => {
            let _ = writeln!(
                out,
                "⚠️ Insufficient data: at least {} valid responses are needed.",
                MIN_VALID_RESPONSES
            );
        }
        RecommendationOutcome::InsufficientData => {
            let _ = writeln!(
                out,
                "⚠️ No price points: the curves never cross within the observed price range."
            );
        }
        RecommendationOutcome::Recommended(rec) => {
            let _ = writeln!(
                out,
                "💰 Recommended price: {} ({})",
                format_price(rec.recommended_price, currency),
                rec.basis.label()
            );
            let _ = writeln!(
                out,
                "📏 Acceptable range: {} – {}",
                format_price(rec.range_low, currency),
                format_price(rec.range_high, currency)
            );
            for insight in &rec.insights {
                let _ = writeln!(out, "• {}", describe(insight, currency));
            }
        }
    }
    out
}

/// Machine-readable export of the same content.
pub fn render_json(
    survey: &str,
    result: &AnalysisResult,
    outcome: &RecommendationOutcome,
    currency: &str,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Report {
        survey,
        currency,
        analysis: result,
        recommendation: outcome,
    })
}

/// Writes `<dir>/<survey-in-kebab-case>.json` and returns its path.
pub fn save_report(
    dir: &Path,
    survey: &str,
    result: &AnalysisResult,
    outcome: &RecommendationOutcome,
    currency: &str,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", to_kebab_case(survey)));
    fs::write(&path, render_json(survey, result, outcome, currency)?)?;
    info!("Saved report: {}", path.display());
    Ok(path)
}
