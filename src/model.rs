// Core structs: CustomerResponse, PricePoint, AnalysisResult, Recommendation
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One participant's four price-perception answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: String,
    #[serde(alias = "too_cheap")]
    pub too_cheap: f64,
    pub bargain: f64,
    pub expensive: f64,
    #[serde(alias = "too_expensive")]
    pub too_expensive: f64,
}

impl CustomerResponse {
    pub fn new(id: impl Into<String>, too_cheap: f64, bargain: f64, expensive: f64, too_expensive: f64) -> Self {
        Self {
            id: id.into(),
            too_cheap,
            bargain,
            expensive,
            too_expensive,
        }
    }

    /// A freshly added survey row: every answer starts at zero.
    pub fn blank(id: impl Into<String>) -> Self {
        Self::new(id, 0.0, 0.0, 0.0, 0.0)
    }

    pub fn prices(&self) -> [f64; 4] {
        [self.too_cheap, self.bargain, self.expensive, self.too_expensive]
    }
}

/// Which answer of a response a survey edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseField {
    TooCheap,
    Bargain,
    Expensive,
    TooExpensive,
}

/// The four cumulative curves carried by every price point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Curve {
    TooCheap,
    NotCheap,
    Expensive,
    NotExpensive,
}

impl Curve {
    pub fn name(&self) -> &'static str {
        match self {
            Curve::TooCheap => "tooCheap",
            Curve::NotCheap => "notCheap",
            Curve::Expensive => "expensive",
            Curve::NotExpensive => "notExpensive",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        let key = key.strip_suffix("cumulative").unwrap_or(&key);
        match key {
            "toocheap" => Ok(Curve::TooCheap),
            "notcheap" => Ok(Curve::NotCheap),
            "expensive" => Ok(Curve::Expensive),
            "notexpensive" => Ok(Curve::NotExpensive),
            _ => Err(AnalysisError::UnknownCurve(s.to_string())),
        }
    }
}

/// One distinct observed price with its four cumulative percentages (0..=100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub too_cheap: f64,
    pub not_cheap: f64,
    pub expensive: f64,
    pub not_expensive: f64,
}

impl PricePoint {
    pub fn value(&self, curve: Curve) -> f64 {
        match curve {
            Curve::TooCheap => self.too_cheap,
            Curve::NotCheap => self.not_cheap,
            Curve::Expensive => self.expensive,
            Curve::NotExpensive => self.not_expensive,
        }
    }
}

/// The four named Van Westendorp price points. Each may be absent independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PricePoints {
    /// Optimal Price Point
    pub opp: Option<f64>,
    /// Indifference Price Point
    pub ipp: Option<f64>,
    /// Point of Marginal Cheapness
    pub pmc: Option<f64>,
    /// Point of Marginal Expensiveness
    pub pme: Option<f64>,
}

impl PricePoints {
    pub fn is_empty(&self) -> bool {
        self.present().is_empty()
    }

    /// Prices that were actually found, in OPP, IPP, PMC, PME order.
    pub fn present(&self) -> Vec<f64> {
        [self.opp, self.ipp, self.pmc, self.pme]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Output of one full analysis run. Rebuilt from scratch on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Number of responses that passed validation.
    pub respondents: usize,
    pub price_points: PricePoints,
    pub series: Vec<PricePoint>,
}

/// Which price point the recommended price was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationBasis {
    OptimalPricePoint,
    IndifferencePricePoint,
    LowestAvailable,
}

impl RecommendationBasis {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationBasis::OptimalPricePoint => "optimal price point",
            RecommendationBasis::IndifferencePricePoint => "indifference price point",
            RecommendationBasis::LowestAvailable => "lowest available price point",
        }
    }
}

/// One narrative entry. Only emitted for price points that exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "price", rename_all = "snake_case")]
pub enum Insight {
    Optimal(f64),
    Indifference(f64),
    BelowMarginalCheapness(f64),
    AboveMarginalExpensiveness(f64),
}

impl Insight {
    pub fn price(&self) -> f64 {
        match *self {
            Insight::Optimal(p)
            | Insight::Indifference(p)
            | Insight::BelowMarginalCheapness(p)
            | Insight::AboveMarginalExpensiveness(p) => p,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Insight::Optimal(_) => "Optimal price",
            Insight::Indifference(_) => "Indifference price",
            Insight::BelowMarginalCheapness(_) => "Warning: too cheap below",
            Insight::AboveMarginalExpensiveness(_) => "Warning: too expensive above",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Insight::Optimal(_) => "fewest respondents reject the product as too cheap or too expensive",
            Insight::Indifference(_) => "as many respondents find it cheap as find it expensive",
            Insight::BelowMarginalCheapness(_) => "buyers start doubting the product's quality",
            Insight::AboveMarginalExpensiveness(_) => "most buyers consider the product unaffordable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended_price: f64,
    pub range_low: f64,
    pub range_high: f64,
    pub basis: RecommendationBasis,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    InsufficientData,
    Recommended(Recommendation),
}

impl RecommendationOutcome {
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            RecommendationOutcome::Recommended(r) => Some(r),
            RecommendationOutcome::InsufficientData => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unknown curve name: {0}")]
    UnknownCurve(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurveyError {
    #[error("no response with id {0}")]
    UnknownResponse(String),
    #[error("a survey must keep at least one response")]
    LastResponse,
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("duplicate response id: {0}")]
    DuplicateId(String),
    #[error("no responses in input")]
    Empty,
    #[error("unsupported import format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("api error: {0}")]
    ApiError(String),
    #[error("notification endpoint unreachable")]
    Unreachable,
}
