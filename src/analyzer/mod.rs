// Analyzer module: the Van Westendorp pipeline, one submodule per stage.

pub mod validator;
pub mod curves;
pub mod intersection;
pub mod price_points;
pub mod recommendation;
pub mod price_analysis;

// Re-export the pipeline entry points for ease of use.
pub use curves::build_curves;
pub use intersection::{find_intersection, find_intersection_by_name};
pub use price_analysis::{Analyzer, AnalyzerImpl};
pub use price_points::resolve_price_points;
pub use recommendation::recommend;
pub use validator::{validate, MIN_VALID_RESPONSES};
