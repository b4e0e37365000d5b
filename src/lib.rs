//! Van Westendorp price sensitivity analysis.
//!
//! Survey rows flow one way through pure stages:
//! validate → build curves → resolve price points → recommend.

pub mod analyzer;
pub mod config;
pub mod model;
pub mod notifier;
pub mod parser;
pub mod report;
pub mod storage;
pub mod survey;
pub mod utils;
