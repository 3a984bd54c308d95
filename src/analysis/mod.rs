// Error-curve analysis
// FAR/FRR sweeps, min-HTER / EER operating points, EPC and feature relevance

pub mod analyzer;
pub mod curves;
pub mod relevance;
pub mod report;
pub mod stats;

pub use analyzer::{AnalysisError, AnalysisResult, Analyzer, Epc, SplitAnalysis};
pub use curves::{CurveSet, CurveTable, ScoredExample};
pub use relevance::{best_relevance, feature_relevance};
pub use report::{ErrorReport, OperatingPoint};
pub use stats::{
    far, frr, min_rate_difference_index, min_weighted_error_index, GridError, ThresholdGrid,
};
