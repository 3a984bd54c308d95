// Perfwatch - Classifier performance observation and analysis
// Module declarations

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod data;
pub mod evaluation;
pub mod observer;
pub mod render;

pub use analysis::{AnalysisError, Analyzer, ErrorReport, OperatingPoint, ThresholdGrid};
pub use classifier::{Classifier, ClassifierError, LinearClassifier};
pub use config::{ConfigError, EvaluationConfig};
pub use data::{Label, PerSplit, Split, SplitKind, Splits};
pub use observer::{EarlyStopping, Observer, ObserverError};
pub use render::{Figures, RenderError, Renderer, ReportWriter};
