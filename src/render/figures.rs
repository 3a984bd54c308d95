// Figure data
// Already-computed numeric series handed to renderers

use serde::{Deserialize, Serialize};

use crate::analysis::{Analyzer, CurveTable, ErrorReport, ScoredExample};
use crate::data::{PerSplit, SplitKind};

/// The standard performance plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    /// MSE per split against training step
    Mse,
    /// FRR against FAR, linear axes
    Roc,
    /// FRR against FAR, logarithmic axes
    Det,
    /// Test HTER against the a-priori cost weight omega
    Epc,
}

impl FigureKind {
    pub const ALL: [FigureKind; 4] = [
        FigureKind::Mse,
        FigureKind::Roc,
        FigureKind::Det,
        FigureKind::Epc,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            FigureKind::Mse => "MSE evolution",
            FigureKind::Roc => "ROC curve",
            FigureKind::Det => "DET curve",
            FigureKind::Epc => "EPC a priori",
        }
    }

    /// (x, y) axis labels
    pub fn axes(&self) -> (&'static str, &'static str) {
        match self {
            FigureKind::Mse => ("Training steps", "Mean Square Error"),
            FigureKind::Roc | FigureKind::Det => ("FAR (%)", "FRR (%)"),
            FigureKind::Epc => ("omega", "HTER (%)"),
        }
    }

    pub fn log_scale(&self) -> bool {
        matches!(self, FigureKind::Det)
    }
}

/// Everything a renderer needs to draw and tabulate one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figures {
    /// Free-form run name shown in figure titles
    pub name: String,
    pub mse: PerSplit<Vec<(u64, f64)>>,
    pub curves: PerSplit<CurveTable>,
    pub scores: PerSplit<Vec<ScoredExample>>,
    pub epc: Vec<(f64, f64)>,
    pub report: ErrorReport,
}

impl Figures {
    /// Collect every series from an analyzer
    pub fn from_analyzer(analyzer: &Analyzer, name: impl Into<String>) -> Self {
        Figures {
            name: name.into(),
            mse: analyzer.mse_series().clone(),
            curves: analyzer.curve_tables(),
            scores: PerSplit::new(
                analyzer.scores(SplitKind::Train).to_vec(),
                analyzer.scores(SplitKind::Devel).to_vec(),
                analyzer.scores(SplitKind::Test).to_vec(),
            ),
            epc: analyzer.epc().collect(),
            report: analyzer.error_report(),
        }
    }

    /// Points of one split's line in a figure. The EPC figure is drawn
    /// for the test split only; other splits yield no points there.
    /// DET points with a zero rate are dropped since they have no position
    /// on logarithmic axes.
    pub fn series(&self, figure: FigureKind, kind: SplitKind) -> Vec<(f64, f64)> {
        match figure {
            FigureKind::Mse => self
                .mse
                .get(kind)
                .iter()
                .map(|&(step, mse)| (step as f64, mse))
                .collect(),
            FigureKind::Roc => rate_pairs(self.curves.get(kind)).collect(),
            FigureKind::Det => rate_pairs(self.curves.get(kind))
                .filter(|&(far, frr)| far > 0.0 && frr > 0.0)
                .collect(),
            FigureKind::Epc if kind == SplitKind::Test => self.epc.clone(),
            FigureKind::Epc => Vec::new(),
        }
    }

    /// Title with the run name appended
    pub fn title(&self, figure: FigureKind) -> String {
        if self.name.is_empty() {
            figure.title().to_string()
        } else {
            format!("{} ({})", figure.title(), self.name)
        }
    }
}

fn rate_pairs(table: &CurveTable) -> impl Iterator<Item = (f64, f64)> + '_ {
    table.far.iter().copied().zip(table.frr.iter().copied())
}
