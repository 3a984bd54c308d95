// Error report
// Min-HTER and EER operating points and their fixed-format text table

use serde::{Deserialize, Serialize};
use std::fmt;

use super::curves::CurveSet;
use super::stats::ThresholdGrid;

/// Rates on the test split at a threshold chosen on the devel split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Grid index of the chosen threshold
    pub index: usize,
    pub threshold: f64,
    pub far: f64,
    pub frr: f64,
    pub hter: f64,
}

impl OperatingPoint {
    /// Read the test rates at `index`
    pub fn at(grid: &ThresholdGrid, test: &CurveSet, index: usize) -> Self {
        OperatingPoint {
            index,
            threshold: grid.thresholds()[index],
            far: test.far[index],
            frr: test.frr[index],
            hter: test.hter(index),
        }
    }
}

/// The two reported operating points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub min_hter: OperatingPoint,
    pub eer: OperatingPoint,
}

impl ErrorReport {
    pub const FOOTNOTE: &'static str =
        "* Thresholds are chosen on the devel set and applied to the test set.";

    fn row(label: &str, point: &OperatingPoint) -> String {
        format!(
            "{:<10}| {:>9} | {:>9} | {:>9} | {:>9}",
            label,
            format!("{:5.1}", point.far),
            format!("{:5.1}", point.frr),
            format!("{:5.1}", point.hter),
            format!("{:5.2}", point.threshold),
        )
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10}| {:>9} | {:>9} | {:>9} | {:>9}",
            "", "FAR %", "FRR %", "HTER %", "Threshold"
        )?;
        writeln!(f, "{}", Self::row("Min. HTER", &self.min_hter))?;
        writeln!(f, "{}", Self::row("EER", &self.eer))?;
        write!(f, "{}", Self::FOOTNOTE)
    }
}
