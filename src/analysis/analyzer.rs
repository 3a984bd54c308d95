// Error-curve analyzer
// Scores every split with the best classifier, sweeps thresholds and
// reduces the curves to min-HTER / EER operating points and the EPC curve

use serde::Serialize;
use thiserror::Error;

use crate::classifier::Classifier;
use crate::data::{Label, PerSplit, Split, SplitKind, Splits};
use crate::evaluation::EvaluationError;
use crate::observer::Observer;

use super::curves::{CurveSet, CurveTable, ScoredExample};
use super::report::{ErrorReport, OperatingPoint};
use super::stats::{min_rate_difference_index, min_weighted_error_index, GridError, ThresholdGrid};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("The observer has no best classifier snapshot to analyze")]
    NoSnapshot,

    #[error("The {split} split has no {} examples", .label.name())]
    EmptyClass { split: &'static str, label: Label },

    #[error("The {split} split scored a non-finite output at example {index}")]
    NonFiniteScore { split: &'static str, index: usize },

    #[error("Scoring the {split} split failed: {source}")]
    Evaluation {
        split: &'static str,
        #[source]
        source: EvaluationError,
    },

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Scores and curves of one split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitAnalysis {
    /// Every labeled example in split order
    pub scores: Vec<ScoredExample>,

    /// Scores of examples with negative targets
    pub noise: Vec<f64>,

    /// Scores of examples with positive targets
    pub signal: Vec<f64>,

    pub curves: CurveSet,
}

impl SplitAnalysis {
    fn build(
        kind: SplitKind,
        output: &[f64],
        split: &Split,
        grid: &ThresholdGrid,
    ) -> AnalysisResult<Self> {
        if output.len() != split.size() {
            return Err(AnalysisError::Evaluation {
                split: kind.name(),
                source: EvaluationError::LengthMismatch {
                    outputs: output.len(),
                    targets: split.size(),
                },
            });
        }

        let mut scores = Vec::with_capacity(output.len());
        let mut noise = Vec::new();
        let mut signal = Vec::new();
        let mut unlabeled = 0usize;

        for (index, (&score, &target)) in output.iter().zip(split.target()).enumerate() {
            if !score.is_finite() {
                return Err(AnalysisError::NonFiniteScore {
                    split: kind.name(),
                    index,
                });
            }

            match Label::from_target(target) {
                Some(label) => {
                    match label {
                        Label::Noise => noise.push(score),
                        Label::Signal => signal.push(score),
                    }
                    scores.push(ScoredExample { score, label });
                }
                None => unlabeled += 1,
            }
        }

        if unlabeled > 0 {
            log::warn!(
                "{} split: ignoring {} examples with a zero target",
                kind.name(),
                unlabeled
            );
        }

        for (label, partition) in [(Label::Noise, &noise), (Label::Signal, &signal)] {
            if partition.is_empty() {
                return Err(AnalysisError::EmptyClass {
                    split: kind.name(),
                    label,
                });
            }
        }

        let curves = CurveSet::compute(&noise, &signal, grid);
        log::debug!(
            "{} split: {} noise / {} signal scores over {} thresholds",
            kind.name(),
            noise.len(),
            signal.len(),
            grid.len()
        );

        Ok(SplitAnalysis {
            scores,
            noise,
            signal,
            curves,
        })
    }
}

/// Immutable performance analysis of one classifier on the three splits.
///
/// Holds only numbers: the classifier is run once per split during
/// construction and not retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analyzer {
    grid: ThresholdGrid,
    splits: PerSplit<SplitAnalysis>,
    mse: PerSplit<Vec<(u64, f64)>>,
    best_step: Option<u64>,
}

impl Analyzer {
    /// Analyze the observer's best snapshot on the observer's splits
    pub fn new<C: Classifier>(observer: &Observer<C>, grid: ThresholdGrid) -> AnalysisResult<Self> {
        let best = observer.best().ok_or(AnalysisError::NoSnapshot)?;
        let mut analyzer = Self::from_classifier(&best.classifier, observer.splits(), grid)?;

        analyzer.mse = observer.mse_series();
        analyzer.best_step = Some(best.step);
        log::info!(
            "Analyzed classifier from step {} over {} evaluations",
            best.step,
            observer.history().len()
        );
        Ok(analyzer)
    }

    /// Analyze any classifier on the given splits; the MSE history is empty
    pub fn from_classifier<C: Classifier>(
        classifier: &C,
        splits: &Splits,
        grid: ThresholdGrid,
    ) -> AnalysisResult<Self> {
        let analyses = splits.try_map(|kind, split| {
            let output = classifier
                .run(split.input())
                .map_err(|err| AnalysisError::Evaluation {
                    split: kind.name(),
                    source: EvaluationError::Classifier(err),
                })?;
            SplitAnalysis::build(kind, &output, split, &grid)
        })?;

        Ok(Analyzer {
            grid,
            splits: analyses,
            mse: PerSplit::new(Vec::new(), Vec::new(), Vec::new()),
            best_step: None,
        })
    }

    pub fn grid(&self) -> &ThresholdGrid {
        &self.grid
    }

    /// Step of the analyzed snapshot, when built from an observer
    pub fn best_step(&self) -> Option<u64> {
        self.best_step
    }

    pub fn split(&self, kind: SplitKind) -> &SplitAnalysis {
        self.splits.get(kind)
    }

    pub fn curves(&self, kind: SplitKind) -> &CurveSet {
        &self.splits.get(kind).curves
    }

    /// Threshold/FAR/FRR columns for every split
    pub fn curve_tables(&self) -> PerSplit<CurveTable> {
        self.splits
            .map(|_, analysis| CurveTable::new(&self.grid, &analysis.curves))
    }

    /// Raw `(score, label)` pairs of one split
    pub fn scores(&self, kind: SplitKind) -> &[ScoredExample] {
        &self.splits.get(kind).scores
    }

    /// `(step, mse)` series per split
    pub fn mse_series(&self) -> &PerSplit<Vec<(u64, f64)>> {
        &self.mse
    }

    /// Choose the threshold minimizing `omega * FAR + (1 - omega) * FRR` on
    /// devel and report the test rates there. `omega` is clamped to [0, 1].
    pub fn hter_min_wer(&self, omega: f64) -> OperatingPoint {
        let omega = omega.clamp(0.0, 1.0);
        let devel = &self.splits.devel.curves;
        let index = min_weighted_error_index(&devel.far, &devel.frr, omega).unwrap_or(0);

        OperatingPoint::at(&self.grid, &self.splits.test.curves, index)
    }

    /// Equal-weight operating point
    pub fn min_hter(&self) -> OperatingPoint {
        self.hter_min_wer(0.5)
    }

    /// Threshold where devel FAR and FRR are closest, applied to test
    pub fn eer(&self) -> OperatingPoint {
        let devel = &self.splits.devel.curves;
        let index = min_rate_difference_index(&devel.far, &devel.frr).unwrap_or(0);

        OperatingPoint::at(&self.grid, &self.splits.test.curves, index)
    }

    pub fn error_report(&self) -> ErrorReport {
        ErrorReport {
            min_hter: self.min_hter(),
            eer: self.eer(),
        }
    }

    /// EPC curve sampled at as many omegas as the test curve has points
    pub fn epc(&self) -> Epc<'_> {
        self.epc_points(self.splits.test.curves.len())
    }

    /// EPC curve sampled at `points` evenly spaced omegas over [0, 1]
    pub fn epc_points(&self, points: usize) -> Epc<'_> {
        Epc {
            analyzer: self,
            next: 0,
            points,
        }
    }
}

/// Lazy `(omega, min HTER)` pairs. Cloning restarts from the current position;
/// `Analyzer::epc` always starts from omega = 0.
#[derive(Debug, Clone)]
pub struct Epc<'a> {
    analyzer: &'a Analyzer,
    next: usize,
    points: usize,
}

impl Iterator for Epc<'_> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.points {
            return None;
        }

        let omega = if self.points > 1 {
            self.next as f64 / (self.points - 1) as f64
        } else {
            0.0
        };
        self.next += 1;

        Some((omega, self.analyzer.hter_min_wer(omega).hter))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Epc<'_> {}
