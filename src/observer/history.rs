// Evaluation history
// Append-only, step-ordered record of per-split errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{PerSplit, SplitKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Step {step} does not follow the last recorded step {previous}")]
    NonIncreasingStep { previous: u64, step: u64 },
}

/// Mean squared error of every split at one training step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub step: u64,
    pub mse: PerSplit<f64>,
}

impl EvaluationRecord {
    pub fn new(step: u64, mse: PerSplit<f64>) -> Self {
        EvaluationRecord { step, mse }
    }

    /// Error on the split used for model selection
    pub fn devel(&self) -> f64 {
        self.mse.devel
    }
}

/// Ordered evaluation records. Steps are strictly increasing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<EvaluationRecord>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Fails if `step` would not extend the sequence
    pub fn check_next(&self, step: u64) -> Result<(), HistoryError> {
        match self.records.last() {
            Some(last) if step <= last.step => Err(HistoryError::NonIncreasingStep {
                previous: last.step,
                step,
            }),
            _ => Ok(()),
        }
    }

    /// Append a record after the last one
    pub fn push(&mut self, record: EvaluationRecord) -> Result<(), HistoryError> {
        self.check_next(record.step)?;
        self.records.push(record);
        Ok(())
    }

    pub fn last(&self) -> Option<&EvaluationRecord> {
        self.records.last()
    }

    /// Look up the record taken at `step`
    pub fn get(&self, step: u64) -> Option<&EvaluationRecord> {
        self.records
            .binary_search_by_key(&step, |r| r.step)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(step, mse)` pairs for one split, ready for plotting
    pub fn series(&self, kind: SplitKind) -> Vec<(u64, f64)> {
        self.records
            .iter()
            .map(|r| (r.step, *r.mse.get(kind)))
            .collect()
    }

    /// `(step, mse)` pairs for every split
    pub fn all_series(&self) -> PerSplit<Vec<(u64, f64)>> {
        PerSplit::new(
            self.series(SplitKind::Train),
            self.series(SplitKind::Devel),
            self.series(SplitKind::Test),
        )
    }

    /// Render as a whitespace separated table: `step train devel test`
    pub fn to_table(&self) -> String {
        let mut out = String::from("step train devel test\n");
        for record in &self.records {
            out.push_str(&format!(
                "{} {:.6e} {:.6e} {:.6e}\n",
                record.step, record.mse.train, record.mse.devel, record.mse.test
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step: u64, devel: f64) -> EvaluationRecord {
        EvaluationRecord::new(step, PerSplit::new(devel + 0.1, devel, devel + 0.2))
    }

    #[test]
    fn test_push_in_order() {
        let mut history = History::new();
        history.push(record(0, 0.5)).unwrap();
        history.push(record(3, 0.4)).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().step, 3);
    }

    #[test]
    fn test_repeated_step_rejected() {
        let mut history = History::new();
        history.push(record(2, 0.5)).unwrap();

        let err = history.push(record(2, 0.4)).unwrap_err();
        assert_eq!(err, HistoryError::NonIncreasingStep { previous: 2, step: 2 });
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_decreasing_step_rejected() {
        let mut history = History::new();
        history.push(record(5, 0.5)).unwrap();

        assert!(history.push(record(4, 0.4)).is_err());
    }

    #[test]
    fn test_get_by_step() {
        let mut history = History::new();
        for (step, devel) in [(1, 0.9), (4, 0.7), (9, 0.8)] {
            history.push(record(step, devel)).unwrap();
        }

        assert_eq!(history.get(4).unwrap().devel(), 0.7);
        assert!(history.get(5).is_none());
    }

    #[test]
    fn test_series() {
        let mut history = History::new();
        history.push(record(1, 0.9)).unwrap();
        history.push(record(2, 0.7)).unwrap();

        assert_eq!(history.series(SplitKind::Devel), vec![(1, 0.9), (2, 0.7)]);
        let all = history.all_series();
        assert_eq!(all.test.len(), 2);
        assert!((all.train[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_table_format() {
        let mut history = History::new();
        history.push(record(1, 0.5)).unwrap();

        let table = history.to_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "step train devel test");
        assert_eq!(lines[1], "1 6.000000e-1 5.000000e-1 7.000000e-1");
    }
}
