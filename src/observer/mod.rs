// Training observer
// Checkpoint evaluation, performance history, best snapshot and early stopping

pub mod history;
pub mod journal;
pub mod monitor;
pub mod snapshot;
pub mod stopping;

pub use history::{EvaluationRecord, History, HistoryError};
pub use journal::{read_journal, Journal, JournalEntry, JournalError};
pub use monitor::{Observer, ObserverError, ObserverResult};
pub use snapshot::{calculate_sha256, BestSnapshot, SavedSnapshot};
pub use stopping::{EarlyStopping, StopReason};
