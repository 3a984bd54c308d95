// Report rendering
// Figure data, per-split styling and the writers that persist them

pub mod figures;
pub mod style;
pub mod writer;

use thiserror::Error;

pub use figures::{FigureKind, Figures};
pub use style::{LineStyle, PlotStyle, RenderStyle};
pub use writer::{mse_table, score_table, ReportWriter, WrittenFile};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Turns computed figures into some output form
pub trait Renderer {
    fn render(&mut self, figures: &Figures) -> RenderResult<()>;
}
