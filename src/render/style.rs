// Plot styling
// Per-split line styles passed explicitly to renderers

use serde::{Deserialize, Serialize};

use crate::data::PerSplit;

/// Line dash pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

/// How one split's series is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    /// Color name or grey level ("black", "0.7")
    pub color: String,

    pub line_style: LineStyle,

    /// Line width in points
    pub line_width: f32,
}

impl PlotStyle {
    pub fn new(color: impl Into<String>, line_style: LineStyle, line_width: f32) -> Self {
        PlotStyle {
            color: color.into(),
            line_style,
            line_width: line_width.max(0.0),
        }
    }
}

/// Styles for train, devel and test series
pub type RenderStyle = PerSplit<PlotStyle>;

impl Default for PerSplit<PlotStyle> {
    /// Grey thin lines for train and devel, a thick black line for test
    fn default() -> Self {
        PerSplit::new(
            PlotStyle::new("0.7", LineStyle::DashDot, 1.0),
            PlotStyle::new("0.7", LineStyle::Solid, 1.0),
            PlotStyle::new("black", LineStyle::Solid, 2.0),
        )
    }
}
