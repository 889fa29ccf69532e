//! Whole-string exports offered to the user.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// What is being exported. Each kind has a fixed file name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ExportKind {
    /// Raw graph description returned by `visualize`.
    #[strum(serialize = "dot")]
    VisualizationDot,
    /// Rendered graph, produced by the external graph renderer.
    #[strum(serialize = "svg")]
    VisualizationSvg,
    /// The current source buffer.
    #[strum(serialize = "source")]
    Source,
}

impl ExportKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::VisualizationDot => "visualization.dot",
            Self::VisualizationSvg => "visualization.svg",
            Self::Source => "current.rby",
        }
    }
}
