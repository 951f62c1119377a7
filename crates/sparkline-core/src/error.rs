//! Error types for chart construction and drawing.

use thiserror::Error;

/// Result type alias for sparkline operations.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors raised by the chart lifecycle.
///
/// Degenerate series (empty, single sample, flat) are not errors: the
/// renderer handles them as ordinary cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Zero capacity/speed/interval, an unknown style, or a malformed config
    /// document. Fatal to the chart being built.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No drawable surface is bound to the chart's id right now. Recovered by
    /// skipping the paint for this cycle.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
}

impl ChartError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// True for errors that only affect a single draw cycle.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SurfaceUnavailable(_))
    }
}
