//! Pipeline errors.
//!
//! Every failure is a precondition violation detected before any column is
//! computed; there are no transient faults to retry.

use thiserror::Error;

use crate::domain::BarError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("insufficient data: {bars} bar(s) supplied, at least {required} required")]
    InsufficientData { bars: usize, required: usize },

    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("invalid series: {0}")]
    InvalidSeries(#[from] BarError),
}

impl PipelineError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}
