//! Pipeline error taxonomy.
//!
//! Every variant is recoverable at the display boundary: it is rendered as a
//! message for the operator and the next analysis is a fresh user action.

use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Sensor board not connected")]
    NotConnected,

    #[error("No data received from sensor board")]
    NoDataReceived,

    #[error("Malformed reading ({reason}): {raw:?}")]
    MalformedReading { raw: String, reason: String },

    #[error("Reading is missing required field(s): {}", fields.join(", "))]
    MissingRequiredField { fields: Vec<&'static str> },

    #[error("Prediction failed: {0}")]
    PredictionFailed(#[source] ModelError),

    #[error("Classifier unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Failed to open serial port '{port}': {reason}")]
    PortOpenFailed { port: String, reason: String },

    #[error("Serial read error: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to list serial ports: {0}")]
    PortListing(String),
}

impl PipelineError {
    /// Whether an opt-in synthetic fallback may stand in for this failure.
    ///
    /// Only data-level failures qualify; a missing link or classifier does not.
    pub fn is_bad_reading(&self) -> bool {
        matches!(
            self,
            PipelineError::NoDataReceived
                | PipelineError::MalformedReading { .. }
                | PipelineError::MissingRequiredField { .. }
        )
    }
}
