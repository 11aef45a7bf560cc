//! Sensor reading type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::defaults::{PH_MAX, PH_MIN};

/// One sample from the sensing chamber.
///
/// Produced by the serial parser or the synthetic generator and consumed
/// once by the classification pipeline. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Light-dependent resistor ADC value
    pub ldr_analog: f64,
    /// LDR comparator output (0 or 1), absent on sketches without the module
    pub ldr_digital: Option<u8>,
    /// Soil/extract acidity
    pub ph: f64,
    /// When the sample was taken (host clock)
    pub captured_at: DateTime<Utc>,
}

impl Reading {
    /// Build a reading stamped with the current time.
    pub fn new(ldr_analog: f64, ldr_digital: Option<u8>, ph: f64) -> Self {
        Self {
            ldr_analog,
            ldr_digital,
            ph,
            captured_at: Utc::now(),
        }
    }

    /// pH outside the inclusive [5.5, 8.5] window.
    pub fn has_abnormal_ph(&self) -> bool {
        !(PH_MIN..=PH_MAX).contains(&self.ph)
    }

    /// LDR digital value as displayed (`N/A` when the board did not send it).
    pub fn ldr_digital_display(&self) -> String {
        self.ldr_digital
            .map_or_else(|| "N/A".to_string(), |d| d.to_string())
    }
}
