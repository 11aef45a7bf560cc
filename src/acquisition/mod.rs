//! Sensor data acquisition module
//!
//! Produces exactly one [`Reading`] per call, either from one JSON line on
//! the serial link (device mode) or from the synthetic generator (demo mode).

pub mod parser;
pub mod ports;
pub mod serial_link;
pub mod synthetic;

pub use parser::parse_reading_line;
pub use ports::{list_ports, PortInfo};
pub use serial_link::SerialLink;
pub use synthetic::synthesize;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::AcquisitionMode;
use crate::error::PipelineError;
use crate::types::Reading;

/// A line-oriented connection to the sensor board.
///
/// Implementations consume at most one line per [`read_line`](Self::read_line)
/// call and never hand back data buffered by a previous call.
#[async_trait]
pub trait LineSource: Send {
    /// Read one line with trailing whitespace stripped.
    ///
    /// Returns an empty string at end of stream or when nothing arrived
    /// before the timeout. A timeout mid-line returns the partial text, and
    /// the rest of that line is never handed back by a later call.
    /// Fails with [`PipelineError::NotConnected`] once closed.
    async fn read_line(&mut self) -> Result<String, PipelineError>;

    /// Release the underlying handle. Idempotent.
    async fn close(&mut self);

    fn is_connected(&self) -> bool;

    /// Human-readable name for logging (e.g. the port name).
    fn source_name(&self) -> &str;
}

/// Produce one reading.
///
/// Device mode reads and parses a single line from `link`; a missing or
/// closed link is [`PipelineError::NotConnected`]. Synthetic mode never fails.
/// No retries: the first failure is returned to the caller.
pub async fn acquire(
    mode: AcquisitionMode,
    link: Option<&mut (dyn LineSource + '_)>,
) -> Result<Reading, PipelineError> {
    match mode {
        AcquisitionMode::Synthetic => {
            let reading = synthesize(&mut rand::thread_rng());
            debug!(
                ldr_analog = reading.ldr_analog,
                ph = reading.ph,
                "Synthetic reading generated"
            );
            Ok(reading)
        }
        AcquisitionMode::Device => {
            let link = link.ok_or(PipelineError::NotConnected)?;
            if !link.is_connected() {
                return Err(PipelineError::NotConnected);
            }

            let line = link.read_line().await?;
            debug!(source = link.source_name(), line = %line, "Line received");

            let reading = parse_reading_line(&line)?;
            info!(
                source = link.source_name(),
                ldr_analog = reading.ldr_analog,
                ldr_digital = ?reading.ldr_digital,
                ph = reading.ph,
                "Reading acquired"
            );
            Ok(reading)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn link(data: &'static [u8]) -> SerialLink<&'static [u8]> {
        SerialLink::attach("test", data, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_device_mode_reads_one_reading() {
        let mut l = link(b"{\"LDR_Analog\": 320, \"LDR_Digital\": 1, \"pH\": 6.8}\n");
        let reading = acquire(AcquisitionMode::Device, Some(&mut l)).await.unwrap();
        assert_eq!(reading.ldr_analog, 320.0);
        assert_eq!(reading.ldr_digital, Some(1));
        assert_eq!(reading.ph, 6.8);
    }

    #[tokio::test]
    async fn test_device_mode_without_link_is_not_connected() {
        let err = acquire(AcquisitionMode::Device, None).await.unwrap_err();
        assert!(matches!(err, PipelineError::NotConnected));
    }

    #[tokio::test]
    async fn test_device_mode_with_closed_link_is_not_connected() {
        let mut l = link(b"{\"LDR_Analog\": 1, \"pH\": 7}\n");
        l.close().await;
        let err = acquire(AcquisitionMode::Device, Some(&mut l)).await.unwrap_err();
        assert!(matches!(err, PipelineError::NotConnected));
    }

    #[tokio::test]
    async fn test_empty_stream_is_no_data() {
        let mut l = link(b"");
        let err = acquire(AcquisitionMode::Device, Some(&mut l)).await.unwrap_err();
        assert!(matches!(err, PipelineError::NoDataReceived));
    }

    #[tokio::test]
    async fn test_blank_line_is_no_data_not_malformed() {
        let mut l = link(b"   \r\n");
        let err = acquire(AcquisitionMode::Device, Some(&mut l)).await.unwrap_err();
        assert!(matches!(err, PipelineError::NoDataReceived));
    }

    #[tokio::test]
    async fn test_synthetic_mode_ignores_link() {
        let reading = acquire(AcquisitionMode::Synthetic, None).await.unwrap();
        assert!((200.0..=800.0).contains(&reading.ldr_analog));
        assert!((5.5..=8.5).contains(&reading.ph));
    }
}
