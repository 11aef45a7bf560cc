//! Serial Link to the Sensor Board
//!
//! Opens the board's serial port at a fixed baud rate and reads one JSON line
//! per request. Reads are unbuffered (byte at a time) so a call never returns
//! a line the board printed before the request, and are bounded by a timeout
//! instead of hanging.
//!
//! Line boundaries are kept across calls:
//! - an overlong line is truncated and the rest of it is discarded up to its
//!   newline, so the next call starts on a fresh line
//! - a timeout returns the bytes received so far (empty if none) and the next
//!   call first skips the remainder of that interrupted line
//!
//! The port handle is released when the link is closed or dropped.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

use super::LineSource;
use crate::config::SerialConfig;
use crate::error::PipelineError;

/// Longest line content (excluding the terminator) kept from the board.
const MAX_LINE_BYTES: usize = 1024;

/// Exclusive, line-oriented handle on a serial device.
pub struct SerialLink<R = SerialStream> {
    name: String,
    reader: Option<R>,
    read_timeout: Duration,
    line_buffer: Vec<u8>,
    /// Set when a read stopped mid-line; the next read drops bytes through `\n`.
    resync: bool,
}

impl SerialLink<SerialStream> {
    /// Open the configured port and wait for the board to settle.
    pub async fn open(config: &SerialConfig) -> Result<Self, PipelineError> {
        info!(
            port = %config.port,
            baud = config.baud_rate,
            "Opening serial port"
        );

        let stream = tokio_serial::new(&config.port, config.baud_rate)
            .open_native_async()
            .map_err(|e| PipelineError::PortOpenFailed {
                port: config.port.clone(),
                reason: e.to_string(),
            })?;

        if config.settle_delay_ms > 0 {
            debug!(delay_ms = config.settle_delay_ms, "Waiting for board reset");
            tokio::time::sleep(Duration::from_millis(config.settle_delay_ms)).await;
        }

        info!(port = %config.port, "Serial port open");
        Ok(Self::attach(
            &config.port,
            stream,
            Duration::from_secs(config.read_timeout_secs),
        ))
    }
}

impl<R> SerialLink<R>
where
    R: AsyncRead + Unpin + Send,
{
    /// Wrap an already-open byte stream.
    pub fn attach(name: &str, reader: R, read_timeout: Duration) -> Self {
        Self {
            name: name.to_string(),
            reader: Some(reader),
            read_timeout,
            line_buffer: Vec::with_capacity(128),
            resync: false,
        }
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}

/// Progress of one line read.
#[derive(Debug, Default)]
struct LineRead {
    /// Bytes pulled off the stream, terminator and discarded bytes included.
    consumed: usize,
    /// Content past [`MAX_LINE_BYTES`] was dropped.
    truncated: bool,
}

/// Read one line, byte at a time, up to `\n` or end of stream.
///
/// Content beyond [`MAX_LINE_BYTES`] is consumed but not kept. When `resync`
/// is set, the remainder of an interrupted line is skipped first. `buf` and
/// `resync` are updated in place so a timeout leaves them describing the
/// partial read.
async fn read_line_unbuffered<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    resync: &mut bool,
) -> std::io::Result<LineRead>
where
    R: AsyncRead + Unpin,
{
    let mut byte = [0u8; 1];
    let mut progress = LineRead::default();

    while *resync {
        if reader.read(&mut byte).await? == 0 {
            return Ok(progress);
        }
        progress.consumed += 1;
        if byte[0] == b'\n' {
            *resync = false;
        }
    }

    loop {
        if reader.read(&mut byte).await? == 0 {
            break;
        }
        progress.consumed += 1;
        if byte[0] == b'\n' {
            break;
        }
        if buf.len() < MAX_LINE_BYTES {
            buf.push(byte[0]);
        } else {
            progress.truncated = true;
        }
    }
    Ok(progress)
}

#[async_trait]
impl<R> LineSource for SerialLink<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read_line(&mut self) -> Result<String, PipelineError> {
        let reader = self.reader.as_mut().ok_or(PipelineError::NotConnected)?;

        self.line_buffer.clear();
        let read = tokio::time::timeout(
            self.read_timeout,
            read_line_unbuffered(reader, &mut self.line_buffer, &mut self.resync),
        )
        .await;

        match read {
            Err(_) => {
                if self.line_buffer.is_empty() {
                    warn!(
                        port = %self.name,
                        timeout_ms = self.read_timeout.as_millis(),
                        "Timed out waiting for a line"
                    );
                } else {
                    // The tail of this line is dropped by the next read.
                    self.resync = true;
                    warn!(
                        port = %self.name,
                        timeout_ms = self.read_timeout.as_millis(),
                        received = self.line_buffer.len(),
                        "Timed out mid-line, returning partial line"
                    );
                }
            }
            Ok(Err(e)) => return Err(PipelineError::ReadFailed(e)),
            Ok(Ok(progress)) => {
                if progress.consumed == 0 {
                    debug!(port = %self.name, "End of stream");
                }
                if progress.truncated {
                    warn!(
                        port = %self.name,
                        max = MAX_LINE_BYTES,
                        "Line exceeded maximum length, truncated"
                    );
                }
            }
        }

        Ok(String::from_utf8_lossy(&self.line_buffer)
            .trim_end()
            .to_string())
    }

    async fn close(&mut self) {
        if self.reader.take().is_some() {
            info!(port = %self.name, "Serial link closed");
        }
    }

    fn is_connected(&self) -> bool {
        self.reader.is_some()
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_reads_one_line_per_call() {
        let data: &[u8] = b"{\"pH\": 7.0}\r\n{\"pH\": 6.0}\n";
        let mut link = SerialLink::attach("test", data, TIMEOUT);

        assert_eq!(link.read_line().await.unwrap(), "{\"pH\": 7.0}");
        assert_eq!(link.read_line().await.unwrap(), "{\"pH\": 6.0}");
        assert_eq!(link.read_line().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unterminated_tail_is_returned() {
        let data: &[u8] = b"partial";
        let mut link = SerialLink::attach("test", data, TIMEOUT);
        assert_eq!(link.read_line().await.unwrap(), "partial");
    }

    #[tokio::test]
    async fn test_mock_stream_line() {
        let mock = tokio_test::io::Builder::new()
            .read(b"{\"LDR_Analog\": 320, \"pH\": 6.8}\n")
            .build();
        let mut link = SerialLink::attach("mock", mock, TIMEOUT);
        assert_eq!(
            link.read_line().await.unwrap(),
            "{\"LDR_Analog\": 320, \"pH\": 6.8}"
        );
    }

    #[tokio::test]
    async fn test_silent_board_times_out_empty() {
        // Keep the writer half alive so the read pends instead of hitting EOF.
        let (_board, host) = tokio::io::duplex(64);
        let mut link = SerialLink::attach("silent", host, Duration::from_millis(50));
        assert_eq!(link.read_line().await.unwrap(), "");
        assert!(link.is_connected());
    }

    #[tokio::test]
    async fn test_read_error_surfaces() {
        let mock = tokio_test::io::Builder::new()
            .read_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged"))
            .build();
        let mut link = SerialLink::attach("mock", mock, TIMEOUT);
        assert!(matches!(
            link.read_line().await,
            Err(PipelineError::ReadFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_link_is_not_connected() {
        let data: &[u8] = b"{\"pH\": 7.0}\n";
        let mut link = SerialLink::attach("test", data, TIMEOUT);
        link.close().await;
        link.close().await;
        assert!(!link.is_connected());
        assert!(matches!(
            link.read_line().await,
            Err(PipelineError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_long_line_truncated() {
        let data: Vec<u8> = vec![b'x'; MAX_LINE_BYTES * 2];
        let mut link = SerialLink::attach("test", data.as_slice(), TIMEOUT);
        assert_eq!(link.read_line().await.unwrap().len(), MAX_LINE_BYTES);
        assert_eq!(link.read_line().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_long_line_rest_is_discarded() {
        let mut data = vec![b'x'; 1500];
        data.extend_from_slice(b"\n{\"LDR_Analog\": 550, \"pH\": 7.2}\n");
        let mut link = SerialLink::attach("test", data.as_slice(), TIMEOUT);

        assert_eq!(link.read_line().await.unwrap(), "x".repeat(MAX_LINE_BYTES));
        assert_eq!(
            link.read_line().await.unwrap(),
            "{\"LDR_Analog\": 550, \"pH\": 7.2}"
        );
    }

    #[tokio::test]
    async fn test_line_at_max_length_keeps_next_line() {
        let mut data = vec![b' '; MAX_LINE_BYTES - 1];
        data.push(b'7');
        data.extend_from_slice(b"\nnext\n");
        let mut link = SerialLink::attach("test", data.as_slice(), TIMEOUT);

        let first = link.read_line().await.unwrap();
        assert_eq!(first.trim_start(), "7");
        assert_eq!(link.read_line().await.unwrap(), "next");
        assert_eq!(link.read_line().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_timeout_mid_line_skips_the_tail() {
        use tokio::io::AsyncWriteExt;

        let (mut board, host) = tokio::io::duplex(256);
        let mut link = SerialLink::attach("slow", host, Duration::from_millis(50));

        board.write_all(b"{\"LDR_Analog\": 320, ").await.unwrap();
        assert_eq!(link.read_line().await.unwrap(), "{\"LDR_Analog\": 320,");

        board
            .write_all(b"\"pH\": 6.8}\n{\"LDR_Analog\": 550, \"pH\": 7.2}\n")
            .await
            .unwrap();
        assert_eq!(
            link.read_line().await.unwrap(),
            "{\"LDR_Analog\": 550, \"pH\": 7.2}"
        );
    }

    #[tokio::test]
    async fn test_timeout_while_skipping_tail_returns_empty() {
        use tokio::io::AsyncWriteExt;

        let (mut board, host) = tokio::io::duplex(256);
        let mut link = SerialLink::attach("slow", host, Duration::from_millis(50));

        board.write_all(b"{\"LDR_Analog\"").await.unwrap();
        assert_eq!(link.read_line().await.unwrap(), "{\"LDR_Analog\"");

        // Still inside the interrupted line: nothing usable yet
        board.write_all(b": 320, ").await.unwrap();
        assert_eq!(link.read_line().await.unwrap(), "");

        board.write_all(b"\"pH\": 6.8}\nok\n").await.unwrap();
        assert_eq!(link.read_line().await.unwrap(), "ok");
    }

    #[test]
    fn test_attach_keeps_timeout() {
        let data: &[u8] = b"";
        let link = SerialLink::attach("test", data, Duration::from_secs(3));
        assert_eq!(link.read_timeout(), Duration::from_secs(3));
        assert_eq!(link.source_name(), "test");
    }
}
