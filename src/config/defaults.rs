//! System-wide default constants.
//!
//! Centralises the magic numbers of the sensing rig and its sketch.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Serial Link
// ============================================================================

/// Baud rate the sensor sketch writes at.
pub const SERIAL_BAUD_RATE: u32 = 9_600;

/// Default port on Windows hosts (Arduino Uno enumerates as COM3 on most).
pub const SERIAL_PORT_WINDOWS: &str = "COM3";

/// Default port on Linux/macOS hosts.
pub const SERIAL_PORT_UNIX: &str = "/dev/ttyACM0";

/// Per-line read timeout (seconds). On expiry the read yields an empty line.
pub const SERIAL_READ_TIMEOUT_SECS: u64 = 1;

/// Delay after opening the port before the first read (ms).
///
/// Opening the port toggles DTR, which resets the board; the sketch needs
/// roughly two seconds before it starts printing again.
pub const SERIAL_SETTLE_DELAY_MS: u64 = 2_000;

// ============================================================================
// Readings
// ============================================================================

/// Lower bound of the plausible soil pH window (inclusive).
pub const PH_MIN: f64 = 5.5;

/// Upper bound of the plausible soil pH window (inclusive).
pub const PH_MAX: f64 = 8.5;

/// Synthetic LDR analog range (inclusive).
pub const SYNTHETIC_LDR_MIN: f64 = 200.0;
pub const SYNTHETIC_LDR_MAX: f64 = 800.0;

/// Decimal places kept on synthetic values.
pub const SYNTHETIC_DECIMALS: i32 = 2;

// ============================================================================
// Model
// ============================================================================

/// Classifier file, relative to the working directory (the shipped demo model).
pub const MODEL_FILE: &str = "data/herb_classifier.json";

/// Format tag written by the export script.
pub const MODEL_FORMAT_TAG: &str = "herb-classifier/v1";

/// Smallest usable classifier input width (LDR analog + pH).
pub const MIN_MODEL_FEATURES: usize = 2;

// ============================================================================
// Configuration
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "ETONGUE_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "etongue.toml";

/// Platform default serial port.
pub fn default_serial_port() -> &'static str {
    if cfg!(windows) {
        SERIAL_PORT_WINDOWS
    } else {
        SERIAL_PORT_UNIX
    }
}
