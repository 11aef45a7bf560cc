//! E-Tongue: herb identification from LDR + pH readings
//!
//! Reads one sensor sample from the board over serial (or synthesizes one in
//! demo mode), runs it through a pre-trained classifier and attaches the
//! matching herb description.
//!
//! ## Architecture
//!
//! - **Acquisition**: serial link, JSON line parser, synthetic generator
//! - **Model**: `Classifier` seam and the exported tree/forest format
//! - **Pipeline**: feature vector layout, prediction, pH advisory
//! - **Session**: explicit context holding config, model and link

pub mod acquisition;
pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::PipelineError;
pub use model::{Classifier, ModelError};
pub use pipeline::classify;
pub use session::Session;
pub use types::{ClassificationResult, FeatureVector, HerbInfo, Reading};
