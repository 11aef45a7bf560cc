//! Session context.
//!
//! Holds everything one operator session needs: config, the classifier (if it
//! loaded), the serial link (if open) and the last error message. Passed to
//! each operation explicitly; nothing lives in globals.
//!
//! Only one link is held at a time. Opening a new one releases the old handle
//! first, and dropping the session releases whatever is still open.

use tracing::{info, warn};

use crate::acquisition::{self, LineSource, SerialLink};
use crate::config::{AcquisitionMode, AppConfig};
use crate::error::PipelineError;
use crate::model::{self, Classifier, ModelError};
use crate::pipeline;
use crate::types::{ClassificationResult, Reading};

pub struct Session {
    config: AppConfig,
    model: Option<Box<dyn Classifier>>,
    link: Option<Box<dyn LineSource>>,
    last_error: Option<String>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            model: None,
            link: None,
            last_error: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Classifier
    // ------------------------------------------------------------------

    /// Load the classifier named in the config.
    ///
    /// On failure the session keeps running without a model; `analyze`
    /// reports [`PipelineError::ModelUnavailable`] until a load succeeds.
    pub fn load_model(&mut self) -> Result<(), ModelError> {
        let path = self.config.model.path.clone();
        match model::load_classifier(&path) {
            Ok(classifier) => {
                self.model = Some(classifier);
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Classifier unavailable");
                self.model = None;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Install an already-constructed classifier.
    pub fn set_model(&mut self, classifier: Box<dyn Classifier>) {
        self.model = Some(classifier);
    }

    pub fn model(&self) -> Option<&dyn Classifier> {
        self.model.as_deref()
    }

    pub fn model_available(&self) -> bool {
        self.model.is_some()
    }

    // ------------------------------------------------------------------
    // Serial link
    // ------------------------------------------------------------------

    /// Open the configured serial port, releasing any existing link first.
    pub async fn connect(&mut self) -> Result<(), PipelineError> {
        self.disconnect().await;
        match SerialLink::open(&self.config.serial).await {
            Ok(link) => {
                self.link = Some(Box::new(link));
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Install an already-open link, releasing any existing link first.
    pub async fn attach_link(&mut self, link: Box<dyn LineSource>) {
        self.disconnect().await;
        info!(source = link.source_name(), "Link attached");
        self.link = Some(link);
    }

    /// Release the current link, if any.
    pub async fn disconnect(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close().await;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link.as_ref().is_some_and(|l| l.is_connected())
    }

    // ------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------

    /// Acquire one reading in the configured mode.
    ///
    /// With `fallback_to_synthetic` set, a bad device reading is replaced by
    /// a synthetic one; a missing link is still reported.
    pub async fn acquire(&mut self) -> Result<Reading, PipelineError> {
        let mode = self.config.acquisition.mode;
        let result = acquisition::acquire(mode, self.link.as_deref_mut()).await;

        match result {
            Err(e) if mode == AcquisitionMode::Device
                && self.config.acquisition.fallback_to_synthetic
                && e.is_bad_reading() =>
            {
                warn!(error = %e, "Device read failed, substituting synthetic reading");
                acquisition::acquire(AcquisitionMode::Synthetic, None).await
            }
            other => other,
        }
    }

    /// One analysis request: acquire a reading and classify it.
    ///
    /// Fails fast with [`PipelineError::ModelUnavailable`] before touching the
    /// link when no classifier is loaded.
    pub async fn analyze(&mut self) -> Result<ClassificationResult, PipelineError> {
        let outcome = self.run_analysis().await;
        match &outcome {
            Ok(_) => self.last_error = None,
            Err(e) => {
                warn!(error = %e, "Analysis failed");
                self.last_error = Some(e.to_string());
            }
        }
        outcome
    }

    async fn run_analysis(&mut self) -> Result<ClassificationResult, PipelineError> {
        if self.model.is_none() {
            return Err(PipelineError::ModelUnavailable(format!(
                "no classifier loaded from '{}'",
                self.config.model.path.display()
            )));
        }

        let reading = self.acquire().await?;
        let classifier = self
            .model
            .as_deref()
            .ok_or_else(|| PipelineError::ModelUnavailable("classifier unloaded".to_string()))?;
        pipeline::classify(reading, classifier)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
