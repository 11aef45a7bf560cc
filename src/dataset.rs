//! Sample dataset shown next to the classifier.
//!
//! Read-only and for display: the pipeline never consumes these rows. The
//! file is a CSV with `LDR_Analog,pH,Herb` columns; when none is configured
//! the three demo samples are used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read dataset '{}' (row {row}): {source}", path.display())]
    Row {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// One labelled sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    #[serde(rename = "LDR_Analog")]
    pub ldr_analog: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    #[serde(rename = "Herb")]
    pub herb: String,
}

impl DatasetRow {
    fn new(ldr_analog: f64, ph: f64, herb: &str) -> Self {
        Self {
            ldr_analog,
            ph,
            herb: herb.to_string(),
        }
    }
}

/// Built-in samples used when no dataset file is configured.
pub fn demo_rows() -> Vec<DatasetRow> {
    vec![
        DatasetRow::new(320.0, 6.8, "Tulsi"),
        DatasetRow::new(550.0, 7.2, "Neem"),
        DatasetRow::new(430.0, 6.5, "Ashwagandha"),
    ]
}

/// Read every row of a dataset CSV.
pub fn load_dataset(path: &Path) -> Result<Vec<DatasetRow>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let rows = reader
        .deserialize::<DatasetRow>()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|source| DatasetError::Row {
                path: path.to_path_buf(),
                row: i + 1,
                source,
            })
        })
        .collect::<Result<Vec<DatasetRow>, _>>()?;

    info!(path = %path.display(), rows = rows.len(), "Dataset loaded");
    Ok(rows)
}

/// Configured dataset, or the demo rows when `path` is `None`.
pub fn load_or_demo(path: Option<&Path>) -> Result<Vec<DatasetRow>, DatasetError> {
    match path {
        Some(p) => load_dataset(p),
        None => Ok(demo_rows()),
    }
}
