//! Plain-text rendering for the terminal.
//!
//! Stands in for the display collaborator: takes a finished result (or a
//! table) and formats it. No decisions are made here.

use std::path::Path;

use crate::acquisition::PortInfo;
use crate::config::defaults::MIN_MODEL_FEATURES;
use crate::dataset::DatasetRow;
use crate::model::{Classifier, TreeEnsemble};
use crate::types::{known_herbs, ClassificationResult};

/// Render one analysis result.
pub fn render_result(result: &ClassificationResult) -> String {
    let r = &result.reading;
    let mut out = String::new();
    out.push_str(&format!("Identified Herb: {}\n\n", result.label));
    out.push_str(&format!("  LDR Analog   {}\n", r.ldr_analog));
    out.push_str(&format!("  LDR Digital  {}\n", r.ldr_digital_display()));
    out.push_str(&format!("  Soil pH      {}\n\n", r.ph));
    out.push_str("Herb Properties\n");
    out.push_str(&format!("  {}\n", result.info.properties));
    out.push_str("Medicinal Uses\n");
    out.push_str(&format!("  {}\n", result.info.uses));
    if result.abnormal_ph {
        out.push_str("\nWARNING: Abnormal pH detected, sample may be invalid!\n");
    }
    out
}

/// Render the sample dataset as an aligned table.
pub fn render_dataset(rows: &[DatasetRow]) -> String {
    let mut out = format!("{:>10}  {:>5}  Herb\n", "LDR_Analog", "pH");
    for row in rows {
        out.push_str(&format!(
            "{:>10}  {:>5}  {}\n",
            row.ldr_analog, row.ph, row.herb
        ));
    }
    out
}

/// Render the static herb table.
pub fn render_herbs() -> String {
    let mut out = String::new();
    for (name, info) in known_herbs() {
        out.push_str(&format!("{name}\n"));
        out.push_str(&format!("  Properties: {}\n", info.properties));
        out.push_str(&format!("  Uses:       {}\n", info.uses));
    }
    out
}

pub fn render_ports(ports: &[PortInfo]) -> String {
    if ports.is_empty() {
        return "No serial ports found\n".to_string();
    }
    let mut out = String::new();
    for p in ports {
        out.push_str(&format!("{:<16} {}\n", p.name, p.description));
    }
    out
}

/// Summarise a loaded classifier: source file, kind, input width and classes.
pub fn render_model_summary(path: &Path, model: &TreeEnsemble) -> String {
    let mut out = String::new();
    out.push_str(&format!("Model:    {}\n", path.display()));
    out.push_str(&format!(
        "Kind:     {:?} ({} tree(s))\n",
        model.kind(),
        model.tree_count()
    ));
    out.push_str(&format!("Features: {}\n", model.expected_features()));
    if !model.feature_names().is_empty() {
        out.push_str(&format!("          {}\n", model.feature_names().join(", ")));
    }
    out.push_str(&format!("Classes:  {}\n", model.labels().join(", ")));
    if model.expected_features() > MIN_MODEL_FEATURES {
        out.push_str(&format!(
            "Note:     inputs {} and above are zero-filled\n",
            MIN_MODEL_FEATURES + 1
        ));
    }
    out
}
