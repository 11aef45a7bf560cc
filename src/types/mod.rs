//! Shared data structures for the sensing-and-classification pipeline
//!
//! - [`Reading`]: one sensor sample (LDR analog, optional LDR digital, pH)
//! - [`FeatureVector`]: fixed-width classifier input built from a reading
//! - [`HerbInfo`]: static descriptive text per herb label
//! - [`ClassificationResult`]: label + reading + info + pH advisory

mod herb;
mod reading;
mod result;

pub use herb::{herb_info, known_herbs, HerbInfo, UNKNOWN_HERB};
pub use reading::Reading;
pub use result::{ClassificationResult, FeatureVector};
