//! Static herb descriptions keyed by classifier label.

use serde::Serialize;

/// Descriptive text shown next to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HerbInfo {
    #[serde(rename = "Properties")]
    pub properties: &'static str,
    #[serde(rename = "Uses")]
    pub uses: &'static str,
}

/// Entry returned for labels the table does not know.
pub const UNKNOWN_HERB: HerbInfo = HerbInfo {
    properties: "Not in dataset",
    uses: "Needs further research",
};

const HERB_TABLE: &[(&str, HerbInfo)] = &[
    (
        "Tulsi",
        HerbInfo {
            properties: "Rich in antioxidants, antimicrobial",
            uses: "Helps with cold, cough, respiratory issues",
        },
    ),
    (
        "Neem",
        HerbInfo {
            properties: "Anti-bacterial, antifungal, blood purifier",
            uses: "Treats skin diseases, dental issues, boosts immunity",
        },
    ),
    (
        "Ashwagandha",
        HerbInfo {
            properties: "Adaptogenic, stress reliever",
            uses: "Reduces stress, boosts energy, improves sleep",
        },
    ),
    ("Unknown", UNKNOWN_HERB),
];

/// Look up a label (exact, case-sensitive), falling back to [`UNKNOWN_HERB`].
pub fn herb_info(label: &str) -> HerbInfo {
    HERB_TABLE
        .iter()
        .find(|(name, _)| *name == label)
        .map_or(UNKNOWN_HERB, |(_, info)| *info)
}

/// All table entries in display order.
pub fn known_herbs() -> impl Iterator<Item = (&'static str, HerbInfo)> {
    HERB_TABLE.iter().map(|(name, info)| (*name, *info))
}
