//! UK / Northern Ireland postcode classification

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static FULL_NI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^BT\d{1,2}\s?\d[A-Z]{2}$").expect("valid full NI regex"));
static PARTIAL_NI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^BT\d{1,2}$").expect("valid partial NI regex"));
static FULL_UK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,2}\d[A-Z\d]?\s?\d[A-Z]{2}$").expect("valid full UK regex")
});
static PARTIAL_UK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z]{1,2}\d[A-Z\d]?$").expect("valid partial UK regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PostcodeType {
    #[serde(rename = "Full Northern Ireland Postcode")]
    FullNorthernIreland,
    #[serde(rename = "Partial Northern Ireland Postcode")]
    PartialNorthernIreland,
    #[serde(rename = "Full UK Postcode")]
    FullUk,
    #[serde(rename = "Partial UK Postcode")]
    PartialUk,
    #[serde(rename = "Invalid Postcode")]
    Invalid,
}

impl PostcodeType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullNorthernIreland => "Full Northern Ireland Postcode",
            Self::PartialNorthernIreland => "Partial Northern Ireland Postcode",
            Self::FullUk => "Full UK Postcode",
            Self::PartialUk => "Partial UK Postcode",
            Self::Invalid => "Invalid Postcode",
        }
    }
}

impl fmt::Display for PostcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostcodeClassification {
    pub postcode_type: PostcodeType,
}

/// Classify free text as a full/partial NI or UK postcode. NI patterns are
/// tried first since every NI postcode also looks like a UK one.
#[must_use]
pub fn classify_postcode(text: Option<&str>) -> PostcodeClassification {
    let text = text.map(str::trim).unwrap_or_default();
    let postcode_type = if FULL_NI.is_match(text) {
        PostcodeType::FullNorthernIreland
    } else if PARTIAL_NI.is_match(text) {
        PostcodeType::PartialNorthernIreland
    } else if FULL_UK.is_match(text) {
        PostcodeType::FullUk
    } else if PARTIAL_UK.is_match(text) {
        PostcodeType::PartialUk
    } else {
        PostcodeType::Invalid
    };
    PostcodeClassification { postcode_type }
}
