//! Pollutant concentration to DAQI band classification
//!
//! Thresholds are per pollutant and identical in both languages; the
//! language only picks the label table. Boundaries are inclusive upper
//! limits and Very high is unbounded.

pub mod labels;

use serde::Serialize;
use std::fmt;

use crate::models::Lang;

pub use labels::{band_label, month_name, pollutant_label};

/// Pollutant codes reported by the monitoring network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollutantCode {
    No2,
    Pm10,
    /// PM10 measured by gravimetric-equivalent instruments
    Ge10,
    Pm25,
    O3,
    So2,
}

impl PollutantCode {
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NO2" => Some(Self::No2),
            "PM10" => Some(Self::Pm10),
            "GE10" => Some(Self::Ge10),
            "PM25" => Some(Self::Pm25),
            "O3" => Some(Self::O3),
            "SO2" => Some(Self::So2),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::No2 => "NO2",
            Self::Pm10 => "PM10",
            Self::Ge10 => "GE10",
            Self::Pm25 => "PM25",
            Self::O3 => "O3",
            Self::So2 => "SO2",
        }
    }

    /// Upper bounds of Low, Moderate and High in µg/m³
    #[must_use]
    pub fn thresholds(self) -> [f64; 3] {
        match self {
            Self::Pm10 | Self::Ge10 => [50.0, 75.0, 100.0],
            Self::No2 => [200.0, 400.0, 600.0],
            Self::Pm25 => [36.0, 53.0, 70.0],
            Self::So2 => [266.0, 710.0, 1064.0],
            Self::O3 => [100.0, 160.0, 240.0],
        }
    }

    #[must_use]
    pub fn band(self, concentration: f64) -> Band {
        let [low, moderate, high] = self.thresholds();
        if concentration <= low {
            Band::Low
        } else if concentration <= moderate {
            Band::Moderate
        } else if concentration <= high {
            Band::High
        } else {
            Band::VeryHigh
        }
    }
}

impl fmt::Display for PollutantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// DAQI bands, in ascending order of severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Band {
    /// DAQI index reported for a reading in this band
    #[must_use]
    pub fn daqi_index(self) -> u8 {
        match self {
            Band::Low => 1,
            Band::Moderate => 4,
            Band::High => 7,
            Band::VeryHigh => 10,
        }
    }

    /// Band covering a 1..=10 DAQI forecast value
    #[must_use]
    pub fn from_daqi(index: u8) -> Option<Self> {
        match index {
            1..=3 => Some(Band::Low),
            4..=6 => Some(Band::Moderate),
            7..=9 => Some(Band::High),
            10 => Some(Band::VeryHigh),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self, lang: Lang) -> &'static str {
        band_label(self, lang)
    }
}

/// Classification of one reading; `{0, ""}` when it cannot be classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantLevel {
    pub daqi_index: u8,
    pub band: &'static str,
}

impl PollutantLevel {
    pub const UNCLASSIFIED: PollutantLevel = PollutantLevel {
        daqi_index: 0,
        band: "",
    };
}

/// Classify a concentration for a pollutant code using `lang`'s labels.
#[must_use]
pub fn classify(concentration: f64, code: &str, lang: Lang) -> PollutantLevel {
    let Some(pollutant) = PollutantCode::from_code(code) else {
        return PollutantLevel::UNCLASSIFIED;
    };
    if !concentration.is_finite() {
        return PollutantLevel::UNCLASSIFIED;
    }
    let band = pollutant.band(concentration);
    PollutantLevel {
        daqi_index: band.daqi_index(),
        band: band.label(lang),
    }
}

/// English-labelled classification
#[must_use]
pub fn pollutant_level(concentration: f64, code: &str) -> PollutantLevel {
    classify(concentration, code, Lang::En)
}

/// Welsh-labelled classification
#[must_use]
pub fn pollutant_level_cy(concentration: f64, code: &str) -> PollutantLevel {
    classify(concentration, code, Lang::Cy)
}

/// Display name of a pollutant code; empty for unknown codes
#[must_use]
pub fn pollutant_name(code: &str, lang: Lang) -> &'static str {
    PollutantCode::from_code(code).map_or("", |c| pollutant_label(c, lang))
}

/// Band label for a DAQI forecast value; empty outside 1..=10
#[must_use]
pub fn daqi_band(index: u8, lang: Lang) -> &'static str {
    Band::from_daqi(index).map_or("", |band| band.label(lang))
}
