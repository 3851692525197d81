//! English and Welsh label tables

use crate::models::Lang;

use super::{Band, PollutantCode};

#[must_use]
pub fn band_label(band: Band, lang: Lang) -> &'static str {
    match (lang, band) {
        (Lang::En, Band::Low) => "Low",
        (Lang::En, Band::Moderate) => "Moderate",
        (Lang::En, Band::High) => "High",
        (Lang::En, Band::VeryHigh) => "Very high",
        (Lang::Cy, Band::Low) => "Isel",
        (Lang::Cy, Band::Moderate) => "Cymedrol",
        (Lang::Cy, Band::High) => "Uchel",
        (Lang::Cy, Band::VeryHigh) => "Uchel iawn",
    }
}

#[must_use]
pub fn pollutant_label(code: PollutantCode, lang: Lang) -> &'static str {
    match (lang, code) {
        (_, PollutantCode::Pm10 | PollutantCode::Ge10) => "PM10",
        (_, PollutantCode::Pm25) => "PM2.5",
        (Lang::En, PollutantCode::No2) => "Nitrogen dioxide",
        (Lang::En, PollutantCode::O3) => "Ozone",
        (Lang::En, PollutantCode::So2) => "Sulphur dioxide",
        (Lang::Cy, PollutantCode::No2) => "Nitrogen deuocsid",
        (Lang::Cy, PollutantCode::O3) => "Osôn",
        (Lang::Cy, PollutantCode::So2) => "Sylffwr deuocsid",
    }
}

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_CY: [&str; 12] = [
    "Ionawr",
    "Chwefror",
    "Mawrth",
    "Ebrill",
    "Mai",
    "Mehefin",
    "Gorffennaf",
    "Awst",
    "Medi",
    "Hydref",
    "Tachwedd",
    "Rhagfyr",
];

/// Month name for a 1-based month; empty outside 1..=12
#[must_use]
pub fn month_name(month: u32, lang: Lang) -> &'static str {
    let table = match lang {
        Lang::En => &MONTHS_EN,
        Lang::Cy => &MONTHS_CY,
    };
    month
        .checked_sub(1)
        .and_then(|i| table.get(i as usize))
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1, Lang::En), "January");
        assert_eq!(month_name(3, Lang::Cy), "Mawrth");
        assert_eq!(month_name(12, Lang::Cy), "Rhagfyr");
        assert_eq!(month_name(0, Lang::En), "");
        assert_eq!(month_name(13, Lang::En), "");
    }

    #[test]
    fn test_pollutant_labels() {
        assert_eq!(pollutant_label(PollutantCode::No2, Lang::Cy), "Nitrogen deuocsid");
        assert_eq!(pollutant_label(PollutantCode::Ge10, Lang::En), "PM10");
    }
}
