//! Search terms carried in location page URLs
//!
//! Location pages look like `/location/n8-7ge_haringey?lang=en` (English)
//! or `/lleoliad/bt93-8ad_fermanagh-and-omagh?lang=cy` (Welsh). The slug
//! holds the searched text with `-` for spaces and an optional `_`
//! separated disambiguating term.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::models::{LOCATION_TYPE_NI, LOCATION_TYPE_UK, Lang};

const ENGLISH_SEGMENT: &str = "location";
const WELSH_SEGMENT: &str = "lleoliad";

/// Outward code, optional separator, inward code, not embedded in a longer
/// alphanumeric run.
static POSTCODE_IN_SLUG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])([a-z]{1,2}\d[a-z\d]?)[ _-]?(\d[a-z]{2})(?:$|[^a-z0-9])")
        .expect("valid slug postcode regex")
});
static NI_OUTWARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^bt\d{1,2}$").expect("valid NI outward regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTerms {
    pub search_terms: String,
    pub second_search_term: String,
    pub search_terms_lang: String,
    pub search_terms_location_type: String,
}

/// Extract search terms, language and location type from a page URL.
#[must_use]
pub fn parse_search_terms(url: &str) -> SearchTerms {
    let search_terms_lang = url
        .split('/')
        .nth(3)
        .and_then(|segment| segment.split('?').next())
        .map(|segment| match segment {
            WELSH_SEGMENT => Lang::Cy.code(),
            ENGLISH_SEGMENT => Lang::En.code(),
            _ => "",
        })
        .unwrap_or_default()
        .to_string();

    let path = url.split('?').next().unwrap_or_default();
    let raw_slug = path.rsplit('/').next().unwrap_or_default();
    let slug = urlencoding::decode(raw_slug).map_or_else(|_| raw_slug.to_string(), |s| s.into_owned());

    if slug.is_empty() {
        return SearchTerms {
            search_terms_lang,
            ..SearchTerms::default()
        };
    }

    if let Some(caps) = POSTCODE_IN_SLUG.captures(&slug) {
        let (Some(outward), Some(inward)) = (caps.get(1), caps.get(2)) else {
            return SearchTerms {
                search_terms_lang,
                ..SearchTerms::default()
            };
        };
        let location_type = if NI_OUTWARD.is_match(outward.as_str()) {
            LOCATION_TYPE_NI
        } else {
            LOCATION_TYPE_UK
        };
        let remainder = slug[inward.end()..].trim_start_matches(['_', '-', ' ']);
        return SearchTerms {
            search_terms: format!("{} {}", outward.as_str(), inward.as_str()),
            second_search_term: dehyphenate(remainder),
            search_terms_lang,
            search_terms_location_type: location_type.to_string(),
        };
    }

    let (first, second) = slug.split_once('_').unwrap_or((slug.as_str(), ""));
    SearchTerms {
        search_terms: dehyphenate(first),
        second_search_term: dehyphenate(second),
        search_terms_lang,
        search_terms_location_type: LOCATION_TYPE_UK.to_string(),
    }
}

fn dehyphenate(part: &str) -> String {
    part.replace('-', " ").trim().to_string()
}
