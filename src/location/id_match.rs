//! Pick the gazetteer result a location page refers to

use serde::Serialize;

use crate::models::{GazetteerMatch, LocationType};

/// Outcome of an ID lookup. `location_details` is `None` when nothing
/// matched, which callers render as "location not found".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdMatch {
    pub location_index: usize,
    pub location_details: Option<GazetteerMatch>,
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Find the result whose gazetteer ID equals `location_id`, ignoring
/// whitespace. UK IDs compare case-sensitively; NI IDs are postcodes and
/// compare case-insensitively.
#[must_use]
pub fn get_id_match(
    location_id: &str,
    uk_results: &[GazetteerMatch],
    ni_results: &[GazetteerMatch],
    location_type: LocationType,
    fallback_index: usize,
) -> IdMatch {
    let wanted = strip_whitespace(location_id);
    let (results, case_sensitive) = match location_type {
        LocationType::Uk => (uk_results, true),
        LocationType::Ni => (ni_results, false),
    };

    let found = results.iter().enumerate().find(|(_, candidate)| {
        let id = strip_whitespace(candidate.id());
        if case_sensitive {
            id == wanted
        } else {
            id.eq_ignore_ascii_case(&wanted)
        }
    });

    match found {
        Some((index, details)) => IdMatch {
            location_index: index,
            location_details: Some(details.clone()),
        },
        None => {
            tracing::debug!(location_id, %location_type, "no gazetteer result matches location id");
            IdMatch {
                location_index: fallback_index,
                location_details: None,
            }
        }
    }
}
