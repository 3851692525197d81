//! Location query handling
//!
//! This module covers everything between a searched string and a
//! gazetteer result:
//! - Postcode classification (full/partial, UK/NI)
//! - Search terms carried in location page URLs
//! - Matching a location page back to its gazetteer result

pub mod id_match;
pub mod postcode;
pub mod search_terms;

pub use id_match::{IdMatch, get_id_match};
pub use postcode::{PostcodeClassification, PostcodeType, classify_postcode};
pub use search_terms::{SearchTerms, parse_search_terms};
