//! Search-term extraction from referer URL query strings

use crate::url::{extract_query, parse_query_pairs};

/// Pull the search term out of a referer URL's query string.
///
/// Pairs are checked in query-string order and the first pair whose name
/// appears in `parameter_names` wins - not the first candidate name. An
/// absent, empty, or malformed query yields None; extraction never fails
/// harder than that.
pub fn extract_search_term(referer_url: &str, parameter_names: &[String]) -> Option<String> {
    let query = extract_query(referer_url)?;
    let pairs = parse_query_pairs(query)?;

    pairs
        .into_iter()
        .find(|(name, _)| parameter_names.iter().any(|candidate| candidate == name))
        .map(|(_, value)| value)
}
