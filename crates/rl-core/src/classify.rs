//! Classification orchestrator
//!
//! Ties the pieces together: URL validation, the internal check, the
//! database lookup, and search-term extraction.

use crate::allowlist::AllowList;
use crate::database::RefererDatabase;
use crate::search::extract_search_term;
use crate::types::{Medium, Referer};
use crate::url::{extract_host, extract_path, extract_scheme};

/// Referer classifier.
///
/// Owns the database for its lifetime; individual calls read it without
/// coordination, so they may run concurrently.
#[derive(Debug)]
pub struct Classifier {
    database: RefererDatabase,
}

impl Classifier {
    /// Create a classifier over a validated database.
    pub fn new(database: RefererDatabase) -> Self {
        Self { database }
    }

    /// The database backing this classifier.
    pub fn database(&self) -> &RefererDatabase {
        &self.database
    }

    /// Classify a referer URL against the host of the receiving page.
    ///
    /// None means the input is not a referer at all - empty, unparseable,
    /// missing a host, or not http(s). That is a sentinel, not an error;
    /// classification never fails.
    pub fn classify(&self, referer_url: &str, page_host: &str) -> Option<Referer> {
        self.classify_with_allow_list(referer_url, page_host, None)
    }

    /// Classify with an internal-domains allow-list.
    ///
    /// `None` for the list signals that no allow-list is available;
    /// internal detection then reduces to exact page-host equality.
    pub fn classify_with_allow_list(
        &self,
        referer_url: &str,
        page_host: &str,
        allow_list: Option<&AllowList>,
    ) -> Option<Referer> {
        if referer_url.is_empty() {
            return None;
        }

        extract_scheme(referer_url)?;
        let host = extract_host(referer_url)?;

        if host.eq_ignore_ascii_case(page_host)
            || allow_list.is_some_and(|list| list.is_internal(host))
        {
            return Some(Referer::internal());
        }

        let record = match self.database.find(host, extract_path(referer_url)) {
            Some(record) => record,
            None => return Some(Referer::unknown()),
        };

        let term = if record.medium == Medium::Search {
            extract_search_term(referer_url, &record.parameters)
        } else {
            None
        };

        Some(Referer {
            medium: record.medium,
            source: Some(record.source.clone()),
            term,
        })
    }

    /// Classify against a page URL instead of a bare host.
    ///
    /// A page URL without a host component yields no internal-by-equality
    /// match; the rest of the classification is unaffected.
    pub fn classify_with_page_url(
        &self,
        referer_url: &str,
        page_url: &str,
        allow_list: Option<&AllowList>,
    ) -> Option<Referer> {
        let page_host = extract_host(page_url).unwrap_or("");
        self.classify_with_allow_list(referer_url, page_host, allow_list)
    }
}
