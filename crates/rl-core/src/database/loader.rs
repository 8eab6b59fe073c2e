//! Definition validation and the domain lookup engine

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::types::{Medium, RefererRecord};

use super::schema::{RawDefinition, RawSource};

/// Error type for database construction.
///
/// Every violation aborts the whole build; no partially-usable database
/// is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum CorruptDatabaseError {
    #[error("definition is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown medium '{0}'")]
    UnknownMedium(String),
    #[error("medium '{0}' is reserved for classification outcomes and cannot declare sources")]
    ReservedMedium(String),
    #[error("no parameters found for search referer '{0}'")]
    MissingParameters(String),
    #[error("parameters not supported for non-search referer '{0}'")]
    UnexpectedParameters(String),
    #[error("no domains found for referer '{0}'")]
    MissingDomains(String),
    #[error("duplicate of domain '{0}' found")]
    DuplicateDomain(String),
}

/// Immutable mapping from lookup key to referer record.
///
/// A lookup key is a host, or a host plus a path prefix such as
/// `orange.fr/webmail`. Built once from a definition document and
/// read-only afterwards, so concurrent classification calls share it
/// without coordination.
#[derive(Debug, Clone)]
pub struct RefererDatabase {
    records: Vec<RefererRecord>,
    domains: HashMap<String, u32>,
}

impl RefererDatabase {
    /// Build a database from a JSON definition document.
    pub fn from_json(text: &str) -> Result<Self, CorruptDatabaseError> {
        let raw: RawDefinition = serde_json::from_str(text)?;
        Self::from_definition(raw)
    }

    /// Build a database from an already-decoded definition tree.
    pub fn from_definition(raw: RawDefinition) -> Result<Self, CorruptDatabaseError> {
        let mut records: Vec<RefererRecord> = Vec::new();
        let mut domains: HashMap<String, u32> = HashMap::new();

        for (medium_name, sources) in raw {
            let medium = Medium::from_name(&medium_name)
                .ok_or_else(|| CorruptDatabaseError::UnknownMedium(medium_name.clone()))?;

            // Internal and Unknown are outcome categories the classifier
            // assigns itself; a definition may not claim them.
            if matches!(medium, Medium::Internal | Medium::Unknown) {
                return Err(CorruptDatabaseError::ReservedMedium(medium_name));
            }

            for (source_name, source) in sources {
                let RawSource { domains: domain_list, parameters } = source;

                let parameters = match (medium, parameters) {
                    (Medium::Search, Some(parameters)) if !parameters.is_empty() => parameters,
                    (Medium::Search, _) => {
                        return Err(CorruptDatabaseError::MissingParameters(source_name));
                    }
                    (_, None) => Vec::new(),
                    (_, Some(_)) => {
                        return Err(CorruptDatabaseError::UnexpectedParameters(source_name));
                    }
                };

                let domain_list = match domain_list {
                    Some(domain_list) if !domain_list.is_empty() => domain_list,
                    _ => return Err(CorruptDatabaseError::MissingDomains(source_name)),
                };

                let record_id = records.len() as u32;
                records.push(RefererRecord {
                    medium,
                    source: source_name,
                    parameters,
                });

                for domain in domain_list {
                    match domains.entry(normalize_key(&domain)) {
                        Entry::Occupied(_) => {
                            return Err(CorruptDatabaseError::DuplicateDomain(domain));
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(record_id);
                        }
                    }
                }
            }
        }

        log::debug!(
            "referer database built: {} sources, {} domains",
            records.len(),
            domains.len()
        );

        Ok(Self { records, domains })
    }

    /// Number of lookup keys in the database.
    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    /// Number of distinct sources.
    pub fn source_count(&self) -> usize {
        self.records.len()
    }

    /// Iterate all source records.
    pub fn sources(&self) -> impl Iterator<Item = &RefererRecord> {
        self.records.iter()
    }

    #[inline]
    fn get(&self, key: &str) -> Option<&RefererRecord> {
        self.domains.get(key).map(|&id| &self.records[id as usize])
    }

    /// Find the most specific record for a host and path.
    ///
    /// At each subdomain level the lookup tries host + full path, then
    /// host + first path segment, then the bare host; on a miss the
    /// leftmost host label is stripped and the walk repeats with the
    /// original path. The loop is bounded by the host's label count.
    pub fn find(&self, host: &str, path: &str) -> Option<&RefererRecord> {
        let host = host.to_ascii_lowercase();
        let mut host = host.as_str();
        let mut key = String::with_capacity(host.len() + path.len());

        loop {
            if !path.is_empty() {
                key.clear();
                key.push_str(host);
                key.push_str(path);
                if let Some(record) = self.get(&key) {
                    return Some(record);
                }

                if let Some(segment) = first_path_segment(path) {
                    key.clear();
                    key.push_str(host);
                    key.push('/');
                    key.push_str(segment);
                    if let Some(record) = self.get(&key) {
                        return Some(record);
                    }
                }
            }

            if let Some(record) = self.get(host) {
                return Some(record);
            }

            // Broaden: drop the leftmost label and retry.
            match host.find('.') {
                Some(idx) => host = &host[idx + 1..],
                None => return None,
            }
        }
    }
}

/// First non-empty '/'-delimited component of a path.
fn first_path_segment(path: &str) -> Option<&str> {
    path.split('/').find(|segment| !segment.is_empty())
}

/// Lookup keys compare hosts without case; the path portion, when a
/// domain entry carries one, is kept verbatim.
fn normalize_key(domain: &str) -> String {
    match domain.find('/') {
        Some(idx) => {
            let mut key = domain[..idx].to_ascii_lowercase();
            key.push_str(&domain[idx..]);
            key
        }
        None => domain.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_database() -> RefererDatabase {
        RefererDatabase::from_json(
            r#"{
                "search": {
                    "Google": { "domains": ["google.com", "www.google.com"], "parameters": ["q"] },
                    "Apollo": { "domains": ["apollo.lv/portal/search", "apollo.lv/portal"], "parameters": ["q"] }
                },
                "email": {
                    "Orange Webmail": { "domains": ["orange.fr/webmail"] }
                },
                "social": {
                    "Facebook": { "domains": ["facebook.com", "fb.me"] }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_build_counts() {
        let db = sample_database();
        assert_eq!(db.source_count(), 4);
        assert_eq!(db.domain_count(), 7);
    }

    #[test]
    fn test_find_prefers_full_path_key() {
        let db = sample_database();
        let record = db.find("apollo.lv", "/portal/search").unwrap();
        assert_eq!(record.source, "Apollo");

        // Path below the one-level key still resolves through it
        let record = db.find("apollo.lv", "/portal/other").unwrap();
        assert_eq!(record.source, "Apollo");
    }

    #[test]
    fn test_find_one_level_path_key() {
        let db = sample_database();
        let record = db.find("orange.fr", "/webmail/fr_FR/read.html").unwrap();
        assert_eq!(record.medium, Medium::Email);
        assert_eq!(record.source, "Orange Webmail");
    }

    #[test]
    fn test_find_bare_host_fallback() {
        let db = sample_database();
        let record = db.find("facebook.com", "/some/page.html").unwrap();
        assert_eq!(record.source, "Facebook");
    }

    #[test]
    fn test_find_strips_subdomains() {
        let db = sample_database();
        let record = db.find("news.l.google.com", "/").unwrap();
        assert_eq!(record.source, "Google");
        // www.google.com is its own key and wins before stripping
        let record = db.find("www.google.com", "").unwrap();
        assert_eq!(record.source, "Google");
    }

    #[test]
    fn test_find_without_dot_reports_not_found() {
        let db = sample_database();
        assert!(db.find("nosuchdomainatall", "/x").is_none());
        assert!(db.find("unknown.example.org", "/x").is_none());
    }

    #[test]
    fn test_find_host_case_insensitive() {
        let db = sample_database();
        assert!(db.find("WWW.Google.COM", "").is_some());
    }

    #[test]
    fn test_duplicate_domain_is_fatal() {
        let err = RefererDatabase::from_json(
            r#"{
                "social": {
                    "A": { "domains": ["x.com"] },
                    "B": { "domains": ["x.com"] }
                }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::DuplicateDomain(domain) if domain == "x.com"));
    }

    #[test]
    fn test_search_requires_parameters() {
        let err = RefererDatabase::from_json(
            r#"{ "search": { "Google": { "domains": ["google.com"] } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::MissingParameters(source) if source == "Google"));

        let err = RefererDatabase::from_json(
            r#"{ "search": { "Google": { "domains": ["google.com"], "parameters": [] } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::MissingParameters(_)));
    }

    #[test]
    fn test_non_search_rejects_parameters() {
        let err = RefererDatabase::from_json(
            r#"{ "social": { "Facebook": { "domains": ["facebook.com"], "parameters": ["q"] } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::UnexpectedParameters(_)));
    }

    #[test]
    fn test_domains_must_be_present_and_non_empty() {
        let err = RefererDatabase::from_json(r#"{ "social": { "Facebook": {} } }"#).unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::MissingDomains(_)));

        let err = RefererDatabase::from_json(
            r#"{ "social": { "Facebook": { "domains": [] } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::MissingDomains(_)));
    }

    #[test]
    fn test_unknown_medium_is_fatal() {
        let err = RefererDatabase::from_json(
            r#"{ "paid": { "Ads": { "domains": ["ads.example"] } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::UnknownMedium(medium) if medium == "paid"));
    }

    #[test]
    fn test_reserved_medium_is_fatal() {
        let err = RefererDatabase::from_json(
            r#"{ "internal": { "Us": { "domains": ["us.example"] } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::ReservedMedium(_)));
    }

    #[test]
    fn test_unknown_field_in_source_is_fatal() {
        let err = RefererDatabase::from_json(
            r#"{ "social": { "Facebook": { "domains": ["facebook.com"], "color": "blue" } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CorruptDatabaseError::Json(_)));
    }
}
