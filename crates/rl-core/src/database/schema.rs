//! Referer database definition schema
//!
//! The definition document is a two-level JSON map: medium name → source
//! name → domains/parameters. Decoding stops at this raw shape; `loader`
//! validates it and projects it into the runtime database, so ambiguous
//! or partially-filled entries never reach the lookup path.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Raw definition document, keyed by medium name.
pub type RawDefinition = BTreeMap<String, BTreeMap<String, RawSource>>;

/// One source entry as it appears in the definition document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSource {
    /// Domains (optionally domain + path prefix) claimed by this source
    pub domains: Option<Vec<String>>,
    /// Search-term query parameter names; search sources only
    pub parameters: Option<Vec<String>>,
}
