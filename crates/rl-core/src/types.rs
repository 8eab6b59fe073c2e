//! Core type definitions for RefLens
//!
//! These types describe the referer database records and the
//! classification results produced by the engine.

use std::fmt;

use serde::Serialize;

// =============================================================================
// Medium
// =============================================================================

/// Traffic-source category assigned to a referer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    /// Referer not attributable to any known source
    Unknown,
    /// Referer host belongs to the site being analyzed
    Internal,
    /// Search engine
    Search,
    /// Social network
    Social,
    /// Webmail provider
    Email,
}

impl Medium {
    /// Parse a definition-document medium key. Keys are case-sensitive;
    /// unrecognized names return None.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "unknown" => Some(Self::Unknown),
            "internal" => Some(Self::Internal),
            "search" => Some(Self::Search),
            "social" => Some(Self::Social),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    /// Canonical lowercase name of the medium.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Internal => "internal",
            Self::Search => "search",
            Self::Social => "social",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Referer Record
// =============================================================================

/// Database entry describing one known traffic source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefererRecord {
    /// Medium this source belongs to
    pub medium: Medium,
    /// Display name of the source, e.g. "Google"
    pub source: String,
    /// Query parameter names that may carry the search term.
    /// Non-empty only when `medium` is [`Medium::Search`].
    pub parameters: Vec<String>,
}

// =============================================================================
// Classification Result
// =============================================================================

/// Result of classifying a single referer URL.
///
/// Internal and Unknown outcomes never carry a source or a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Referer {
    /// Medium the visit is attributed to
    pub medium: Medium,
    /// Name of the matched source, if any
    pub source: Option<String>,
    /// Search term, for search referers whose query carried one
    pub term: Option<String>,
}

impl Referer {
    /// Referer host belongs to the analyzed site itself.
    pub fn internal() -> Self {
        Self {
            medium: Medium::Internal,
            source: None,
            term: None,
        }
    }

    /// Referer is a well-formed URL but matches no known source.
    pub fn unknown() -> Self {
        Self {
            medium: Medium::Unknown,
            source: None,
            term: None,
        }
    }
}
