//! Internal-domains allow-list
//!
//! The list arrives as plain UTF-8 text, one entry per line. Lines before
//! the `_partial_matches_` sentinel are wildcard patterns; lines after it
//! are exact host strings. `#` starts a comment, whole-line or trailing.
//!
//! The core never fetches this list itself - a collaborator (see the
//! rl-fetch crate) materializes it and passes it into classification.

use crate::wildcard::WildcardPattern;

/// Divider between the wildcard-pattern section and the exact-host
/// section of an allow-list file.
const SECTION_SENTINEL: &str = "_partial_matches_";

/// Parsed allow-list of hosts considered internal to the analyzed site.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    patterns: Vec<WildcardPattern>,
    exact: Vec<String>,
}

impl AllowList {
    /// Parse allow-list text into its wildcard and exact sections.
    pub fn parse(text: &str) -> Self {
        let mut patterns = Vec::new();
        let mut exact = Vec::new();
        let mut in_exact_section = false;

        for raw_line in text.lines() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line == SECTION_SENTINEL {
                in_exact_section = true;
                continue;
            }

            if in_exact_section {
                exact.push(line.to_ascii_lowercase());
            } else {
                patterns.push(WildcardPattern::compile(line));
            }
        }

        Self { patterns, exact }
    }

    /// Number of entries across both sections.
    pub fn len(&self) -> usize {
        self.patterns.len() + self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decide whether a host belongs to the analyzed site.
    ///
    /// Both sections are scanned in file order; the first hit wins.
    /// Allow-lists are small and fetched per invocation window, so a
    /// linear scan beats maintaining an index.
    pub fn is_internal(&self, host: &str) -> bool {
        for pattern in &self.patterns {
            if pattern.matches(host) {
                return true;
            }
        }

        let host = host.to_ascii_lowercase();
        self.exact.iter().any(|entry| *entry == host)
    }
}

/// Cut an inline `#` comment; a line starting with `#` is all comment.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}
