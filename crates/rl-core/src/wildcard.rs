//! Wildcard pattern compiler and matcher
//!
//! Allow-list entries may use two wildcards: `*` matches any run of
//! characters (including none) and `_` matches at most one non-whitespace
//! character. Every other character matches itself. A compiled pattern
//! always covers the full candidate string, never a substring.

// =============================================================================
// Pattern Fragments
// =============================================================================

/// One compiled pattern fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment {
    /// Literal character, stored lowercased
    Literal(char),
    /// `*` - zero or more of any character
    AnyRun,
    /// `_` - zero or one non-whitespace character
    OptionalChar,
}

/// A compiled wildcard pattern, anchored at both ends.
///
/// Matching is ASCII case-insensitive: patterns describe DNS hostnames,
/// which compare without case.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    fragments: Vec<Fragment>,
}

impl WildcardPattern {
    /// Compile a pattern. Every character translates to exactly one
    /// fragment, so compilation cannot fail.
    pub fn compile(pattern: &str) -> Self {
        let fragments = pattern
            .chars()
            .map(|ch| match ch {
                '*' => Fragment::AnyRun,
                '_' => Fragment::OptionalChar,
                ch => Fragment::Literal(ch.to_ascii_lowercase()),
            })
            .collect();

        Self { fragments }
    }

    /// Match a candidate against the full pattern.
    pub fn matches(&self, candidate: &str) -> bool {
        let chars: Vec<char> = candidate.chars().map(|ch| ch.to_ascii_lowercase()).collect();
        match_fragments(&self.fragments, &chars)
    }
}

/// Recursive matcher. Depth is bounded by the fragment count; the run
/// consumed by `AnyRun` is explored iteratively at each level.
fn match_fragments(fragments: &[Fragment], input: &[char]) -> bool {
    let (first, rest) = match fragments.split_first() {
        Some(split) => split,
        None => return input.is_empty(),
    };

    match first {
        Fragment::Literal(ch) => input.first() == Some(ch) && match_fragments(rest, &input[1..]),
        Fragment::AnyRun => (0..=input.len()).any(|skip| match_fragments(rest, &input[skip..])),
        Fragment::OptionalChar => {
            if match_fragments(rest, input) {
                return true;
            }
            match input.first() {
                Some(ch) if !ch.is_whitespace() => match_fragments(rest, &input[1..]),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_matches_only_itself() {
        let pattern = WildcardPattern::compile("example.com");
        assert!(pattern.matches("example.com"));
        assert!(!pattern.matches("example.org"));
        assert!(!pattern.matches("example.comx"));
        assert!(!pattern.matches("xexample.com"));
    }

    #[test]
    fn test_full_string_match_not_substring() {
        let pattern = WildcardPattern::compile("example");
        assert!(!pattern.matches("example.com"));
        assert!(!pattern.matches("my-example"));
    }

    #[test]
    fn test_star_matches_any_run() {
        let pattern = WildcardPattern::compile("*.vodafone.nl");
        assert!(pattern.matches("mail.vodafone.nl"));
        assert!(pattern.matches("a.b.vodafone.nl"));
        assert!(!pattern.matches("vodafone.nl.evil.com"));

        // Zero-length run
        let pattern = WildcardPattern::compile("*vodafone.nl");
        assert!(pattern.matches("vodafone.nl"));
    }

    #[test]
    fn test_underscore_matches_at_most_one_char() {
        let pattern = WildcardPattern::compile("ma_l.example.com");
        assert!(pattern.matches("mail.example.com"));
        assert!(pattern.matches("mal.example.com"));
        assert!(!pattern.matches("maXYl.example.com"));
        // Whitespace is not a word character
        assert!(!pattern.matches("ma l.example.com"));
    }

    #[test]
    fn test_punctuation_is_literal() {
        let pattern = WildcardPattern::compile("a.b");
        assert!(pattern.matches("a.b"));
        assert!(!pattern.matches("aXb"));
    }

    #[test]
    fn test_case_insensitive_hostname_match() {
        let pattern = WildcardPattern::compile("*.Example.COM");
        assert!(pattern.matches("mail.example.com"));
        assert!(pattern.matches("MAIL.EXAMPLE.COM"));
    }

    #[test]
    fn test_empty_pattern() {
        let pattern = WildcardPattern::compile("");
        assert!(pattern.matches(""));
        assert!(!pattern.matches("a"));
    }
}
