//! Glob-style file name matching.
//!
//! Supports `*` (any run of characters, including none) and `?` (exactly one
//! character). Every other character is literal. Matching is case-sensitive
//! and anchored at both ends, so `*.zip` never matches `pack.zip.bak`.

use regex::Regex;
use tracing::warn;

/// A compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    pattern: String,
    regex: Option<Regex>,
}

impl WildcardMatcher {
    /// Compile a wildcard pattern.
    ///
    /// Any string is a valid pattern. If the translated expression exceeds the
    /// regex engine's size limits the matcher degrades to exact comparison.
    ///
    /// # Example
    /// ```
    /// use pack_fs::WildcardMatcher;
    ///
    /// let matcher = WildcardMatcher::compile("sodium-*.jar");
    /// assert!(matcher.matches("sodium-0.6.0.jar"));
    /// assert!(!matcher.matches("sodium-0.6.0.jar.disabled"));
    /// ```
    pub fn compile(pattern: &str) -> Self {
        let source = translate(pattern);
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(pattern, error = %e, "wildcard too large, falling back to literal match");
                None
            }
        };

        Self {
            pattern: pattern.to_string(),
            regex,
        }
    }

    /// The pattern this matcher was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether the whole of `name` matches the pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(name),
            None => self.pattern == name,
        }
    }
}

/// Translate a wildcard pattern into an anchored regular expression.
fn translate(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() * 2 + 8);
    source.push_str("^(?s:");
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    source.push_str(")$");
    source
}
