use crate::ConfigError;
use regex::Regex;
use std::fmt;

/// A regex that only ever matches an entire input
///
/// The source pattern is wrapped as `^(?:pattern)$` at construction, so
/// `https://a\.com/.*` matches every page under that host but `a\.com` alone
/// matches nothing. There is no way to build one from an unanchored `Regex`.
#[derive(Debug, Clone)]
pub struct FullMatchPattern {
    source: String,
    regex: Regex,
}

impl FullMatchPattern {
    /// Compiles `pattern` for full matching
    ///
    /// # Returns
    ///
    /// * `Ok(FullMatchPattern)` - Compiled, anchored pattern
    /// * `Err(ConfigError::InvalidPattern)` - The pattern failed to compile
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// True only when the pattern matches all of `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as written in the configuration
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for FullMatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compiles every pattern for full matching, in input order
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<FullMatchPattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| FullMatchPattern::new(pattern))
        .collect()
}
