//! Case-insensitive channel name patterns
//!
//! Patterns use Perl/ECMAScript-style syntax including look-around, e.g.
//! `(?<!team_)pmanifold|anathrott|rpm`, and match when they occur anywhere in
//! a channel name (unanchored search). Matching ignores case, so lower-case
//! patterns select mixed-case names such as `L001_Pmanifold`.

use fancy_regex::Regex;

/// Errors from compiling or evaluating a channel pattern
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// The pattern is not valid regular expression syntax
    #[error("invalid pattern '{pattern}': {source}")]
    Invalid {
        /// Pattern as supplied by the caller
        pattern: String,
        /// Compiler error
        #[source]
        source: Box<fancy_regex::Error>,
    },

    /// Evaluation aborted, e.g. by the backtracking limit
    #[error("pattern '{pattern}' failed on '{name}': {source}")]
    Evaluation {
        /// Pattern as supplied by the caller
        pattern: String,
        /// Channel name being tested
        name: String,
        /// Matcher error
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

/// A compiled, case-insensitive channel name pattern
#[derive(Debug, Clone)]
pub struct ChannelPattern {
    source: String,
    regex: Regex,
}

impl ChannelPattern {
    /// Compile a pattern
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("(?i){}", pattern)).map_err(|e| PatternError::Invalid {
            pattern: pattern.to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// True if the pattern matches anywhere in `name`
    pub fn is_match(&self, name: &str) -> Result<bool, PatternError> {
        self.regex
            .is_match(name)
            .map_err(|e| PatternError::Evaluation {
                pattern: self.source.clone(),
                name: name.to_string(),
                source: Box::new(e),
            })
    }

    /// The pattern as supplied, without the case-insensitivity flag
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for ChannelPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_substring_match() {
        let pattern = ChannelPattern::new("pmanif").unwrap();
        assert!(pattern.is_match("L001_Pmanifold").unwrap());
        assert!(pattern.is_match("PMANIFOLD").unwrap());
        assert!(!pattern.is_match("L001_RPM").unwrap());
    }

    #[test]
    fn test_negative_lookbehind() {
        let pattern = ChannelPattern::new("(?<!team_)pmanifold|anathrott|rpm").unwrap();
        assert!(pattern.is_match("L001_Pmanifold").unwrap());
        assert!(pattern.is_match("L001_Team_AnaThrott").unwrap());
        assert!(pattern.is_match("L001_Team_RPM").unwrap());
        assert!(!pattern.is_match("L001_Team_Pmanifold").unwrap());
        assert!(!pattern.is_match("L001_Lambda").unwrap());
    }

    #[test]
    fn test_negative_lookahead_with_anchor_group() {
        let pattern = ChannelPattern::new(r"(L\d+_|^)(?!Team_)Pmanifold|AnaThrott|AnaTPS|RPM")
            .unwrap();
        assert!(pattern.is_match("L001_Pmanifold").unwrap());
        assert!(pattern.is_match("pmanifold").unwrap());
        assert!(pattern.is_match("L002_AnaTPS").unwrap());
        assert!(!pattern.is_match("L001_Lambda").unwrap());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ChannelPattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, PatternError::Invalid { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_as_str_and_display() {
        let pattern = ChannelPattern::new("rpm$").unwrap();
        assert_eq!(pattern.as_str(), "rpm$");
        assert_eq!(pattern.to_string(), "rpm$");
    }
}
