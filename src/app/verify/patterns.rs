//! Patterns for output files whose names change from run to run
//!
//! Such files cannot be listed in a manifest. Each pattern states how many
//! matches a correct run produces; matches are removed before comparison.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::verify::{LOG_FILE_PATTERN, LOG_FILE_PATTERN_NAME};
use crate::errors::{ValidationError, ValidationResult};

/// How many files a dynamic-name pattern must match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    /// Exactly one match, e.g. the timestamped run log
    #[default]
    ExactlyOne,
    /// Any number of matches, including none
    Any,
}

/// Configuration form of a dynamic-name pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicNameSpec {
    pub name: String,
    pub regex: String,
    #[serde(default)]
    pub expected: Occurrence,
}

impl DynamicNameSpec {
    /// The tedana run log
    pub fn tedana_log() -> Self {
        Self {
            name: LOG_FILE_PATTERN_NAME.to_string(),
            regex: LOG_FILE_PATTERN.to_string(),
            expected: Occurrence::ExactlyOne,
        }
    }

    /// Compile into a usable pattern
    pub fn compile(&self) -> ValidationResult<DynamicNamePattern> {
        DynamicNamePattern::new(&self.name, &self.regex, self.expected)
    }
}

/// Compiled dynamic-name pattern
#[derive(Debug, Clone)]
pub struct DynamicNamePattern {
    name: String,
    regex: Regex,
    expected: Occurrence,
}

impl DynamicNamePattern {
    /// Compile `pattern`, matched against manifest-style relative paths
    pub fn new(name: &str, pattern: &str, expected: Occurrence) -> ValidationResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
            pattern: pattern.to_string(),
            error: e.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            regex,
            expected,
        })
    }

    /// The tedana run log: `tedana_YYYY-MM-DDThh:mm:ss.tsv` at the output root
    pub fn tedana_log() -> Self {
        Self {
            name: LOG_FILE_PATTERN_NAME.to_string(),
            regex: Regex::new(LOG_FILE_PATTERN).expect("log file pattern should be valid"),
            expected: Occurrence::ExactlyOne,
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source text of the regex
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn expected(&self) -> Occurrence {
        self.expected
    }
}
