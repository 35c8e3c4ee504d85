use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_INDENT_SIZE: usize = 16;

/// Top-level settings file.
///
/// ```toml
/// [tree]
/// indent_size = 2
/// start_lineno = 10
///
/// [builder]
/// include_comments = false
///
/// [resolver]
/// cache_capacity = 32
/// ```
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.tree.indent_size == 0 || self.tree.indent_size > MAX_INDENT_SIZE {
            issues.push(ValidationIssue::OutOfRange {
                field: "tree.indent_size",
                message: format!(
                    "must be between 1 and {MAX_INDENT_SIZE}, got {}",
                    self.tree.indent_size
                ),
            });
        }
        if self.tree.start_lineno == Some(0) {
            issues.push(ValidationIssue::OutOfRange {
                field: "tree.start_lineno",
                message: "line numbers are 1-based".to_string(),
            });
        }
        if self.resolver.cache_capacity == 0 {
            issues.push(ValidationIssue::OutOfRange {
                field: "resolver.cache_capacity",
                message: "must hold at least one tree".to_string(),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

/// Formatting settings carried by every tree.
///
/// Only the renderer and the pretty JSON writer read `indent_size`.
/// `start_lineno` is the file line of the first line of the parsed text,
/// for snippets cut out of a larger file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub indent_size: usize,
    pub start_lineno: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            start_lineno: None,
        }
    }
}

impl TreeConfig {
    /// Amount to add to a 1-based line of the parsed text to get the file line.
    pub fn line_offset(&self) -> usize {
        self.start_lineno.map_or(0, |line| line.saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Keep `comment` nodes in built trees.
    pub include_comments: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            include_comments: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Number of source trees kept before the cache is cleared.
    pub cache_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { cache_capacity: 64 }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    OutOfRange {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::OutOfRange { field, message } => {
                write!(f, "setting '{field}' is out of range: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tree.indent_size, 4);
        assert!(settings.builder.include_comments);
        assert_eq!(settings.resolver.cache_capacity, 64);
    }

    #[test]
    fn collects_every_issue() {
        let mut settings = Settings::default();
        settings.tree.indent_size = 0;
        settings.tree.start_lineno = Some(0);
        settings.resolver.cache_capacity = 0;
        let err = settings.validate().unwrap_err();
        assert_eq!(err.issues.len(), 3);
        assert!(err.to_string().contains("tree.indent_size"));
    }

    #[test]
    fn line_offset_from_start_lineno() {
        let mut config = TreeConfig::default();
        assert_eq!(config.line_offset(), 0);
        config.start_lineno = Some(10);
        assert_eq!(config.line_offset(), 9);
    }
}
