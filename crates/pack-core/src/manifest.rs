//! Line-oriented add/remove manifest.
//!
//! ```text
//! # comment
//! -mods/sodium-*.jar
//! +mods/sodium-fabric-0.6.13+mc1.21.6.jar
//! +config.zip
//! ```
//!
//! The first character of a line is the operator and the rest of the line,
//! verbatim, is the operand. Blank lines and `#` comments are ignored. Lines
//! that are too short or carry an unknown operator are skipped with a
//! warning; parsing never fails as a whole.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// One manifest line, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ManifestOperation {
    /// Fetch `relative_path` from the download base into the game directory.
    Add { relative_path: String },
    /// Delete files matching `pattern`, optionally under a subdirectory.
    Remove { pattern: String },
}

impl fmt::Display for ManifestOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { relative_path } => write!(f, "+{}", relative_path),
            Self::Remove { pattern } => write!(f, "-{}", pattern),
        }
    }
}

/// Why a line was not turned into an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingOperand,
    UnknownOperator(char),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOperand => write!(f, "operator without operand"),
            Self::UnknownOperator(op) => write!(f, "unknown operator '{}'", op),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

/// A parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub operations: Vec<ManifestOperation>,
    pub skipped: Vec<SkippedLine>,
}

impl Manifest {
    /// Parse manifest text. Accepts LF and CRLF line endings.
    ///
    /// # Example
    ///
    /// ```
    /// use pack_core::manifest::{Manifest, ManifestOperation};
    ///
    /// let manifest = Manifest::parse("# mods\n+mods/a.jar\n-mods/*.old\n");
    /// assert_eq!(
    ///     manifest.operations,
    ///     vec![
    ///         ManifestOperation::Add { relative_path: "mods/a.jar".into() },
    ///         ManifestOperation::Remove { pattern: "mods/*.old".into() },
    ///     ]
    /// );
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut manifest = Self::default();

        for (index, line) in text.lines().enumerate() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut chars = line.chars();
            let Some(operator) = chars.next() else {
                continue;
            };
            let operand = chars.as_str();

            let operation = if operand.is_empty() {
                Err(SkipReason::MissingOperand)
            } else {
                match operator {
                    '+' => Ok(ManifestOperation::Add {
                        relative_path: operand.to_string(),
                    }),
                    '-' => Ok(ManifestOperation::Remove {
                        pattern: operand.to_string(),
                    }),
                    other => Err(SkipReason::UnknownOperator(other)),
                }
            };

            match operation {
                Ok(op) => manifest.operations.push(op),
                Err(reason) => {
                    warn!(line = index + 1, text = line, %reason, "skipping manifest line");
                    manifest.skipped.push(SkippedLine {
                        line: index + 1,
                        text: line.to_string(),
                        reason,
                    });
                }
            }
        }

        manifest
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_lines() {
        let manifest = Manifest::parse("+a.jar\r\n-b*.jar\r\n");
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.operations[0].to_string(), "+a.jar");
        assert_eq!(manifest.operations[1].to_string(), "-b*.jar");
    }

    #[test]
    fn test_operand_kept_verbatim() {
        let manifest = Manifest::parse("+resourcepacks/Faithful 64x.zip ");
        assert_eq!(
            manifest.operations,
            vec![ManifestOperation::Add {
                relative_path: "resourcepacks/Faithful 64x.zip ".into()
            }]
        );
    }

    #[test]
    fn test_short_and_unknown_lines_skipped() {
        let manifest = Manifest::parse("+\n*mods/a.jar\n-\n+ok.jar");
        assert_eq!(manifest.len(), 1);
        assert_eq!(
            manifest
                .skipped
                .iter()
                .map(|s| (s.line, s.reason.clone()))
                .collect::<Vec<_>>(),
            vec![
                (1, SkipReason::MissingOperand),
                (2, SkipReason::UnknownOperator('*')),
                (3, SkipReason::MissingOperand),
            ]
        );
    }

    #[test]
    fn test_serializes_with_op_tag() {
        let op = ManifestOperation::Remove {
            pattern: "mods/*.jar".into(),
        };
        assert_eq!(
            serde_json::to_string(&op).unwrap(),
            r#"{"op":"remove","pattern":"mods/*.jar"}"#
        );
    }
}
