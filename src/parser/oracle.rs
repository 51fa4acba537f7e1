//! The parser seen from the manipulation layer.
//!
//! Reconciliation never looks inside the parser: it hands over a full text
//! and gets back a complete, immutable tree plus the syntax errors found
//! while building it.

use std::path::Path;

use thiserror::Error;

use super::{Parse, SyntaxError};

/// How a file's text should be parsed, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScriptKind {
    #[default]
    Ts,
    Tsx,
    Js,
    Jsx,
    Json,
    Unknown,
}

impl ScriptKind {
    /// Pick the script kind for a path; files without a known extension are
    /// `Unknown`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ts" | "mts" | "cts") => Self::Ts,
            Some("tsx") => Self::Tsx,
            Some("js" | "mjs" | "cjs") => Self::Js,
            Some("jsx") => Self::Jsx,
            Some("json") => Self::Json,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ts => "ts",
            Self::Tsx => "tsx",
            Self::Js => "js",
            Self::Jsx => "jsx",
            Self::Json => "json",
            Self::Unknown => "unknown",
        }
    }
}

/// Failures of the oracle itself (as opposed to syntax errors in the text)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("Cannot parse {path} as script kind '{}'", .kind.as_str())]
    UnsupportedScriptKind { path: String, kind: ScriptKind },
}

/// Text in, tree and diagnostics out
pub trait ParserOracle {
    /// Parse one complete text into a fresh tree snapshot
    fn parse(&self, text: &str, path: &Path, kind: ScriptKind) -> Result<Parse, OracleError>;

    /// Syntax errors reported for a tree produced by [`ParserOracle::parse`]
    fn syntactic_diagnostics(&self, tree: &Parse) -> Vec<SyntaxError> {
        tree.errors.clone()
    }
}

/// The built-in oracle backed by [`super::parse`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptParser;

impl ParserOracle for ScriptParser {
    fn parse(&self, text: &str, path: &Path, kind: ScriptKind) -> Result<Parse, OracleError> {
        match kind {
            ScriptKind::Ts | ScriptKind::Tsx | ScriptKind::Js | ScriptKind::Jsx => {
                Ok(super::parse(text))
            }
            ScriptKind::Json | ScriptKind::Unknown => Err(OracleError::UnsupportedScriptKind {
                path: path.display().to_string(),
                kind,
            }),
        }
    }
}
