//! Manipulation settings

/// How edits lay out the text they synthesize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManipulationSettings {
    /// Number of columns per indentation level (also the tab width)
    pub indent_size: usize,
    /// Indent with tabs instead of spaces
    pub use_tabs: bool,
    /// Line terminator for inserted lines
    pub newline: String,
}

impl Default for ManipulationSettings {
    fn default() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
            newline: "\n".to_string(),
        }
    }
}

impl ManipulationSettings {
    /// Indentation text for the given level
    pub fn indent(&self, level: usize) -> String {
        if self.use_tabs {
            "\t".repeat(level)
        } else {
            " ".repeat(self.indent_size * level)
        }
    }

    /// Width in columns of a run of leading whitespace
    pub fn indent_width(&self, whitespace: &str) -> usize {
        whitespace
            .chars()
            .map(|c| if c == '\t' { self.indent_size } else { 1 })
            .sum()
    }
}
