use serde::{Deserialize, Serialize};

/// 1-based position in a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// Extent of an element, from its start tag to the end of its end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    /// Line reported in error messages.
    pub fn line(&self) -> usize {
        self.start.line
    }
}
