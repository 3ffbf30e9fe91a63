//! Source locations and language tags shared by references and diagnostics.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A programming language a documentation page is available in.
/// Compared by identifier only; the display name is presentation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLanguage {
    /// Stable identifier such as `swift` or `occ`.
    pub id: String,
}

impl SourceLanguage {
    /// Build a language tag from its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        return Self { id: id.into() };
    }
}

impl fmt::Display for SourceLanguage {
    /// Write the identifier.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.id);
    }
}

/// One-based line and column inside a markup document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// One-based column.
    pub column: u32,
    /// One-based line.
    pub line: u32,
}

impl SourcePosition {
    /// Position at `line`:`column`.
    pub const fn new(line: u32, column: u32) -> Self {
        return Self { column, line };
    }
}

/// Half-open range between two positions in the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// First position past the range.
    pub end: SourcePosition,
    /// First position inside the range.
    pub start: SourcePosition,
}

impl SourceRange {
    /// Range from `start` up to `end`.
    pub const fn new(start: SourcePosition, end: SourcePosition) -> Self {
        return Self { end, start };
    }

    /// Shift the range so that it is expressed relative to a doc comment that
    /// begins at `origin` (zero-based line and character) in its source file.
    pub const fn offset_by(self, origin: DocCommentOrigin) -> Self {
        return Self {
            end: SourcePosition {
                column: self.end.column.saturating_add(origin.character),
                line: self.end.line.saturating_add(origin.line),
            },
            start: SourcePosition {
                column: self.start.column.saturating_add(origin.character),
                line: self.start.line.saturating_add(origin.line),
            },
        };
    }
}

/// Zero-based start of a doc comment inside the file that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocCommentOrigin {
    /// Zero-based character offset of the comment's first line.
    pub character: u32,
    /// Zero-based line of the comment's first line.
    pub line: u32,
}

/// A file and optional range, used to point diagnostics at a known document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File the location refers to.
    pub file: PathBuf,
    /// Range inside the file, when known.
    pub range: Option<SourceRange>,
}
