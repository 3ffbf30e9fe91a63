//! Problems reported by resolution: what failed, where, and how to fix it.
//!
//! The walker only produces these values. Printing and escalation belong to
//! whatever layer consumes them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::SourceRange;

/// Identifier for a topic reference that didn't resolve.
pub const UNRESOLVED_TOPIC: &str = "doclink.UnresolvedTopicReference";

/// Identifier for a resource that doesn't exist in the bundle.
pub const UNRESOLVED_RESOURCE: &str = "doclink.UnresolvedResource";

/// Identifier for a tutorial curated twice in one chapter.
pub const DUPLICATE_TUTORIAL_REFERENCE: &str = "doclink.Chapter.DuplicateTutorialReference";

/// Identifier for a relative link that only resolves where the docs were inherited from.
pub const INHERITED_RELATIVE_LINK: &str = "doclink.InheritedRelativeLink";

/// How serious a problem is. Ordered by seriousness: `Hint` is the least
/// serious, `Error` the most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the build.
    Error,
    /// Suggestion with no impact on output.
    Hint,
    /// Informational.
    Information,
    /// Reported but not fatal.
    Warning,
}

impl Severity {
    /// Position on the seriousness scale, from 0 for `Hint` to 3 for `Error`.
    pub const fn rank(self) -> u8 {
        return match self {
            Self::Error => 3,
            Self::Hint => 0,
            Self::Information => 1,
            Self::Warning => 2,
        };
    }
}

impl Ord for Severity {
    /// Compare by rank.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        return self.rank().cmp(&other.rank());
    }
}

impl PartialOrd for Severity {
    /// Compare by rank.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        return Some(self.cmp(other));
    }
}

/// Extra context attached to a diagnostic, possibly pointing elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    /// What the note says.
    pub message: String,
    /// Range the note points at.
    pub range: Option<SourceRange>,
    /// File the note points at, when different from the diagnostic's.
    pub source: Option<PathBuf>,
}

/// One text edit proposed by a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    /// Range to replace.
    pub range: SourceRange,
    /// Text to put in its place.
    pub replacement: String,
}

/// A fix the author can apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// Edits, in order.
    pub replacements: Vec<Replacement>,
    /// One-line description.
    pub summary: String,
}

/// What went wrong and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Longer explanation, if the summary isn't enough.
    pub explanation: Option<String>,
    /// Stable, dotted identifier such as [`UNRESOLVED_TOPIC`].
    pub identifier: String,
    /// Related notes, in order.
    pub notes: Vec<Note>,
    /// Range in the source document.
    pub range: Option<SourceRange>,
    /// How serious the diagnostic is.
    pub severity: Severity,
    /// Source document.
    pub source: Option<PathBuf>,
    /// One-line description.
    pub summary: String,
}

impl Diagnostic {
    /// Diagnostic with no location, notes or explanation.
    pub fn new(severity: Severity, identifier: &str, summary: impl Into<String>) -> Self {
        return Self {
            explanation: None,
            identifier: identifier.to_string(),
            notes: Vec::new(),
            range: None,
            severity,
            source: None,
            summary: summary.into(),
        };
    }

    /// Set the longer explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        return self;
    }

    /// Add a note.
    #[must_use]
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        return self;
    }

    /// Set the range.
    #[must_use]
    pub const fn with_range(mut self, range: Option<SourceRange>) -> Self {
        self.range = range;
        return self;
    }

    /// Set the source document.
    #[must_use]
    pub fn with_source(mut self, source: Option<PathBuf>) -> Self {
        self.source = source;
        return self;
    }
}

/// A diagnostic and the solutions offered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    /// What went wrong.
    pub diagnostic: Diagnostic,
    /// Ways to fix it, in order of preference.
    pub possible_solutions: Vec<Solution>,
}

impl Problem {
    /// Problem with no solutions.
    pub const fn new(diagnostic: Diagnostic) -> Self {
        return Self {
            diagnostic,
            possible_solutions: Vec::new(),
        };
    }

    /// Add a solution.
    #[must_use]
    pub fn with_solution(mut self, solution: Solution) -> Self {
        self.possible_solutions.push(solution);
        return self;
    }
}
