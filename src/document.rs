//! Top-level documentation pages handed to the walker.

use std::path::PathBuf;

use crate::identity::ReferenceIdentity;
use crate::markup::Markup;
use crate::symbol::{SymbolDocumentation, TaskGroup};
use crate::tutorial::{Tutorial, TutorialArticle, TutorialTableOfContents};

/// A free-form documentation article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    /// One-sentence summary.
    pub abstract_section: Option<Markup>,
    /// Body.
    pub discussion: Option<Markup>,
    /// See-also groups.
    pub see_also: Vec<TaskGroup>,
    /// Title.
    pub title: String,
    /// Topic groups curating children.
    pub topics: Vec<TaskGroup>,
}

/// Every kind of page the walker knows how to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    /// Documentation article.
    Article(Article),
    /// Symbol reference page.
    Symbol(SymbolDocumentation),
    /// Tutorials table of contents.
    TableOfContents(TutorialTableOfContents),
    /// Step-by-step tutorial.
    Tutorial(Tutorial),
    /// Long-form tutorial article.
    TutorialArticle(TutorialArticle),
}

/// One page and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Page content.
    pub content: DocumentContent,
    /// The page's own identity; relative links resolve from here.
    pub reference: ReferenceIdentity,
    /// File the page was parsed from.
    pub source: Option<PathBuf>,
}

impl Document {
    /// Page at `reference` with no known source file.
    pub const fn new(reference: ReferenceIdentity, content: DocumentContent) -> Self {
        return Self {
            content,
            reference,
            source: None,
        };
    }

    /// Record the file the page was parsed from.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        return self;
    }
}
