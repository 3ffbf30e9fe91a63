//! Markup content: paragraphs, lists, inline links and directive-based layout.
//!
//! The parsing layer builds these with reference fields already typed; the
//! walker only rewrites them.

use crate::reference::{ResourceReference, TopicReference, UnresolvedReference};
use crate::types::SourceRange;

/// A block sequence, such as a discussion section or a step's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    /// Top-level blocks in declaration order.
    pub blocks: Vec<Block>,
}

impl Markup {
    /// Markup made of the given blocks.
    pub const fn new(blocks: Vec<Block>) -> Self {
        return Self { blocks };
    }

    /// A single paragraph.
    pub fn paragraph(inlines: Vec<Inline>) -> Self {
        return Self {
            blocks: vec![Block::Paragraph(inlines)],
        };
    }
}

/// Block-level markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Block quote or aside.
    BlockQuote(Vec<Block>),
    /// Fenced code; never contains links.
    CodeBlock {
        /// Code text.
        code: String,
        /// Info-string language.
        language: Option<String>,
    },
    /// Layout directive holding further blocks.
    Container(Container),
    /// Section heading.
    Heading {
        /// Heading text.
        content: Vec<Inline>,
        /// 1 through 6.
        level: u8,
    },
    /// `@Links` directive listing topics.
    Links(LinksDirective),
    /// Ordered or unordered list; each item is a block sequence.
    List(Vec<Vec<Block>>),
    /// `@Image` or `@Video` directive.
    Media(MediaDirective),
    /// Paragraph of inline content.
    Paragraph(Vec<Inline>),
}

/// Kinds of layout container directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerKind {
    /// `@Column`, with an optional relative size.
    Column {
        /// Relative width.
        size: Option<u32>,
    },
    /// `@Row`.
    Row,
    /// `@Small`.
    Small,
    /// `@Tab` inside a tab navigator.
    Tab {
        /// Tab title.
        title: String,
    },
    /// `@TabNavigator`.
    TabNavigator,
}

/// A layout directive and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Child blocks in declaration order.
    pub children: Vec<Block>,
    /// Which directive this is.
    pub kind: ContainerKind,
}

/// Inline-level markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Emphasized span.
    Emphasis(Vec<Inline>),
    /// Inline image.
    Image(Image),
    /// Inline code span; never resolved.
    InlineCode(String),
    /// Regular link; only `doc:` destinations are topic references.
    Link(Link),
    /// Strong span.
    Strong(Vec<Inline>),
    /// Double-backtick symbol link.
    SymbolLink(SymbolLink),
    /// Plain text.
    Text(String),
}

/// Regular markdown link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Link text.
    pub children: Vec<Inline>,
    /// Destination; rewritten to `Resolved` on success.
    pub destination: TopicReference,
    /// Range of the link in its document.
    pub range: Option<SourceRange>,
}

impl Link {
    /// Link to `destination` as authored, with plain-text title.
    pub fn new(destination: &str, text: &str, range: Option<SourceRange>) -> Self {
        return Self {
            children: vec![Inline::Text(text.to_string())],
            destination: TopicReference::parse(destination),
            range,
        };
    }
}

/// Symbol link written between double backticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolLink {
    /// Symbol path; rewritten to `Resolved` on success.
    pub destination: TopicReference,
    /// Range of the link in its document.
    pub range: Option<SourceRange>,
}

impl SymbolLink {
    /// Symbol link to a symbol path as authored.
    pub fn new(symbol_path: &str, range: Option<SourceRange>) -> Self {
        return Self {
            destination: TopicReference::Unresolved(UnresolvedReference::symbol_path(symbol_path)),
            range,
        };
    }
}

/// Inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Alternate text.
    pub alt: String,
    /// Image source.
    pub media: MediaReference,
}

/// A resource reference at a place in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    /// Range of the reference in its document.
    pub range: Option<SourceRange>,
    /// The referenced resource.
    pub resource: ResourceReference,
}

impl MediaReference {
    /// Reference to `path` in `bundle_id`.
    pub fn new(bundle_id: &str, path: &str, range: Option<SourceRange>) -> Self {
        return Self {
            range,
            resource: ResourceReference::new(bundle_id, path),
        };
    }
}

/// Which media directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// `@Image`.
    Image,
    /// `@Video`.
    Video,
}

/// `@Image(source:)` or `@Video(source:poster:)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDirective {
    /// Image or video.
    pub kind: MediaKind,
    /// Video poster frame.
    pub poster: Option<MediaReference>,
    /// Media source.
    pub source: MediaReference,
}

/// One entry of a links directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedTopic {
    /// Range of the entry.
    pub range: Option<SourceRange>,
    /// Linked topic; rewritten to `Resolved` on success.
    pub topic: TopicReference,
}

/// `@Links(visualStyle:)` listing topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinksDirective {
    /// Topics in declaration order.
    pub topics: Vec<LinkedTopic>,
    /// Visual style name.
    pub visual_style: String,
}
