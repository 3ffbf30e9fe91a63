//! Tutorial content: tables of contents, chapters, tutorials, steps and assessments.

use crate::markup::{Markup, MediaReference};
use crate::reference::TopicReference;
use crate::types::SourceRange;

/// Introduction shown at the top of a tutorial page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intro {
    /// Introductory text.
    pub content: Markup,
    /// Background image.
    pub image: Option<MediaReference>,
    /// Title.
    pub title: String,
    /// Introductory video.
    pub video: Option<MediaReference>,
}

/// A block of content with optional media beside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentAndMedia {
    /// Text.
    pub content: Markup,
    /// Image or video beside the text.
    pub media: Option<MediaReference>,
}

/// A code listing attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeReference {
    /// The code file.
    pub file: MediaReference,
    /// Screenshot of the code's result.
    pub preview: Option<MediaReference>,
}

/// One instruction in a tutorial section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    /// Text under the step's media.
    pub caption: Markup,
    /// Code listing.
    pub code: Option<CodeReference>,
    /// Instruction text.
    pub content: Markup,
    /// Image or video.
    pub media: Option<MediaReference>,
}

/// A titled group of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorialSection {
    /// Content shown before the steps.
    pub introduction: Vec<ContentAndMedia>,
    /// Steps in order.
    pub steps: Vec<Step>,
    /// Section title.
    pub title: String,
}

/// Explanation of why a choice is right or wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Justification {
    /// Explanation text.
    pub content: Markup,
}

/// One answer of a multiple-choice question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choice {
    /// Answer text.
    pub content: Markup,
    /// Answer image.
    pub image: Option<MediaReference>,
    /// Whether this is the right answer.
    pub is_correct: bool,
    /// Why.
    pub justification: Justification,
}

/// A multiple-choice question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipleChoice {
    /// Answers.
    pub choices: Vec<Choice>,
    /// Extra content under the question.
    pub content: Markup,
    /// Question image.
    pub image: Option<MediaReference>,
    /// The question.
    pub question: Markup,
}

/// Questions at the end of a tutorial or tutorial article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assessments {
    /// Questions in order.
    pub questions: Vec<MultipleChoice>,
}

/// A step-by-step tutorial page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tutorial {
    /// End-of-tutorial questions.
    pub assessments: Option<Assessments>,
    /// Page introduction.
    pub intro: Intro,
    /// Downloadable project archive.
    pub project_files: Option<MediaReference>,
    /// Sections in order.
    pub sections: Vec<TutorialSection>,
}

/// A long-form tutorial page without steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorialArticle {
    /// End-of-article questions.
    pub assessments: Option<Assessments>,
    /// Body content in order.
    pub content: Vec<ContentAndMedia>,
    /// Page introduction.
    pub intro: Option<Intro>,
}

/// `@TutorialReference` in a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialReference {
    /// Range of the directive.
    pub range: Option<SourceRange>,
    /// Curated tutorial; rewritten to `Resolved` on success.
    pub topic: TopicReference,
}

impl TutorialReference {
    /// Reference to a tutorial as authored.
    pub fn new(destination: &str, range: Option<SourceRange>) -> Self {
        return Self {
            range,
            topic: TopicReference::parse(destination),
        };
    }
}

/// A chapter curating tutorials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter description.
    pub content: Markup,
    /// Chapter image.
    pub image: Option<MediaReference>,
    /// Chapter name.
    pub name: String,
    /// Curated tutorials in order.
    pub topic_references: Vec<TutorialReference>,
}

/// A group of chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Volume {
    /// Chapters in order.
    pub chapters: Vec<Chapter>,
    /// Volume description.
    pub content: Markup,
    /// Volume image.
    pub image: Option<MediaReference>,
    /// Volume name.
    pub name: String,
}

/// The table of contents for a technology's tutorials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorialTableOfContents {
    /// Page introduction.
    pub intro: Intro,
    /// Volumes in order.
    pub volumes: Vec<Volume>,
}
