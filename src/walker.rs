//! The resolution pass over one document.
//!
//! A walker visits every reference- and resource-bearing node depth-first in
//! declaration order, asks the context to resolve each one, rewrites resolved
//! references in place and records one problem per failure. It never stops
//! early: a failed link only produces a diagnostic.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

use crate::config::ResolutionConfig;
use crate::context::{AssetContext, ResolutionContext, ResolutionFailure};
use crate::diagnostics::{
    DUPLICATE_TUTORIAL_REFERENCE, Diagnostic, INHERITED_RELATIVE_LINK, Note, Problem, Replacement,
    Solution, UNRESOLVED_RESOURCE, UNRESOLVED_TOPIC,
};
use crate::document::{Article, Document, DocumentContent};
use crate::identity::ReferenceIdentity;
use crate::markup::{Block, Inline, Markup, MediaReference};
use crate::pool::IdentityPool;
use crate::reference::{TopicReference, UnresolvedReference};
use crate::symbol::{SymbolDocumentation, TaskGroup, VariantTrait, Variants, language_for_variant};
use crate::tutorial::{
    Assessments, Chapter, ContentAndMedia, Intro, Step, Tutorial, TutorialArticle, TutorialSection,
    TutorialTableOfContents,
};
use crate::types::{DocCommentOrigin, SourceLanguage, SourceRange};

/// Original declaration of inherited documentation, used as a second
/// resolution context for relative links.
#[derive(Clone)]
struct InheritanceScope {
    /// Start of the original doc comment, for mapping ranges.
    origin: Option<DocCommentOrigin>,
    /// Symbol the documentation was inherited from.
    parent: ReferenceIdentity,
    /// File declaring the original doc comment.
    source: Option<PathBuf>,
}

/// Resolves the references of one document at a time.
pub struct ResolutionWalker<'a> {
    /// Severity policy.
    config: &'a ResolutionConfig,
    /// Knowledge base answering resolution queries.
    context: &'a dyn ResolutionContext,
    /// Set while visiting a symbol whose docs were inherited.
    inheritance: Option<InheritanceScope>,
    /// Pool for per-variant parent identities.
    pool: &'a IdentityPool,
    /// Problems in traversal order.
    problems: Vec<Problem>,
    /// Identity relative links resolve from.
    root: ReferenceIdentity,
    /// File of the document being walked.
    source: Option<PathBuf>,
}

impl<'a> ResolutionWalker<'a> {
    /// Problem for a relative link that only resolved from the declaration the
    /// docs were inherited from. The range is moved onto the original doc comment.
    fn inherited_link_problem(
        &self,
        unresolved: &UnresolvedReference,
        resolved: &ReferenceIdentity,
        range: Option<SourceRange>,
        scope: &InheritanceScope,
    ) -> Problem {
        let mapped = range.map(|range| return scope.origin.map_or(range, |origin| return range.offset_by(origin)));
        let source = scope.source.clone().or_else(|| return self.source.clone());

        let mut absolute_path = resolved.path().to_string();
        if let Some(fragment) = resolved.fragment() {
            absolute_path.push('#');
            absolute_path.push_str(fragment);
        }
        let replacement = format!("<doc:{absolute_path}>");

        let diagnostic = Diagnostic::new(
            self.config.inherited_relative_link,
            INHERITED_RELATIVE_LINK,
            format!(
                "'{}' only resolves relative to the symbol this documentation was inherited from",
                unresolved.raw()
            ),
        )
        .with_explanation(format!(
            "The documentation was inherited from '{}'. Relative links are resolved from the symbol that shows the \
             documentation first, so this link only works by falling back to the original declaration.",
            scope.parent
        ))
        .with_source(source.clone())
        .with_range(mapped)
        .with_note(Note {
            message: format!("Use {replacement} so the link resolves wherever this documentation appears"),
            range: mapped,
            source,
        });

        let mut problem = Problem::new(diagnostic);
        if let Some(range) = mapped {
            problem = problem.with_solution(Solution {
                replacements: vec![Replacement { range, replacement: replacement.clone() }],
                summary: format!("Replace with {replacement}"),
            });
        }
        return problem;
    }

    /// Problems recorded so far, consuming the walker.
    pub fn into_problems(self) -> Vec<Problem> {
        return self.problems;
    }

    /// Mark a tutorial's project archive as a download rather than a display asset.
    fn mark_project_files_downloadable(&self, name: &str) {
        let root = self.context.root_reference();
        let Some(mut asset) = self.context.resolve_asset(name, &root) else {
            return;
        };
        asset.context = AssetContext::Download;
        self.context.update_asset(name, asset, &root);
    }

    /// Walker starting at the context's documentation root.
    pub fn new(context: &'a dyn ResolutionContext, pool: &'a IdentityPool, config: &'a ResolutionConfig) -> Self {
        return Self {
            config,
            context,
            inheritance: None,
            pool,
            problems: Vec::new(),
            root: context.documentation_root_reference(),
            source: None,
        };
    }

    /// Problems recorded so far.
    pub fn problems(&self) -> &[Problem] {
        return &self.problems;
    }

    /// Record a diagnostic for a tutorial curated twice in one chapter.
    fn report_duplicate(&mut self, chapter: &str, target: &ReferenceIdentity, range: Option<SourceRange>) {
        let diagnostic = Diagnostic::new(
            self.config.duplicate_reference,
            DUPLICATE_TUTORIAL_REFERENCE,
            format!("Duplicate tutorial reference to '{target}' in chapter '{chapter}'"),
        )
        .with_source(self.source.clone())
        .with_range(range);

        let replacements = range
            .map(|range| return vec![Replacement { range, replacement: String::new() }])
            .unwrap_or_default();
        let solution = Solution {
            replacements,
            summary: "Remove the duplicate tutorial reference".to_string(),
        };

        self.problems.push(Problem::new(diagnostic).with_solution(solution));
    }

    /// Record a diagnostic for a topic reference that didn't resolve.
    fn report_unresolved(&mut self, failure: &ResolutionFailure, range: Option<SourceRange>) {
        tracing::debug!(reference = %failure.reference, message = %failure.message, "unresolved topic reference");

        let mut summary = format!("Topic reference '{}' couldn't be resolved.", failure.reference);
        if !failure.message.is_empty() {
            summary.push(' ');
            summary.push_str(&failure.message);
        }

        let mut diagnostic = Diagnostic::new(self.config.unresolved_topic, UNRESOLVED_TOPIC, summary)
            .with_source(self.source.clone())
            .with_range(range);
        if let Some(location) = self.context.uncurated_article_match(failure.reference.path()) {
            diagnostic = diagnostic.with_note(Note {
                message: format!(
                    "An article matching '{}' exists but isn't curated; curate it to make it linkable",
                    failure.reference.path()
                ),
                range: location.range,
                source: Some(location.file),
            });
        }

        self.problems.push(Problem::new(diagnostic));
    }

    /// Retry a failed relative link from the declaration the docs were inherited from.
    fn resolve_from_inherited_declaration(
        &mut self,
        reference: &TopicReference,
        unresolved: &UnresolvedReference,
        range: Option<SourceRange>,
        from_symbol_link: bool,
    ) -> Option<ReferenceIdentity> {
        if !self.config.inherited_link_fallback || !unresolved.is_relative() {
            return None;
        }
        let scope = self.inheritance.clone()?;
        let resolved = self.context.resolve(reference, &scope.parent, from_symbol_link).ok()?;

        let problem = self.inherited_link_problem(unresolved, &resolved, range, &scope);
        self.problems.push(problem);
        return Some(resolved);
    }

    /// Existence check for a bundle resource. Web URLs are skipped.
    fn resolve_media(&mut self, media: &MediaReference) {
        if media.resource.is_web_url() || self.context.resource_exists(&media.resource) {
            return;
        }
        tracing::debug!(resource = %media.resource.path, "missing resource");

        let diagnostic = Diagnostic::new(
            self.config.missing_resource,
            UNRESOLVED_RESOURCE,
            format!("Resource '{}' couldn't be found", media.resource.path),
        )
        .with_source(self.source.clone())
        .with_range(media.range);
        self.problems.push(Problem::new(diagnostic));
    }

    /// Resolve one topic reference from `parent`. Already-resolved references
    /// are returned as-is; a failure keeps the as-written reference.
    fn resolve_topic(
        &mut self,
        reference: &TopicReference,
        parent: &ReferenceIdentity,
        range: Option<SourceRange>,
        from_symbol_link: bool,
    ) -> TopicReference {
        let TopicReference::Unresolved(unresolved) = reference else {
            return reference.clone();
        };

        return match self.context.resolve(reference, parent, from_symbol_link) {
            Ok(identity) => TopicReference::Resolved(identity),
            Err(failure) => {
                if let Some(identity) =
                    self.resolve_from_inherited_declaration(reference, unresolved, range, from_symbol_link)
                {
                    return TopicReference::Resolved(identity);
                }
                self.report_unresolved(&failure, range);
                TopicReference::Unresolved(unresolved.clone())
            },
        };
    }

    /// Parent identity for one language variant of the current root.
    fn variant_parent(&self, languages: &BTreeSet<SourceLanguage>, variant_trait: &VariantTrait) -> ReferenceIdentity {
        let language = language_for_variant(languages, variant_trait);
        return self.pool.intern(
            self.root.bundle_id(),
            self.root.path(),
            self.root.fragment(),
            [language.clone()],
        );
    }

    /// Article sections, all resolved from the article's own identity.
    fn visit_article(&mut self, article: &mut Article) {
        let parent = self.root.clone();
        for markup in [&mut article.abstract_section, &mut article.discussion].into_iter().flatten() {
            self.visit_markup_in(markup, &parent);
        }
        for group in article.topics.iter_mut().chain(article.see_also.iter_mut()) {
            self.visit_markup_in(&mut group.content, &parent);
        }
    }

    /// Questions, their answers and justifications, depth-first.
    fn visit_assessments(&mut self, assessments: &mut Assessments) {
        let parent = self.root.clone();
        for question in &mut assessments.questions {
            self.visit_markup_in(&mut question.question, &parent);
            self.visit_markup_in(&mut question.content, &parent);
            if let Some(image) = &question.image {
                self.resolve_media(image);
            }
            for choice in &mut question.choices {
                self.visit_markup_in(&mut choice.content, &parent);
                if let Some(image) = &choice.image {
                    self.resolve_media(image);
                }
                self.visit_markup_in(&mut choice.justification.content, &parent);
            }
        }
    }

    /// One block and everything inside it.
    fn visit_block(&mut self, block: &mut Block, parent: &ReferenceIdentity) {
        match block {
            Block::BlockQuote(children) => self.visit_blocks(children, parent),
            Block::CodeBlock { .. } => {},
            Block::Container(container) => self.visit_blocks(&mut container.children, parent),
            Block::Heading { content, .. } | Block::Paragraph(content) => self.visit_inlines(content, parent),
            Block::Links(links) => {
                for linked in &mut links.topics {
                    linked.topic = self.resolve_topic(&linked.topic, parent, linked.range, false);
                }
            },
            Block::List(items) => {
                for item in items {
                    self.visit_blocks(item, parent);
                }
            },
            Block::Media(media) => {
                self.resolve_media(&media.source);
                if let Some(poster) = &media.poster {
                    self.resolve_media(poster);
                }
            },
        }
    }

    /// Blocks in order.
    fn visit_blocks(&mut self, blocks: &mut [Block], parent: &ReferenceIdentity) {
        for block in blocks {
            self.visit_block(block, parent);
        }
    }

    /// Chapter content, then its curated tutorials from the tutorials root.
    /// A tutorial whose target was already curated in this chapter is reported
    /// and dropped. A repeat of already-resolved link text is dropped without
    /// asking the context again; other spellings are resolved first and then
    /// compared by identity. References that fail to resolve are never
    /// duplicates.
    fn visit_chapter(&mut self, chapter: &mut Chapter) {
        let parent = self.root.clone();
        self.visit_markup_in(&mut chapter.content, &parent);
        if let Some(image) = &chapter.image {
            self.resolve_media(image);
        }

        let tutorials_root = self.context.technology_tutorials_root_reference();
        let mut curated: HashSet<ReferenceIdentity> = HashSet::new();
        let mut resolved_by_text: HashMap<String, ReferenceIdentity> = HashMap::new();
        for mut reference in std::mem::take(&mut chapter.topic_references) {
            let written = reference.topic.effective_target();
            if let Some(target) = resolved_by_text.get(&written) {
                self.report_duplicate(&chapter.name, target, reference.range);
                continue;
            }

            reference.topic = self.resolve_topic(&reference.topic, &tutorials_root, reference.range, false);
            if let TopicReference::Resolved(target) = &reference.topic {
                resolved_by_text.insert(written, target.clone());
                if !curated.insert(target.clone()) {
                    self.report_duplicate(&chapter.name, target, reference.range);
                    continue;
                }
            }
            chapter.topic_references.push(reference);
        }
    }

    /// Text plus optional media.
    fn visit_content_and_media(&mut self, item: &mut ContentAndMedia, parent: &ReferenceIdentity) {
        self.visit_markup_in(&mut item.content, parent);
        if let Some(media) = &item.media {
            self.resolve_media(media);
        }
    }

    /// Resolve every reference in `document`, from the document's own identity.
    pub fn visit_document(&mut self, document: &mut Document) {
        tracing::trace!(document = %document.reference, "resolving document");
        self.root = document.reference.clone();
        self.source = document.source.clone();
        self.inheritance = None;

        match &mut document.content {
            DocumentContent::Article(article) => self.visit_article(article),
            DocumentContent::Symbol(symbol) => self.visit_symbol(symbol),
            DocumentContent::TableOfContents(contents) => self.visit_table_of_contents(contents),
            DocumentContent::Tutorial(tutorial) => self.visit_tutorial(tutorial),
            DocumentContent::TutorialArticle(article) => self.visit_tutorial_article(article),
        }
    }

    /// Inline content in order.
    fn visit_inlines(&mut self, inlines: &mut [Inline], parent: &ReferenceIdentity) {
        for inline in inlines {
            match inline {
                Inline::Emphasis(children) | Inline::Strong(children) => self.visit_inlines(children, parent),
                Inline::Image(image) => self.resolve_media(&image.media),
                Inline::InlineCode(_) | Inline::Text(_) => {},
                Inline::Link(link) => {
                    let is_topic_link = link
                        .destination
                        .unresolved()
                        .is_none_or(UnresolvedReference::is_doc_link);
                    if is_topic_link {
                        link.destination = self.resolve_topic(&link.destination, parent, link.range, false);
                    }
                    self.visit_inlines(&mut link.children, parent);
                },
                Inline::SymbolLink(link) => {
                    link.destination = self.resolve_topic(&link.destination, parent, link.range, true);
                },
            }
        }
    }

    /// Intro text, image and video.
    fn visit_intro(&mut self, intro: &mut Intro) {
        let parent = self.root.clone();
        self.visit_markup_in(&mut intro.content, &parent);
        for media in [&intro.image, &intro.video].into_iter().flatten() {
            self.resolve_media(media);
        }
    }

    /// Resolve every link in `markup` from the current root.
    pub fn visit_markup(&mut self, markup: &mut Markup) {
        let parent = self.root.clone();
        self.visit_markup_in(markup, &parent);
    }

    /// Resolve every link in `markup` from `parent`.
    fn visit_markup_in(&mut self, markup: &mut Markup, parent: &ReferenceIdentity) {
        self.visit_blocks(&mut markup.blocks, parent);
    }

    /// Step text, caption, media and code listing. Media and code are
    /// existence checks, at most one of each per step.
    fn visit_step(&mut self, step: &mut Step) {
        let parent = self.root.clone();
        self.visit_markup_in(&mut step.content, &parent);
        self.visit_markup_in(&mut step.caption, &parent);
        if let Some(media) = &step.media {
            self.resolve_media(media);
        }
        if let Some(code) = &step.code {
            self.resolve_media(&code.file);
            if let Some(preview) = &code.preview {
                self.resolve_media(preview);
            }
        }
    }

    /// Every section of every language variant. Links in inherited docs that
    /// fail here get a second chance from the original declaration.
    fn visit_symbol(&mut self, symbol: &mut SymbolDocumentation) {
        let previous = self.inheritance.take();
        self.inheritance = symbol.doc_comment.as_ref().and_then(|comment| {
            return comment.inherited_from.clone().map(|parent| {
                return InheritanceScope {
                    origin: comment.origin,
                    parent,
                    source: comment.source.clone(),
                };
            });
        });

        let SymbolDocumentation {
            abstract_section,
            discussion,
            languages,
            parameters,
            returns,
            see_also,
            topics,
            ..
        } = symbol;

        for section in [abstract_section, discussion] {
            self.visit_variants(languages, section, |walker, value, parent| {
                if let Some(markup) = value {
                    walker.visit_markup_in(markup, parent);
                }
            });
        }
        self.visit_variants(languages, parameters, |walker, value, parent| {
            for parameter in value {
                walker.visit_markup_in(&mut parameter.content, parent);
            }
        });
        self.visit_variants(languages, returns, |walker, value, parent| {
            if let Some(markup) = value {
                walker.visit_markup_in(markup, parent);
            }
        });
        for section in [see_also, topics] {
            self.visit_variants(languages, section, |walker, value: &mut Vec<TaskGroup>, parent| {
                for group in value {
                    walker.visit_markup_in(&mut group.content, parent);
                }
            });
        }

        self.inheritance = previous;
    }

    /// Volumes, their chapters, and the page intro.
    fn visit_table_of_contents(&mut self, contents: &mut TutorialTableOfContents) {
        self.visit_intro(&mut contents.intro);
        let parent = self.root.clone();
        for volume in &mut contents.volumes {
            self.visit_markup_in(&mut volume.content, &parent);
            if let Some(image) = &volume.image {
                self.resolve_media(image);
            }
            for chapter in &mut volume.chapters {
                self.visit_chapter(chapter);
            }
        }
    }

    /// Intro, sections, assessments; then re-tag the project archive as a download.
    fn visit_tutorial(&mut self, tutorial: &mut Tutorial) {
        self.visit_intro(&mut tutorial.intro);
        for section in &mut tutorial.sections {
            self.visit_tutorial_section(section);
        }
        if let Some(assessments) = &mut tutorial.assessments {
            self.visit_assessments(assessments);
        }
        if let Some(project_files) = &tutorial.project_files {
            self.resolve_media(project_files);
            self.mark_project_files_downloadable(&project_files.resource.path);
        }
    }

    /// Intro, body and assessments of a tutorial article.
    fn visit_tutorial_article(&mut self, article: &mut TutorialArticle) {
        if let Some(intro) = &mut article.intro {
            self.visit_intro(intro);
        }
        let parent = self.root.clone();
        for item in &mut article.content {
            self.visit_content_and_media(item, &parent);
        }
        if let Some(assessments) = &mut article.assessments {
            self.visit_assessments(assessments);
        }
    }

    /// Section introduction, then steps.
    fn visit_tutorial_section(&mut self, section: &mut TutorialSection) {
        let parent = self.root.clone();
        for item in &mut section.introduction {
            self.visit_content_and_media(item, &parent);
        }
        for step in &mut section.steps {
            self.visit_step(step);
        }
    }

    /// Visit each variant's value with a parent scoped to that variant's language.
    fn visit_variants<T>(
        &mut self,
        languages: &BTreeSet<SourceLanguage>,
        variants: &mut Variants<T>,
        mut visit: impl FnMut(&mut Self, &mut T, &ReferenceIdentity),
    ) {
        for variant in &mut variants.entries {
            let parent = self.variant_parent(languages, &variant.variant_trait);
            visit(self, &mut variant.value, &parent);
        }
    }

    /// Start from `root` instead of the documentation root.
    #[must_use]
    pub fn with_root(mut self, root: ReferenceIdentity) -> Self {
        self.root = root;
        return self;
    }

    /// Attribute problems to `source`.
    #[must_use]
    pub fn with_source(mut self, source: Option<PathBuf>) -> Self {
        self.source = source;
        return self;
    }
}

/// Resolve every reference in `document` and return its problems in traversal order.
pub fn resolve_document(
    document: &mut Document,
    context: &dyn ResolutionContext,
    pool: &IdentityPool,
    config: &ResolutionConfig,
) -> Vec<Problem> {
    let mut walker = ResolutionWalker::new(context, pool, config);
    walker.visit_document(document);
    return walker.into_problems();
}
