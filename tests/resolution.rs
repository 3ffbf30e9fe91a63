//! End-to-end resolution against an in-memory documentation catalog.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use parking_lot::Mutex;

use doclink::diagnostics::{
    DUPLICATE_TUTORIAL_REFERENCE, INHERITED_RELATIVE_LINK, UNRESOLVED_RESOURCE, UNRESOLVED_TOPIC,
};
use doclink::document::Article;
use doclink::markup::{
    Block, Container, ContainerKind, Inline, Link, LinkedTopic, LinksDirective, Markup, MediaDirective,
    MediaKind, MediaReference, SymbolLink,
};
use doclink::symbol::{DocComment, Parameter, SymbolDocumentation, TaskGroup, VariantTrait};
use doclink::tutorial::{
    Assessments, Chapter, Choice, CodeReference, ContentAndMedia, Intro, Justification, MultipleChoice, Step,
    Tutorial, TutorialArticle, TutorialReference, TutorialSection, TutorialTableOfContents, Volume,
};
use doclink::types::{DocCommentOrigin, SourceLanguage, SourceLocation, SourcePosition, SourceRange};
use doclink::{
    Asset, AssetContext, Document, DocumentContent, IdentityPool, ReferenceIdentity, ResolutionConfig,
    ResolutionContext, ResolutionFailure, ResolutionWalker, ResourceReference, Severity, TopicReference,
    resolve_document, resolve_documents,
};

const BUNDLE: &str = "org.example.Kit";

/// One call to `resolve`, as seen by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolveCall {
    from_symbol_link: bool,
    languages: Vec<String>,
    parent: String,
    reference: String,
}

/// In-memory documentation graph. Relative links resolve as a child of the
/// parent first, then as a sibling.
struct Catalog {
    assets: Mutex<HashMap<String, Asset>>,
    calls: Mutex<Vec<ResolveCall>>,
    pages: HashSet<String>,
    pool: IdentityPool,
    resources: HashSet<String>,
    uncurated: HashMap<String, SourceLocation>,
}

impl Catalog {
    fn new(pool: &IdentityPool) -> Self {
        Self {
            assets: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            pages: HashSet::new(),
            pool: pool.clone(),
            resources: HashSet::new(),
            uncurated: HashMap::new(),
        }
    }

    fn with_pages(mut self, pages: &[&str]) -> Self {
        self.pages.extend(pages.iter().map(|page| page.to_string()));
        self
    }

    fn with_resources(mut self, resources: &[&str]) -> Self {
        self.resources.extend(resources.iter().map(|name| name.to_string()));
        self
    }

    fn identity(&self, path: &str) -> ReferenceIdentity {
        self.pool.intern(BUNDLE, path, None, [SourceLanguage::new("swift")])
    }

    fn calls(&self) -> Vec<ResolveCall> {
        self.calls.lock().clone()
    }

    /// Raw link text of every `resolve` call, in order.
    fn called(&self) -> Vec<String> {
        self.calls.lock().iter().map(|call| call.reference.clone()).collect()
    }
}

impl ResolutionContext for Catalog {
    fn documentation_root_reference(&self) -> ReferenceIdentity {
        self.identity("/documentation/Kit")
    }

    fn resolve(
        &self,
        reference: &TopicReference,
        parent: &ReferenceIdentity,
        from_symbol_link: bool,
    ) -> Result<ReferenceIdentity, ResolutionFailure> {
        let unresolved = match reference {
            TopicReference::Resolved(identity) => return Ok(identity.clone()),
            TopicReference::Unresolved(unresolved) => unresolved,
        };
        self.calls.lock().push(ResolveCall {
            from_symbol_link,
            languages: parent.source_languages().iter().map(|language| language.id.clone()).collect(),
            parent: parent.absolute_string().to_string(),
            reference: unresolved.raw().to_string(),
        });

        let candidates = if unresolved.is_relative() {
            let sibling_base = parent.path().rsplit_once('/').map_or("", |(dir, _)| dir);
            vec![
                format!("{}/{}", parent.path(), unresolved.path()),
                format!("{sibling_base}/{}", unresolved.path()),
            ]
        } else {
            vec![unresolved.path().to_string()]
        };

        candidates
            .into_iter()
            .find(|candidate| self.pages.contains(candidate))
            .map(|found| {
                self.pool
                    .intern(BUNDLE, &found, unresolved.fragment(), parent.source_languages().clone())
            })
            .ok_or_else(|| ResolutionFailure {
                message: format!("No page named '{}'.", unresolved.path()),
                reference: unresolved.clone(),
            })
    }

    fn resolve_asset(&self, name: &str, _root: &ReferenceIdentity) -> Option<Asset> {
        self.assets.lock().get(name).cloned()
    }

    fn resource_exists(&self, resource: &ResourceReference) -> bool {
        resource.bundle_id == BUNDLE && self.resources.contains(&resource.path)
    }

    fn root_reference(&self) -> ReferenceIdentity {
        self.identity("/")
    }

    fn technology_tutorials_root_reference(&self) -> ReferenceIdentity {
        self.identity("/tutorials/Kit")
    }

    fn uncurated_article_match(&self, path: &str) -> Option<SourceLocation> {
        self.uncurated.get(path).cloned()
    }

    fn update_asset(&self, name: &str, asset: Asset, _root: &ReferenceIdentity) {
        self.assets.lock().insert(name.to_string(), asset);
    }
}

fn range(line: u32, start: u32, end: u32) -> Option<SourceRange> {
    Some(SourceRange::new(SourcePosition::new(line, start), SourcePosition::new(line, end)))
}

fn link(destination: &str, line: u32) -> Inline {
    Inline::Link(Link::new(destination, "link", range(line, 1, 20)))
}

fn article(catalog: &Catalog, path: &str, abstract_section: Markup, discussion: Markup) -> Document {
    Document::new(
        catalog.identity(path),
        DocumentContent::Article(Article {
            abstract_section: Some(abstract_section),
            discussion: Some(discussion),
            title: "Article".to_string(),
            ..Article::default()
        }),
    )
    .with_source("Kit.docc/Article.md")
}

fn paragraph_links(markup: &Markup) -> Vec<&TopicReference> {
    let mut found = Vec::new();
    for block in &markup.blocks {
        if let Block::Paragraph(inlines) = block {
            for inline in inlines {
                match inline {
                    Inline::Link(link) => found.push(&link.destination),
                    Inline::SymbolLink(link) => found.push(&link.destination),
                    _ => {},
                }
            }
        }
    }
    found
}

fn symbol_document(catalog: &Catalog, path: &str, symbol: SymbolDocumentation) -> Document {
    Document::new(catalog.identity(path), DocumentContent::Symbol(symbol)).with_source("Kit.docc/Symbol.md")
}

fn languages(ids: &[&str]) -> BTreeSet<SourceLanguage> {
    ids.iter().map(|id| SourceLanguage::new(*id)).collect()
}

/// The quoted link or resource name from each problem's summary.
fn subjects(problems: &[doclink::Problem]) -> Vec<&str> {
    problems
        .iter()
        .map(|problem| problem.diagnostic.summary.split('\'').nth(1).unwrap_or_default())
        .collect()
}

fn text(destination: &str, line: u32) -> Markup {
    Markup::paragraph(vec![link(destination, line)])
}

fn media(path: &str, line: u32) -> MediaReference {
    MediaReference::new(BUNDLE, path, range(line, 1, 30))
}

// ── Topic links ──────────────────────────────────────────────────────

#[test]
fn doc_links_resolve_in_place() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Widget"]);
    let config = ResolutionConfig::default();
    let mut document = article(
        &catalog,
        "/documentation/Kit/GettingStarted",
        Markup::paragraph(vec![link("doc:Widget", 1)]),
        Markup::paragraph(vec![Inline::SymbolLink(SymbolLink::new("Widget", range(3, 1, 10)))]),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert!(problems.is_empty(), "unexpected problems: {problems:?}");
    let DocumentContent::Article(article) = &document.content else {
        panic!("content kind changed");
    };
    let resolved = paragraph_links(article.abstract_section.as_ref().unwrap());
    assert_eq!(
        resolved[0].resolved().map(ReferenceIdentity::absolute_string),
        Some("doc://org.example.Kit/documentation/Kit/Widget")
    );
    let symbol = paragraph_links(article.discussion.as_ref().unwrap());
    assert!(symbol[0].resolved().is_some());

    let calls = catalog.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].from_symbol_link);
    assert!(calls[1].from_symbol_link);
    assert_eq!(calls[0].parent, "doc://org.example.Kit/documentation/Kit/GettingStarted");
}

#[test]
fn web_links_are_never_resolved() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool);
    let config = ResolutionConfig::default();
    let mut document = article(
        &catalog,
        "/documentation/Kit/GettingStarted",
        Markup::paragraph(vec![link("https://example.com/kit", 1)]),
        Markup::default(),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert!(problems.is_empty());
    assert!(catalog.calls().is_empty());
}

#[test]
fn unresolved_links_are_reported_in_traversal_order() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Widget"]);
    let config = ResolutionConfig::default();
    let mut document = article(
        &catalog,
        "/documentation/Kit/GettingStarted",
        Markup::paragraph(vec![link("doc:First", 1), link("doc:Widget", 1)]),
        Markup::new(vec![
            Block::List(vec![vec![Block::Paragraph(vec![link("doc:Second", 5)])]]),
            Block::Container(Container {
                children: vec![Block::Paragraph(vec![Inline::Strong(vec![link("doc:Third", 9)])])],
                kind: ContainerKind::Row,
            }),
        ]),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    let summaries: Vec<&str> = problems.iter().map(|problem| problem.diagnostic.summary.as_str()).collect();
    assert_eq!(
        summaries,
        [
            "Topic reference 'doc:First' couldn't be resolved. No page named 'First'.",
            "Topic reference 'doc:Second' couldn't be resolved. No page named 'Second'.",
            "Topic reference 'doc:Third' couldn't be resolved. No page named 'Third'.",
        ]
    );
    for problem in &problems {
        assert_eq!(problem.diagnostic.identifier, UNRESOLVED_TOPIC);
        assert_eq!(problem.diagnostic.severity, Severity::Warning);
        assert_eq!(problem.diagnostic.source, Some(PathBuf::from("Kit.docc/Article.md")));
    }
    assert_eq!(problems[1].diagnostic.range, range(5, 1, 20));

    let DocumentContent::Article(article) = &document.content else {
        panic!("content kind changed");
    };
    let abstract_links = paragraph_links(article.abstract_section.as_ref().unwrap());
    assert_eq!(abstract_links[0], &TopicReference::parse("doc:First"));
    assert!(abstract_links[1].resolved().is_some());
}

#[test]
fn uncurated_article_match_adds_note() {
    let pool = IdentityPool::new();
    let mut catalog = Catalog::new(&pool);
    catalog.uncurated.insert(
        "Orphan".to_string(),
        SourceLocation {
            file: PathBuf::from("Kit.docc/Orphan.md"),
            range: range(1, 1, 9),
        },
    );
    let config = ResolutionConfig::default();
    let mut document = article(
        &catalog,
        "/documentation/Kit/GettingStarted",
        Markup::paragraph(vec![link("doc:Orphan", 2)]),
        Markup::default(),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(problems.len(), 1);
    let notes = &problems[0].diagnostic.notes;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].source, Some(PathBuf::from("Kit.docc/Orphan.md")));
    assert_eq!(notes[0].range, range(1, 1, 9));
    assert!(notes[0].message.contains("isn't curated"));
}

#[test]
fn links_directive_topics_resolve() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Widget"]);
    let config = ResolutionConfig::default();
    let directive = Block::Links(LinksDirective {
        topics: vec![
            LinkedTopic {
                range: range(4, 3, 20),
                topic: TopicReference::parse("doc:Widget"),
            },
            LinkedTopic {
                range: range(5, 3, 20),
                topic: TopicReference::parse("doc:Gizmo"),
            },
        ],
        visual_style: "list".to_string(),
    });
    let mut document = article(&catalog, "/documentation/Kit/Overview", Markup::default(), Markup::new(vec![directive]));

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].diagnostic.range, range(5, 3, 20));
    let DocumentContent::Article(article) = &document.content else {
        panic!("content kind changed");
    };
    let Some(Block::Links(links)) = article.discussion.as_ref().and_then(|markup| markup.blocks.first()) else {
        panic!("links directive missing");
    };
    assert!(links.topics[0].topic.resolved().is_some());
    assert!(links.topics[1].topic.unresolved().is_some());
}

#[test]
fn configured_severity_is_used() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool);
    let config = ResolutionConfig::parse("unresolved-topic = \"error\"\n").unwrap();
    let mut document = article(
        &catalog,
        "/documentation/Kit/GettingStarted",
        Markup::paragraph(vec![link("doc:Nowhere", 1)]),
        Markup::default(),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(problems[0].diagnostic.severity, Severity::Error);
}

#[test]
fn walker_resolves_markup_from_a_custom_root() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Guides/Setup"]);
    let config = ResolutionConfig::default();
    let mut markup = Markup::paragraph(vec![link("doc:Setup", 1), link("doc:Teardown", 2)]);

    let mut walker = ResolutionWalker::new(&catalog, &pool, &config)
        .with_root(catalog.identity("/documentation/Kit/Guides"))
        .with_source(Some(PathBuf::from("Kit.docc/Guides.md")));
    walker.visit_markup(&mut markup);

    assert_eq!(walker.problems().len(), 1);
    assert_eq!(subjects(walker.problems()), ["doc:Teardown"]);
    let problems = walker.into_problems();
    assert_eq!(problems[0].diagnostic.source, Some(PathBuf::from("Kit.docc/Guides.md")));
    assert!(catalog.calls().iter().all(|call| call.parent == "doc://org.example.Kit/documentation/Kit/Guides"));
    assert!(paragraph_links(&markup)[0].resolved().is_some());
}

// ── Resources ────────────────────────────────────────────────────────

#[test]
fn missing_resources_are_reported_and_web_media_skipped() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_resources(&["present.png"]);
    let config = ResolutionConfig::default();
    let media = |path: &str, line: u32| {
        Block::Media(MediaDirective {
            kind: MediaKind::Image,
            poster: None,
            source: MediaReference::new(BUNDLE, path, range(line, 1, 30)),
        })
    };
    let mut document = article(
        &catalog,
        "/documentation/Kit/GettingStarted",
        Markup::default(),
        Markup::new(vec![
            media("present.png", 1),
            media("https://example.com/remote.png", 2),
            media("absent.png", 3),
        ]),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].diagnostic.identifier, UNRESOLVED_RESOURCE);
    assert_eq!(problems[0].diagnostic.summary, "Resource 'absent.png' couldn't be found");
    assert_eq!(problems[0].diagnostic.range, range(3, 1, 30));
}

// ── Tutorials ────────────────────────────────────────────────────────

#[test]
fn duplicate_tutorials_in_a_chapter_are_dropped() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/tutorials/Kit/BuildingAWidget"]);
    let config = ResolutionConfig::default();
    let chapter = Chapter {
        name: "Basics".to_string(),
        topic_references: vec![
            TutorialReference::new("doc:BuildingAWidget", range(3, 1, 40)),
            TutorialReference::new("doc:BuildingAWidget", range(4, 1, 40)),
            TutorialReference::new("doc:Missing", range(5, 1, 40)),
            TutorialReference::new("doc:Missing", range(6, 1, 40)),
        ],
        ..Chapter::default()
    };
    let mut document = Document::new(
        catalog.identity("/tutorials/Kit"),
        DocumentContent::TableOfContents(TutorialTableOfContents {
            volumes: vec![Volume {
                chapters: vec![chapter],
                name: "Volume".to_string(),
                ..Volume::default()
            }],
            ..TutorialTableOfContents::default()
        }),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    let identifiers: Vec<&str> = problems.iter().map(|problem| problem.diagnostic.identifier.as_str()).collect();
    assert_eq!(identifiers, [DUPLICATE_TUTORIAL_REFERENCE, UNRESOLVED_TOPIC, UNRESOLVED_TOPIC]);

    let duplicate = &problems[0];
    assert_eq!(duplicate.diagnostic.range, range(4, 1, 40));
    assert_eq!(duplicate.possible_solutions.len(), 1);
    let replacement = &duplicate.possible_solutions[0].replacements[0];
    assert_eq!(replacement.replacement, "");
    assert_eq!(Some(replacement.range), range(4, 1, 40));

    let DocumentContent::TableOfContents(contents) = &document.content else {
        panic!("content kind changed");
    };
    let kept = &contents.volumes[0].chapters[0].topic_references;
    assert_eq!(kept.len(), 3);
    assert!(kept[0].topic.resolved().is_some());
    assert!(kept[1].topic.unresolved().is_some());
    assert!(kept[2].topic.unresolved().is_some());

    assert_eq!(catalog.called(), ["doc:BuildingAWidget", "doc:Missing", "doc:Missing"]);
    assert!(
        catalog
            .calls()
            .iter()
            .all(|call| call.parent == "doc://org.example.Kit/tutorials/Kit")
    );
}

fn table_of_contents(catalog: &Catalog, references: Vec<TutorialReference>) -> Document {
    let chapter = Chapter {
        name: "Basics".to_string(),
        topic_references: references,
        ..Chapter::default()
    };
    Document::new(
        catalog.identity("/tutorials/Kit"),
        DocumentContent::TableOfContents(TutorialTableOfContents {
            volumes: vec![Volume {
                chapters: vec![chapter],
                name: "Volume".to_string(),
                ..Volume::default()
            }],
            ..TutorialTableOfContents::default()
        }),
    )
}

#[test]
fn repeated_tutorial_text_is_resolved_once() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/tutorials/Kit/BuildingAWidget"]);
    let config = ResolutionConfig::default();
    let mut document = table_of_contents(
        &catalog,
        vec![
            TutorialReference::new("doc:BuildingAWidget", range(3, 1, 40)),
            TutorialReference::new("doc:BuildingAWidget", range(4, 1, 40)),
        ],
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(catalog.calls().len(), 1);
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].diagnostic.identifier, DUPLICATE_TUTORIAL_REFERENCE);
    assert_eq!(problems[0].diagnostic.range, range(4, 1, 40));
}

#[test]
fn differently_written_links_to_one_tutorial_are_duplicates() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/tutorials/Kit/BuildingAWidget"]);
    let config = ResolutionConfig::default();
    let mut document = table_of_contents(
        &catalog,
        vec![
            TutorialReference::new("doc:BuildingAWidget", range(3, 1, 40)),
            TutorialReference::new("doc:/tutorials/Kit/BuildingAWidget", range(4, 1, 50)),
        ],
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(catalog.called(), ["doc:BuildingAWidget", "doc:/tutorials/Kit/BuildingAWidget"]);
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].diagnostic.identifier, DUPLICATE_TUTORIAL_REFERENCE);
    assert_eq!(problems[0].diagnostic.range, range(4, 1, 50));
    let DocumentContent::TableOfContents(contents) = &document.content else {
        panic!("content kind changed");
    };
    assert_eq!(contents.volumes[0].chapters[0].topic_references.len(), 1);
}

#[test]
fn tutorial_steps_and_project_files() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_resources(&["step-01.png", "Kit.zip"]);
    catalog.assets.lock().insert(
        "Kit.zip".to_string(),
        Asset {
            context: AssetContext::Display,
            files: vec![PathBuf::from("Kit.docc/Resources/Kit.zip")],
            name: "Kit.zip".to_string(),
        },
    );
    let config = ResolutionConfig::default();
    let step = Step {
        code: Some(CodeReference {
            file: MediaReference::new(BUNDLE, "widget-01.swift", range(12, 5, 40)),
            preview: None,
        }),
        media: Some(MediaReference::new(BUNDLE, "step-01.png", range(13, 5, 40))),
        ..Step::default()
    };
    let mut document = Document::new(
        catalog.identity("/tutorials/Kit/BuildingAWidget"),
        DocumentContent::Tutorial(Tutorial {
            project_files: Some(MediaReference::new(BUNDLE, "Kit.zip", range(2, 1, 30))),
            sections: vec![TutorialSection {
                steps: vec![step],
                title: "Create a widget".to_string(),
                ..TutorialSection::default()
            }],
            ..Tutorial::default()
        }),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].diagnostic.summary, "Resource 'widget-01.swift' couldn't be found");
    assert_eq!(catalog.assets.lock()["Kit.zip"].context, AssetContext::Download);
}

fn assessments() -> Assessments {
    Assessments {
        questions: vec![MultipleChoice {
            choices: vec![
                Choice {
                    content: text("doc:FirstChoice", 24),
                    image: Some(media("choice.png", 25)),
                    is_correct: true,
                    justification: Justification {
                        content: text("doc:FirstReason", 26),
                    },
                },
                Choice {
                    content: text("doc:SecondChoice", 27),
                    image: None,
                    is_correct: false,
                    justification: Justification {
                        content: text("doc:SecondReason", 28),
                    },
                },
            ],
            content: text("doc:QuestionBody", 22),
            image: Some(media("question.png", 23)),
            question: text("doc:Question", 21),
        }],
    }
}

#[test]
fn assessments_are_visited_depth_first() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/tutorials/Kit/SecondReason"]);
    let config = ResolutionConfig::default();
    let mut document = Document::new(
        catalog.identity("/tutorials/Kit/BuildingAWidget"),
        DocumentContent::Tutorial(Tutorial {
            assessments: Some(assessments()),
            ..Tutorial::default()
        }),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(
        catalog.called(),
        [
            "doc:Question",
            "doc:QuestionBody",
            "doc:FirstChoice",
            "doc:FirstReason",
            "doc:SecondChoice",
            "doc:SecondReason",
        ]
    );
    assert_eq!(
        subjects(&problems),
        [
            "doc:Question",
            "doc:QuestionBody",
            "question.png",
            "doc:FirstChoice",
            "choice.png",
            "doc:FirstReason",
            "doc:SecondChoice",
        ]
    );

    let DocumentContent::Tutorial(tutorial) = &document.content else {
        panic!("content kind changed");
    };
    let question = &tutorial.assessments.as_ref().unwrap().questions[0];
    assert!(paragraph_links(&question.choices[1].justification.content)[0].resolved().is_some());
}

#[test]
fn tutorial_article_intro_body_and_assessments() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_resources(&["body.png"]);
    let config = ResolutionConfig::default();
    let mut document = Document::new(
        catalog.identity("/tutorials/Kit/AboutWidgets"),
        DocumentContent::TutorialArticle(TutorialArticle {
            assessments: Some(Assessments {
                questions: vec![MultipleChoice {
                    question: text("doc:Quiz", 30),
                    ..MultipleChoice::default()
                }],
            }),
            content: vec![
                ContentAndMedia {
                    content: text("doc:Body", 10),
                    media: Some(media("body.png", 11)),
                },
                ContentAndMedia {
                    content: text("doc:MoreBody", 12),
                    media: Some(media("diagram.png", 13)),
                },
            ],
            intro: Some(Intro {
                content: text("doc:Opening", 2),
                image: Some(media("hero.png", 3)),
                title: "About widgets".to_string(),
                video: None,
            }),
        }),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(catalog.called(), ["doc:Opening", "doc:Body", "doc:MoreBody", "doc:Quiz"]);
    assert_eq!(
        subjects(&problems),
        ["doc:Opening", "hero.png", "doc:Body", "doc:MoreBody", "diagram.png", "doc:Quiz"]
    );
    assert!(
        catalog
            .calls()
            .iter()
            .all(|call| call.parent == "doc://org.example.Kit/tutorials/Kit/AboutWidgets")
    );
}

#[test]
fn tutorial_intro_sections_and_step_parts_in_order() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool)
        .with_pages(&["/tutorials/Kit/Caption"])
        .with_resources(&["widget-01.swift"]);
    let config = ResolutionConfig::default();
    let step = Step {
        caption: text("doc:Caption", 15),
        code: Some(CodeReference {
            file: media("widget-01.swift", 16),
            preview: Some(media("preview-01.png", 17)),
        }),
        content: text("doc:StepText", 14),
        media: Some(media("step-01.png", 18)),
    };
    let mut document = Document::new(
        catalog.identity("/tutorials/Kit/BuildingAWidget"),
        DocumentContent::Tutorial(Tutorial {
            intro: Intro {
                content: text("doc:Welcome", 2),
                image: Some(media("intro.png", 3)),
                title: "Building a widget".to_string(),
                video: Some(media("intro.mov", 4)),
            },
            sections: vec![TutorialSection {
                introduction: vec![ContentAndMedia {
                    content: text("doc:SectionIntro", 10),
                    media: None,
                }],
                steps: vec![step],
                title: "Create a widget".to_string(),
            }],
            ..Tutorial::default()
        }),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(catalog.called(), ["doc:Welcome", "doc:SectionIntro", "doc:StepText", "doc:Caption"]);
    assert_eq!(
        subjects(&problems),
        [
            "doc:Welcome",
            "intro.png",
            "intro.mov",
            "doc:SectionIntro",
            "doc:StepText",
            "step-01.png",
            "preview-01.png",
        ]
    );
    assert_eq!(problems[6].diagnostic.range, range(17, 1, 30));
}

// ── Symbols ──────────────────────────────────────────────────────────

#[test]
fn every_language_variant_is_visited() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Gadget"]);
    let config = ResolutionConfig::default();
    let mut symbol = SymbolDocumentation {
        languages: languages(&["occ", "swift"]),
        ..SymbolDocumentation::default()
    };
    let content = Markup::paragraph(vec![link("doc:Gadget", 1)]);
    symbol.abstract_section.insert(VariantTrait::new("swift"), Some(content.clone()));
    symbol.abstract_section.insert(VariantTrait::new("occ"), Some(content));
    let mut document = symbol_document(&catalog, "/documentation/Kit/Widget", symbol);

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert!(problems.is_empty());
    let calls = catalog.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].languages, ["swift"]);
    assert_eq!(calls[1].languages, ["occ"]);
    assert!(calls.iter().all(|call| call.parent == "doc://org.example.Kit/documentation/Kit/Widget"));

    let DocumentContent::Symbol(symbol) = &document.content else {
        panic!("content kind changed");
    };
    for variant in &symbol.abstract_section.entries {
        let links = paragraph_links(variant.value.as_ref().unwrap());
        assert!(links[0].resolved().is_some());
    }
}

#[test]
fn every_symbol_section_is_visited_in_order() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Widget/Returned"]);
    let config = ResolutionConfig::default();
    let swift = VariantTrait::new("swift");
    let mut symbol = SymbolDocumentation {
        languages: languages(&["swift"]),
        ..SymbolDocumentation::default()
    };
    symbol.abstract_section.insert(swift.clone(), Some(text("doc:Summary", 1)));
    symbol.discussion.insert(swift.clone(), Some(text("doc:Details", 3)));
    symbol.parameters.insert(
        swift.clone(),
        vec![
            Parameter {
                content: text("doc:FirstParameter", 5),
                name: "first".to_string(),
            },
            Parameter {
                content: text("doc:SecondParameter", 6),
                name: "second".to_string(),
            },
        ],
    );
    symbol.returns.insert(swift.clone(), Some(text("doc:Returned", 8)));
    symbol.see_also.insert(
        swift.clone(),
        vec![TaskGroup {
            content: text("doc:Related", 10),
            heading: None,
        }],
    );
    symbol.topics.insert(
        swift,
        vec![TaskGroup {
            content: text("doc:Members", 12),
            heading: Some("Members".to_string()),
        }],
    );
    let mut document = symbol_document(&catalog, "/documentation/Kit/Widget", symbol);

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(
        catalog.called(),
        [
            "doc:Summary",
            "doc:Details",
            "doc:FirstParameter",
            "doc:SecondParameter",
            "doc:Returned",
            "doc:Related",
            "doc:Members",
        ]
    );
    assert_eq!(
        subjects(&problems),
        [
            "doc:Summary",
            "doc:Details",
            "doc:FirstParameter",
            "doc:SecondParameter",
            "doc:Related",
            "doc:Members",
        ]
    );
    assert!(catalog.calls().iter().all(|call| call.languages == ["swift"]));

    let DocumentContent::Symbol(symbol) = &document.content else {
        panic!("content kind changed");
    };
    let returns = symbol.returns.entries[0].value.as_ref().unwrap();
    assert!(paragraph_links(returns)[0].resolved().is_some());
}

fn inherited_symbol(link_destination: &str) -> SymbolDocumentation {
    let pool = IdentityPool::new();
    let mut symbol = SymbolDocumentation {
        doc_comment: Some(DocComment {
            inherited_from: Some(pool.intern(
                BUNDLE,
                "/documentation/Kit/Widget/draw()",
                None,
                [SourceLanguage::new("swift")],
            )),
            origin: Some(DocCommentOrigin { character: 4, line: 10 }),
            source: Some(PathBuf::from("Sources/Kit/Widget.swift")),
        }),
        languages: languages(&["swift"]),
        ..SymbolDocumentation::default()
    };
    symbol.discussion.insert(
        VariantTrait::new("swift"),
        Some(Markup::paragraph(vec![Inline::Link(Link::new(
            link_destination,
            "render",
            range(2, 5, 20),
        ))])),
    );
    symbol
}

#[test]
fn inherited_relative_link_falls_back_to_declaring_symbol() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Widget/render()"]);
    let config = ResolutionConfig::default();
    let mut document = symbol_document(&catalog, "/documentation/Kit/Gadget/draw()", inherited_symbol("doc:render()"));

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(problems.len(), 1);
    let problem = &problems[0];
    let mapped = Some(SourceRange::new(SourcePosition::new(12, 9), SourcePosition::new(12, 24)));
    assert_eq!(problem.diagnostic.identifier, INHERITED_RELATIVE_LINK);
    assert_eq!(problem.diagnostic.range, mapped);
    assert_eq!(problem.diagnostic.source, Some(PathBuf::from("Sources/Kit/Widget.swift")));
    assert_eq!(problem.diagnostic.notes.len(), 1);
    assert!(
        problem
            .diagnostic
            .explanation
            .as_deref()
            .is_some_and(|explanation| explanation.contains("/documentation/Kit/Widget/draw()"))
    );
    assert_eq!(problem.possible_solutions.len(), 1);
    let replacement = &problem.possible_solutions[0].replacements[0];
    assert_eq!(replacement.replacement, "<doc:/documentation/Kit/Widget/render()>");
    assert_eq!(Some(replacement.range), mapped);

    let DocumentContent::Symbol(symbol) = &document.content else {
        panic!("content kind changed");
    };
    let links = paragraph_links(symbol.discussion.entries[0].value.as_ref().unwrap());
    assert_eq!(
        links[0].resolved().map(ReferenceIdentity::path),
        Some("/documentation/Kit/Widget/render()")
    );

    let calls = catalog.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].parent, "doc://org.example.Kit/documentation/Kit/Widget/draw()");
}

#[test]
fn inherited_fallback_can_be_disabled() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Widget/render()"]);
    let config = ResolutionConfig {
        inherited_link_fallback: false,
        ..ResolutionConfig::default()
    };
    let mut document = symbol_document(&catalog, "/documentation/Kit/Gadget/draw()", inherited_symbol("doc:render()"));

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].diagnostic.identifier, UNRESOLVED_TOPIC);
    assert_eq!(catalog.calls().len(), 1);
}

#[test]
fn absolute_links_never_fall_back() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool);
    let config = ResolutionConfig::default();
    let mut document = symbol_document(
        &catalog,
        "/documentation/Kit/Gadget/draw()",
        inherited_symbol("doc:/documentation/Kit/Nowhere"),
    );

    let problems = resolve_document(&mut document, &catalog, &pool, &config);

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].diagnostic.identifier, UNRESOLVED_TOPIC);
    assert_eq!(problems[0].diagnostic.range, range(2, 5, 20));
    assert_eq!(catalog.calls().len(), 1);
}

#[test]
#[should_panic(expected = "no matching declared language")]
fn variant_for_undeclared_language_is_fatal() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool);
    let config = ResolutionConfig::default();
    let mut symbol = SymbolDocumentation {
        languages: languages(&["swift"]),
        ..SymbolDocumentation::default()
    };
    symbol.abstract_section.insert(VariantTrait::new("occ"), Some(Markup::default()));
    let mut document = symbol_document(&catalog, "/documentation/Kit/Widget", symbol);

    let _problems = resolve_document(&mut document, &catalog, &pool, &config);
}

// ── Batches ──────────────────────────────────────────────────────────

#[test]
fn batch_results_keep_input_order() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool).with_pages(&["/documentation/Kit/Widget"]);
    let config = ResolutionConfig::default();
    let documents: Vec<Document> = (0..24)
        .map(|index| {
            let destination = if index % 3 == 0 { "doc:Missing" } else { "doc:Widget" };
            article(
                &catalog,
                &format!("/documentation/Kit/Page{index}"),
                Markup::paragraph(vec![link(destination, 1)]),
                Markup::default(),
            )
        })
        .collect();

    let resolved = resolve_documents(documents, &catalog, &pool, &config, NonZeroUsize::new(4).unwrap()).unwrap();

    assert_eq!(resolved.len(), 24);
    for (index, item) in resolved.iter().enumerate() {
        assert_eq!(item.document.reference.path(), format!("/documentation/Kit/Page{index}"));
        let expected = usize::from(index % 3 == 0);
        assert_eq!(item.problems.len(), expected, "document {index}");
    }
}

#[test]
fn empty_batch_is_fine() {
    let pool = IdentityPool::new();
    let catalog = Catalog::new(&pool);
    let config = ResolutionConfig::default();

    let resolved = resolve_documents(Vec::new(), &catalog, &pool, &config, NonZeroUsize::MIN).unwrap();

    assert!(resolved.is_empty());
}
