//! Symbol documentation and its per-language variants.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::identity::ReferenceIdentity;
use crate::markup::Markup;
use crate::types::{DocCommentOrigin, SourceLanguage};

/// Selects one variant of a symbol's documentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantTrait {
    /// Identifier of the language the variant documents.
    pub interface_language: String,
}

impl VariantTrait {
    /// Trait for the language with identifier `interface_language`.
    pub fn new(interface_language: impl Into<String>) -> Self {
        return Self {
            interface_language: interface_language.into(),
        };
    }
}

/// One variant value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant<T> {
    /// Value for this variant.
    pub value: T,
    /// Which variant.
    pub variant_trait: VariantTrait,
}

/// A section's value for every language variant of a symbol, in declaration order.
/// Variants may hold identical content and are still visited separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variants<T> {
    /// Every stored variant.
    pub entries: Vec<Variant<T>>,
}

impl<T> Default for Variants<T> {
    /// No variants.
    fn default() -> Self {
        return Self { entries: Vec::new() };
    }
}

impl<T> Variants<T> {
    /// Value for `variant_trait`, if stored.
    pub fn get(&self, variant_trait: &VariantTrait) -> Option<&T> {
        return self
            .entries
            .iter()
            .find(|variant| return &variant.variant_trait == variant_trait)
            .map(|variant| return &variant.value);
    }

    /// Store `value` for `variant_trait`, replacing any previous value.
    pub fn insert(&mut self, variant_trait: VariantTrait, value: T) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|variant| return variant.variant_trait == variant_trait)
        {
            existing.value = value;
            return;
        }
        self.entries.push(Variant { value, variant_trait });
    }
}

/// A documented parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter description.
    pub content: Markup,
    /// Parameter name.
    pub name: String,
}

/// A titled group of links, as in a topics or see-also section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGroup {
    /// Group content; usually a list of links.
    pub content: Markup,
    /// Group heading.
    pub heading: Option<String>,
}

/// Where a symbol's doc comment came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Declaring symbol the comment was inherited from, if not written here.
    pub inherited_from: Option<ReferenceIdentity>,
    /// Start of the comment in its source file.
    pub origin: Option<DocCommentOrigin>,
    /// Source file declaring the comment.
    pub source: Option<PathBuf>,
}

/// Documentation for one symbol, across all of its language variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolDocumentation {
    /// One-sentence summary.
    pub abstract_section: Variants<Option<Markup>>,
    /// Discussion.
    pub discussion: Variants<Option<Markup>>,
    /// Doc comment provenance.
    pub doc_comment: Option<DocComment>,
    /// Languages the symbol is available in.
    pub languages: BTreeSet<SourceLanguage>,
    /// Parameters section.
    pub parameters: Variants<Vec<Parameter>>,
    /// Returns section.
    pub returns: Variants<Option<Markup>>,
    /// See-also section.
    pub see_also: Variants<Vec<TaskGroup>>,
    /// Topics section.
    pub topics: Variants<Vec<TaskGroup>>,
}

/// The symbol's language for `variant_trait`.
///
/// # Panics
///
/// Panics if the symbol doesn't declare the variant's language. Variants are
/// only ever built for declared languages, so a miss is an internal
/// inconsistency, not bad input.
pub fn language_for_variant<'a>(
    languages: &'a BTreeSet<SourceLanguage>,
    variant_trait: &VariantTrait,
) -> &'a SourceLanguage {
    let found = languages
        .iter()
        .find(|language| return language.id == variant_trait.interface_language);
    let Some(language) = found else {
        panic!(
            "symbol variant for `{}` has no matching declared language",
            variant_trait.interface_language
        );
    };
    return language;
}
