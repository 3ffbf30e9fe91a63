//! The contract the walker needs from the documentation knowledge base.
//!
//! This crate never decides what exists in the graph. Anything implementing
//! [`ResolutionContext`] with these semantics can drive a resolution pass.

use std::path::PathBuf;

use crate::identity::ReferenceIdentity;
use crate::reference::{ResourceReference, TopicReference, UnresolvedReference};
use crate::types::SourceLocation;

/// Why a topic reference didn't resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    /// Explanation from the context, shown in the diagnostic summary.
    pub message: String,
    /// The reference as the context understood it.
    pub reference: UnresolvedReference,
}

/// How an asset is presented in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetContext {
    /// Shown inline.
    Display,
    /// Offered as a download.
    Download,
}

/// A file in the bundle known to the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// How the asset is presented.
    pub context: AssetContext,
    /// Files backing the asset, one per variant.
    pub files: Vec<PathBuf>,
    /// Name the asset is registered under.
    pub name: String,
}

/// The knowledge base answering "does this exist, and what is it".
///
/// Shared across worker threads during batch resolution, so implementations
/// synchronize their own mutable state (such as asset updates).
pub trait ResolutionContext: Send + Sync {
    /// Root of the article and symbol documentation namespace.
    fn documentation_root_reference(&self) -> ReferenceIdentity;

    /// Resolve `reference` as seen from `parent`.
    ///
    /// `from_symbol_link` is set for double-backtick symbol links, which follow
    /// symbol path rules rather than article rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionFailure`] with the reference and an explanation
    /// when nothing in the graph matches.
    fn resolve(
        &self,
        reference: &TopicReference,
        parent: &ReferenceIdentity,
        from_symbol_link: bool,
    ) -> Result<ReferenceIdentity, ResolutionFailure>;

    /// Look up an asset by name.
    fn resolve_asset(&self, name: &str, root: &ReferenceIdentity) -> Option<Asset>;

    /// Whether a resource exists in the bundle.
    fn resource_exists(&self, resource: &ResourceReference) -> bool;

    /// Root of the bundle.
    fn root_reference(&self) -> ReferenceIdentity;

    /// Root that tutorial references in chapters resolve against.
    fn technology_tutorials_root_reference(&self) -> ReferenceIdentity;

    /// Location of an article matching `path` that exists but isn't curated.
    /// Only used to enrich a failure diagnostic.
    fn uncurated_article_match(&self, path: &str) -> Option<SourceLocation>;

    /// Replace the stored asset registered under `name`.
    fn update_asset(&self, name: &str, asset: Asset, root: &ReferenceIdentity);
}
