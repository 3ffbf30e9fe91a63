//! Reference resolution for documentation compilers.
//!
//! Two pieces: an [`IdentityPool`] that interns canonical
//! [`ReferenceIdentity`] values so equal topics share one storage, and a
//! [`ResolutionWalker`] that visits a documentation tree, resolves every
//! authored link against a [`ResolutionContext`], and collects a
//! [`Problem`] for each one that fails.

pub mod batch;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod identity;
pub mod markup;
pub mod pool;
pub mod reference;
pub mod symbol;
pub mod tutorial;
pub mod types;
pub mod walker;

pub use crate::batch::{ResolvedDocument, resolve_documents};
pub use crate::config::ResolutionConfig;
pub use crate::context::{Asset, AssetContext, ResolutionContext, ResolutionFailure};
pub use crate::diagnostics::{Diagnostic, Problem, Severity};
pub use crate::document::{Document, DocumentContent};
pub use crate::error::Error;
pub use crate::identity::ReferenceIdentity;
pub use crate::pool::IdentityPool;
pub use crate::reference::{ResourceReference, TopicReference, UnresolvedReference};
pub use crate::walker::{ResolutionWalker, resolve_document};
