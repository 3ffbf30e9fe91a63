//! Topic and resource references as they appear in the documentation tree.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::identity::{ReferenceIdentity, URL_SCHEME};

/// RFC 3986 appendix B, split into scheme, authority, path, query, fragment.
#[allow(clippy::expect_used, reason = "hardcoded pattern, covered by tests")]
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("valid link pattern");
});

/// A link exactly as the author wrote it, split into its URL parts.
/// Carries no knowledge of the documentation graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnresolvedReference {
    /// Fragment after `#`, if present.
    fragment: Option<String>,
    /// Authority after `//`, usually a bundle identifier.
    host: Option<String>,
    /// Path part; may be relative.
    path: String,
    /// The destination text as written.
    raw: String,
    /// Scheme before `:`, if present.
    scheme: Option<String>,
}

impl UnresolvedReference {
    /// The normalized as-written target: scheme, authority, path and fragment.
    pub fn effective_target(&self) -> String {
        let mut out = String::with_capacity(self.raw.len());
        if let Some(scheme) = &self.scheme {
            out.push_str(scheme);
            out.push(':');
        }
        if let Some(host) = &self.host {
            out.push_str("//");
            out.push_str(host);
        }
        out.push_str(&self.path);
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        return out;
    }

    /// Fragment after `#`.
    pub fn fragment(&self) -> Option<&str> {
        return self.fragment.as_deref();
    }

    /// Authority after `//`.
    pub fn host(&self) -> Option<&str> {
        return self.host.as_deref();
    }

    /// True for links in the `doc:` scheme, the only scheme resolved as topics.
    pub fn is_doc_link(&self) -> bool {
        return self.scheme.as_deref().is_some_and(|scheme| return scheme.eq_ignore_ascii_case(URL_SCHEME));
    }

    /// True when the path must be interpreted relative to the linking page.
    pub fn is_relative(&self) -> bool {
        return self.host.is_none() && !self.path.starts_with('/');
    }

    /// True for `http` and `https` links.
    pub fn is_web_link(&self) -> bool {
        return self
            .scheme
            .as_deref()
            .is_some_and(|scheme| return scheme.to_ascii_lowercase().starts_with("http"));
    }

    /// Split an authored link destination into its parts.
    pub fn parse(destination: &str) -> Self {
        let destination = destination.trim();
        let Some(caps) = LINK_PATTERN.captures(destination) else {
            return Self::path_only(destination);
        };
        let part = |index: usize| return caps.get(index).map(|m| return m.as_str().to_string());

        return Self {
            fragment: part(5),
            host: part(2).filter(|host| return !host.is_empty()),
            path: part(3).unwrap_or_default(),
            raw: destination.to_string(),
            scheme: part(1),
        };
    }

    /// Path part.
    pub fn path(&self) -> &str {
        return &self.path;
    }

    /// Reference with no scheme or authority; the whole text before `#` is the path.
    fn path_only(destination: &str) -> Self {
        let (path, fragment) = match destination.split_once('#') {
            Some((path, fragment)) => (path.to_string(), Some(fragment.to_string())),
            None => (destination.to_string(), None),
        };
        return Self {
            fragment,
            host: None,
            path,
            raw: destination.to_string(),
            scheme: None,
        };
    }

    /// The destination text as written.
    pub fn raw(&self) -> &str {
        return &self.raw;
    }

    /// Scheme before `:`.
    pub fn scheme(&self) -> Option<&str> {
        return self.scheme.as_deref();
    }

    /// Symbol link destinations are symbol paths, not URLs: `Type/method(_:)`
    /// must not be read as a scheme.
    pub fn symbol_path(destination: &str) -> Self {
        return Self::path_only(destination.trim());
    }
}

impl fmt::Display for UnresolvedReference {
    /// Write the destination as written.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.raw);
    }
}

/// A link to a topic, before or after resolution.
///
/// Equality and hashing use the effective target, so a resolved reference
/// equals an unresolved one spelled as its absolute string.
#[derive(Debug, Clone, Serialize)]
pub enum TopicReference {
    /// Resolved to a canonical identity.
    Resolved(ReferenceIdentity),
    /// Not resolved (yet, or at all).
    Unresolved(UnresolvedReference),
}

impl TopicReference {
    /// Absolute string when resolved, normalized as-written target otherwise.
    pub fn effective_target(&self) -> String {
        return match self {
            Self::Resolved(identity) => identity.absolute_string().to_string(),
            Self::Unresolved(reference) => reference.effective_target(),
        };
    }

    /// Parse an authored link destination.
    pub fn parse(destination: &str) -> Self {
        return Self::Unresolved(UnresolvedReference::parse(destination));
    }

    /// The identity, if resolved.
    pub const fn resolved(&self) -> Option<&ReferenceIdentity> {
        return match self {
            Self::Resolved(identity) => Some(identity),
            Self::Unresolved(_) => None,
        };
    }

    /// The as-written reference, if unresolved.
    pub const fn unresolved(&self) -> Option<&UnresolvedReference> {
        return match self {
            Self::Resolved(_) => None,
            Self::Unresolved(reference) => Some(reference),
        };
    }
}

impl PartialEq for TopicReference {
    /// Compare effective targets.
    fn eq(&self, other: &Self) -> bool {
        return self.effective_target() == other.effective_target();
    }
}

impl Eq for TopicReference {}

impl Hash for TopicReference {
    /// Hash the effective target.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.effective_target().hash(state);
    }
}

impl fmt::Display for TopicReference {
    /// Write the effective target.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.effective_target());
    }
}

/// A non-topic link into a bundle: an image, video, download or code file.
/// Only ever checked for existence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceReference {
    /// Bundle the resource is looked up in.
    pub bundle_id: String,
    /// Resource path or name as written.
    pub path: String,
}

impl ResourceReference {
    /// True when the path is a web URL rather than a bundle resource.
    pub fn is_web_url(&self) -> bool {
        return UnresolvedReference::parse(&self.path).is_web_link();
    }

    /// Resource `path` in `bundle_id`.
    pub fn new(bundle_id: impl Into<String>, path: impl Into<String>) -> Self {
        return Self {
            bundle_id: bundle_id.into(),
            path: path.into(),
        };
    }
}
