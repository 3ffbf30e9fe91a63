//! Canonical reference identities and the url-readable rules for their paths.
//!
//! A [`ReferenceIdentity`] is a cheap handle onto shared storage owned by an
//! [`IdentityPool`](crate::pool::IdentityPool). Two handles for the same
//! `(bundle, path, fragment)` key point at the same allocation for as long as
//! any handle is alive; once the last one drops, the storage removes its own
//! pool entry.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, Weak};

use percent_encoding::percent_decode_str;
use serde::{Serialize, Serializer};

use crate::pool::PoolShared;
use crate::types::SourceLanguage;

/// URL scheme of every canonical identity.
pub const URL_SCHEME: &str = "doc";

/// Segment substituted for a path component with no url-readable characters.
pub const PLACEHOLDER_SEGMENT: &str = "---";

/// Pool key below the bundle level. Fragment and path are already url-readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct IdentityKey {
    /// Url-readable fragment, if any.
    pub fragment: Option<String>,
    /// Url-readable path, always starting with `/`.
    pub path: String,
}

/// Shared state behind every handle for one key.
pub(crate) struct IdentityStorage {
    /// Lazily built `doc://` string.
    absolute_string: OnceLock<String>,
    /// Bundle the identity belongs to.
    bundle_id: String,
    /// Path and fragment, as stored in the pool.
    key: IdentityKey,
    /// Lazily split path components, starting with `/`.
    path_components: OnceLock<Vec<String>>,
    /// Owning pool; eviction is skipped if the pool is already gone.
    pool: Weak<PoolShared>,
}

impl IdentityStorage {
    /// Storage for `key` in `bundle_id`, owned by `pool`.
    pub(crate) const fn new(bundle_id: String, key: IdentityKey, pool: Weak<PoolShared>) -> Self {
        return Self {
            absolute_string: OnceLock::new(),
            bundle_id,
            key,
            path_components: OnceLock::new(),
            pool,
        };
    }

    /// Bundle identifier.
    pub(crate) fn bundle_id(&self) -> &str {
        return &self.bundle_id;
    }

    /// Pool key.
    pub(crate) const fn key(&self) -> &IdentityKey {
        return &self.key;
    }
}

impl Drop for IdentityStorage {
    /// Remove this storage's pool entry. Runs with a strong count of zero, so a
    /// concurrent intern of the same key has either already replaced the entry
    /// or will build a fresh one.
    fn drop(&mut self) {
        if let Some(pool) = self.pool.upgrade() {
            pool.evict(self);
        }
    }
}

/// Canonical handle to a location in a bundle's documentation graph.
///
/// Equality and hashing use only the bundle, path and fragment. The source
/// languages travel with the handle as metadata.
#[derive(Clone)]
pub struct ReferenceIdentity {
    /// Languages this handle is available in; never empty.
    source_languages: BTreeSet<SourceLanguage>,
    /// Shared, pooled key data.
    storage: Arc<IdentityStorage>,
}

impl ReferenceIdentity {
    /// Wrap pooled storage with a language set.
    pub(crate) const fn from_parts(
        storage: Arc<IdentityStorage>,
        source_languages: BTreeSet<SourceLanguage>,
    ) -> Self {
        return Self { source_languages, storage };
    }

    /// The `doc://{bundle}{path}[#fragment]` form.
    pub fn absolute_string(&self) -> &str {
        return self.storage.absolute_string.get_or_init(|| {
            let mut out = format!("{URL_SCHEME}://{}{}", self.storage.bundle_id, self.storage.key.path);
            if let Some(fragment) = &self.storage.key.fragment {
                out.push('#');
                out.push_str(fragment);
            }
            return out;
        });
    }

    /// Bundle identifier.
    pub fn bundle_id(&self) -> &str {
        return self.storage.bundle_id();
    }

    /// Url-readable fragment, if any.
    pub fn fragment(&self) -> Option<&str> {
        return self.storage.key.fragment.as_deref();
    }

    /// Last path component, or `/` for the bundle root.
    pub fn last_path_component(&self) -> &str {
        return self.path_components().last().map_or("/", String::as_str);
    }

    /// Url-readable path, always starting with `/`.
    pub fn path(&self) -> &str {
        return &self.storage.key.path;
    }

    /// Path split into components, the first one being `/`.
    pub fn path_components(&self) -> &[String] {
        return self.storage.path_components.get_or_init(|| {
            let mut components = vec!["/".to_string()];
            components.extend(
                self.storage
                    .key
                    .path
                    .split('/')
                    .filter(|segment| return !segment.is_empty())
                    .map(String::from),
            );
            return components;
        });
    }

    /// True when both handles point at the same pooled storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        return Arc::ptr_eq(&self.storage, &other.storage);
    }

    /// Languages this handle is available in.
    pub const fn source_languages(&self) -> &BTreeSet<SourceLanguage> {
        return &self.source_languages;
    }

    /// Pooled storage, used by the pool to derive related identities.
    pub(crate) const fn storage(&self) -> &Arc<IdentityStorage> {
        return &self.storage;
    }
}

impl PartialEq for ReferenceIdentity {
    /// Pointer equality first; identities from different pools fall back to the key.
    fn eq(&self, other: &Self) -> bool {
        return self.shares_storage_with(other)
            || (self.storage.bundle_id == other.storage.bundle_id && self.storage.key == other.storage.key);
    }
}

impl Eq for ReferenceIdentity {}

impl Hash for ReferenceIdentity {
    /// Hash the key only, never the languages.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.storage.bundle_id.hash(state);
        self.storage.key.hash(state);
    }
}

impl fmt::Debug for ReferenceIdentity {
    /// Absolute string plus languages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("ReferenceIdentity")
            .field("url", &self.absolute_string())
            .field("source_languages", &self.source_languages)
            .finish();
    }
}

impl fmt::Display for ReferenceIdentity {
    /// Write the absolute string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(self.absolute_string());
    }
}

impl Serialize for ReferenceIdentity {
    /// Serialized as its absolute string.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return serializer.serialize_str(self.absolute_string());
    }
}

// ── Url-readable rules ────────────────────────────────────────────────

/// Characters kept as-is in a path segment: RFC 3986 `pchar` without `%`.
const fn is_path_char_allowed(c: char) -> bool {
    return c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '.' | '_' | '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
                | ':' | '@'
        );
}

/// Characters kept in a fragment: path characters plus `/` and `?`.
const fn is_fragment_char_allowed(c: char) -> bool {
    return is_path_char_allowed(c) || matches!(c, '/' | '?');
}

/// Decode `%XX` escapes. Malformed escapes are kept literally; invalid UTF-8
/// is replaced rather than rejected.
pub(crate) fn percent_decode(raw: &str) -> String {
    return percent_decode_str(raw).decode_utf8_lossy().into_owned();
}

/// Make one path segment url-readable. Runs of disallowed characters become
/// `_`; a segment with nothing url-readable collapses to the placeholder.
pub(crate) fn url_readable_segment(segment: &str) -> String {
    if segment.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(segment.len());
    let mut any_allowed = false;
    let mut in_disallowed_run = false;
    for c in segment.chars() {
        if is_path_char_allowed(c) {
            out.push(c);
            any_allowed = true;
            in_disallowed_run = false;
        } else if !in_disallowed_run {
            out.push('_');
            in_disallowed_run = true;
        }
    }

    if !any_allowed {
        return PLACEHOLDER_SEGMENT.to_string();
    }
    return out;
}

/// Make a whole path url-readable, segment by segment, and root it at `/`.
pub(crate) fn url_readable_path(path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| return !segment.is_empty())
        .map(url_readable_segment)
        .collect();
    return format!("/{}", segments.join("/"));
}

/// Make a fragment url-readable: whitespace runs become `-`, other
/// disallowed characters are dropped.
pub(crate) fn url_readable_fragment(fragment: &str) -> String {
    return fragment
        .split_whitespace()
        .map(|word| return word.chars().filter(|c| return is_fragment_char_allowed(*c)).collect::<String>())
        .filter(|word| return !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");
}
