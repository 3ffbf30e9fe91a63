//! Thread-safe interning table for reference identities.
//!
//! Entries are weak: the pool never keeps an identity alive on its own.
//! Readers share the table lock; a first-time intern takes it exclusively
//! for a single insert.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::identity::{
    IdentityKey, IdentityStorage, ReferenceIdentity, percent_decode, url_readable_fragment,
    url_readable_path, url_readable_segment,
};
use crate::reference::UnresolvedReference;
use crate::types::SourceLanguage;

/// Bundle id, then path/fragment key, to the weakly held storage.
type Table = HashMap<String, HashMap<IdentityKey, Weak<IdentityStorage>>>;

/// State shared between a pool and every storage it created.
pub(crate) struct PoolShared {
    /// The interning table.
    table: RwLock<Table>,
}

impl PoolShared {
    /// Remove the entry for `storage` if it still points at it.
    ///
    /// Called from `IdentityStorage::drop`. Callers of the table lock never
    /// drop a strong handle while holding it, so this cannot self-deadlock.
    pub(crate) fn evict(&self, storage: &IdentityStorage) {
        let mut table = self.table.write();
        let Some(entries) = table.get_mut(storage.bundle_id()) else {
            return;
        };

        let points_at_storage = entries
            .get(storage.key())
            .is_some_and(|weak| return std::ptr::eq(weak.as_ptr(), storage));
        if points_at_storage {
            entries.remove(storage.key());
            tracing::trace!(bundle = storage.bundle_id(), path = %storage.key().path, "evicted identity");
        }

        if entries.is_empty() {
            table.remove(storage.bundle_id());
        }
    }
}

/// Owner of the interning table. Clones share the same table.
#[derive(Clone)]
pub struct IdentityPool {
    /// Table shared with every storage the pool created.
    shared: Arc<PoolShared>,
}

impl Default for IdentityPool {
    /// An empty pool.
    fn default() -> Self {
        return Self::new();
    }
}

impl IdentityPool {
    /// Same key as `identity`, with the union of its languages and `languages`.
    /// The absolute string never changes.
    pub fn adding_source_languages(
        &self,
        identity: &ReferenceIdentity,
        languages: impl IntoIterator<Item = SourceLanguage>,
    ) -> ReferenceIdentity {
        let mut union = identity.source_languages().clone();
        union.extend(languages);
        return self.intern_readable(identity.bundle_id(), identity.storage().key().clone(), union);
    }

    /// Identity for one more path component under `identity`.
    ///
    /// The component is percent-decoded first. An empty component is a no-op;
    /// one made only of characters that are not url-readable becomes the
    /// placeholder segment, so the result still differs from `identity`.
    pub fn appending_path(&self, identity: &ReferenceIdentity, raw_component: &str) -> ReferenceIdentity {
        let Some(path) = joined_path(identity.path(), raw_component) else {
            return identity.clone();
        };
        return self.intern_readable(
            identity.bundle_id(),
            IdentityKey { fragment: None, path },
            identity.source_languages().clone(),
        );
    }

    /// Identity for `reference`'s path and fragment appended to `identity`.
    /// A reference with an empty path leaves `identity` untouched.
    pub fn appending_path_of_reference(
        &self,
        identity: &ReferenceIdentity,
        reference: &UnresolvedReference,
    ) -> ReferenceIdentity {
        let Some(path) = joined_path(identity.path(), reference.path()) else {
            return identity.clone();
        };
        let fragment = reference.fragment().map(url_readable_fragment);
        return self.intern_readable(
            identity.bundle_id(),
            IdentityKey { fragment, path },
            identity.source_languages().clone(),
        );
    }

    /// True when a live identity exists for the key. Dead entries count as absent.
    pub fn contains(&self, bundle_id: &str, path: &str, fragment: Option<&str>) -> bool {
        let key = readable_key(path, fragment);
        let table = self.shared.table.read();
        return table
            .get(bundle_id)
            .and_then(|entries| return entries.get(&key))
            .is_some_and(|weak| return weak.strong_count() > 0);
    }

    /// Return the shared identity for the key, creating it if no live one exists.
    ///
    /// `path` is percent-decoded, then `path` and `fragment` are made
    /// url-readable before lookup. A path without a leading `/` is rooted.
    ///
    /// # Panics
    ///
    /// Panics if `languages` is empty; every identity is available in at
    /// least one language.
    pub fn intern(
        &self,
        bundle_id: &str,
        path: &str,
        fragment: Option<&str>,
        languages: impl IntoIterator<Item = SourceLanguage>,
    ) -> ReferenceIdentity {
        let languages: BTreeSet<SourceLanguage> = languages.into_iter().collect();
        assert!(!languages.is_empty(), "reference identity needs at least one source language");
        return self.intern_readable(bundle_id, readable_key(path, fragment), languages);
    }

    /// Intern an already url-readable key.
    fn intern_readable(
        &self,
        bundle_id: &str,
        key: IdentityKey,
        languages: BTreeSet<SourceLanguage>,
    ) -> ReferenceIdentity {
        let existing = {
            let table = self.shared.table.read();
            table
                .get(bundle_id)
                .and_then(|entries| return entries.get(&key))
                .and_then(Weak::upgrade)
        };
        if let Some(storage) = existing {
            return ReferenceIdentity::from_parts(storage, languages);
        }

        // Built outside the lock; if another thread wins the race this
        // candidate is dropped after the guard is released.
        let candidate = Arc::new(IdentityStorage::new(
            bundle_id.to_string(),
            key.clone(),
            Arc::downgrade(&self.shared),
        ));

        let (winner, discarded) = {
            let mut table = self.shared.table.write();
            let entries = table.entry(bundle_id.to_string()).or_default();
            match entries.get(&key).and_then(Weak::upgrade) {
                Some(live) => (live, Some(candidate)),
                None => {
                    entries.insert(key, Arc::downgrade(&candidate));
                    tracing::trace!(bundle = bundle_id, "interned identity");
                    (candidate, None)
                },
            }
        };
        drop(discarded);

        return ReferenceIdentity::from_parts(winner, languages);
    }

    /// Number of live identities across all bundles.
    pub fn live_count(&self) -> usize {
        let table = self.shared.table.read();
        return table
            .values()
            .flat_map(HashMap::values)
            .filter(|weak| return weak.strong_count() > 0)
            .count();
    }

    /// An empty, independent pool.
    pub fn new() -> Self {
        return Self {
            shared: Arc::new(PoolShared {
                table: RwLock::new(HashMap::new()),
            }),
        };
    }

    /// Same bundle and path as `identity` with `fragment` (`None` clears it).
    pub fn with_fragment(&self, identity: &ReferenceIdentity, fragment: Option<&str>) -> ReferenceIdentity {
        let key = IdentityKey {
            fragment: fragment.map(url_readable_fragment),
            path: identity.path().to_string(),
        };
        return self.intern_readable(identity.bundle_id(), key, identity.source_languages().clone());
    }
}

/// Append the url-readable segments of `raw` to `base`.
/// Returns `None` when `raw` has no segments at all.
fn joined_path(base: &str, raw: &str) -> Option<String> {
    let decoded = percent_decode(raw);
    let segments: Vec<String> = decoded
        .split('/')
        .filter(|segment| return !segment.is_empty())
        .map(url_readable_segment)
        .collect();
    if segments.is_empty() {
        return None;
    }
    return Some(format!("{}/{}", base.trim_end_matches('/'), segments.join("/")));
}

/// Pool key for an as-given path and fragment. The path is percent-decoded
/// first, as in [`joined_path`].
fn readable_key(path: &str, fragment: Option<&str>) -> IdentityKey {
    return IdentityKey {
        fragment: fragment.map(url_readable_fragment),
        path: url_readable_path(&percent_decode(path)),
    };
}
