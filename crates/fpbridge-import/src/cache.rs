//! Content-addressed resource cache.
//!
//! Materials are keyed by the content hash the exporter computes. A hash seen
//! before returns the existing handle without constructing anything; a new
//! hash whose display name is already taken gets a disambiguated name.
//! Entries live for the whole session and are never evicted.

use std::hash::BuildHasherDefault;

use fpbridge_document::ContentHash;
use hashbrown::HashMap as FastHashMap;
use log::debug;
use rustc_hash::FxHasher;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

#[derive(Debug)]
struct CachedResource<H> {
    name: String,
    handle: H,
}

/// Append-only map from content hash to resource handle.
#[derive(Debug)]
pub struct ResourceCache<H> {
    entries: FxHashMap<ContentHash, CachedResource<H>>,
    constructed: u64,
    hits: u64,
}

impl<H: Clone> ResourceCache<H> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            constructed: 0,
            hits: 0,
        }
    }

    /// Return the handle cached for `hash`, constructing it on first use.
    ///
    /// `construct` receives the effective name: `name`, or `name_<suffix>` when
    /// a resource with a different hash already uses `name` (compared
    /// case-insensitively). Should that be taken too, `_2`, `_3`, ... is
    /// appended until no cached resource holds it. A failed construction
    /// caches nothing.
    pub fn resolve<E, F>(&mut self, hash: ContentHash, name: &str, construct: F) -> Result<H, E>
    where
        F: FnOnce(&str) -> Result<H, E>,
    {
        if let Some(entry) = self.entries.get(&hash) {
            self.hits += 1;
            return Ok(entry.handle.clone());
        }

        let effective = self.free_name(name, hash);
        if effective != name {
            debug!("Material name {} already in use, creating {}", name, effective);
        }

        let handle = construct(&effective)?;
        self.constructed += 1;
        self.entries.insert(
            hash,
            CachedResource {
                name: effective,
                handle: handle.clone(),
            },
        );
        Ok(handle)
    }

    /// Cached handle for `hash`.
    pub fn get(&self, hash: ContentHash) -> Option<&H> {
        self.entries.get(&hash).map(|e| &e.handle)
    }

    /// Effective name the resource for `hash` was created with.
    pub fn name_of(&self, hash: ContentHash) -> Option<&str> {
        self.entries.get(&hash).map(|e| e.name.as_str())
    }

    pub fn contains(&self, hash: ContentHash) -> bool {
        self.entries.contains_key(&hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of constructor calls so far.
    pub fn constructed(&self) -> u64 {
        self.constructed
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    fn name_taken(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.entries.values().any(|e| e.name.to_lowercase() == name)
    }

    fn free_name(&self, name: &str, hash: ContentHash) -> String {
        if !self.name_taken(name) {
            return name.to_string();
        }

        let base = format!("{}_{}", name, hash.suffix());
        let mut candidate = base.clone();
        let mut counter = 2;
        while self.name_taken(&candidate) {
            candidate = format!("{}_{}", base, counter);
            counter += 1;
        }
        candidate
    }
}

impl<H: Clone> Default for ResourceCache<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn named(name: &str) -> Result<String, Infallible> {
        Ok(name.to_string())
    }

    #[test]
    fn test_same_hash_constructs_once() {
        let mut cache = ResourceCache::new();
        let mut calls = 0;
        let hash = ContentHash::from_raw(42);

        for _ in 0..2 {
            let handle = cache
                .resolve(hash, "MI_Body", |n| {
                    calls += 1;
                    named(n)
                })
                .unwrap();
            assert_eq!(handle, "MI_Body");
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_name_collision_disambiguated() {
        let mut cache = ResourceCache::new();
        let first = cache.resolve(ContentHash::from_raw(1), "Foo", named).unwrap();
        let second = cache.resolve(ContentHash::from_raw(-255), "foo", named).unwrap();

        assert_eq!(first, "Foo");
        assert_eq!(second, "foo_nff");
        assert_ne!(first, second);
        assert_eq!(cache.name_of(ContentHash::from_raw(-255)), Some("foo_nff"));
    }

    #[test]
    fn test_opposite_hashes_get_distinct_names() {
        let mut cache = ResourceCache::new();
        let names: Vec<String> = [1, 255, -255]
            .into_iter()
            .map(|h| cache.resolve(ContentHash::from_raw(h), "Foo", named).unwrap())
            .collect();

        assert_eq!(names, ["Foo", "Foo_ff", "Foo_nff"]);
    }

    #[test]
    fn test_synthesized_name_skips_names_in_use() {
        let mut cache = ResourceCache::new();
        cache.resolve(ContentHash::from_raw(1), "Foo", named).unwrap();
        cache.resolve(ContentHash::from_raw(2), "Foo_a", named).unwrap();
        cache.resolve(ContentHash::from_raw(3), "FOO_A_2", named).unwrap();

        let renamed = cache.resolve(ContentHash::from_raw(10), "Foo", named).unwrap();
        assert_eq!(renamed, "Foo_a_3");

        let mut seen: Vec<String> = [1, 2, 3, 10]
            .into_iter()
            .filter_map(|h| cache.name_of(ContentHash::from_raw(h)))
            .map(str::to_lowercase)
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_failed_construction_is_not_cached() {
        let mut cache: ResourceCache<String> = ResourceCache::new();
        let hash = ContentHash::from_raw(7);

        let err = cache.resolve(hash, "Broken", |_| Err("scene refused"));
        assert_eq!(err, Err("scene refused"));
        assert!(!cache.contains(hash));

        assert_eq!(cache.resolve(hash, "Broken", named).unwrap(), "Broken");
        assert_eq!(cache.constructed(), 1);
    }
}
