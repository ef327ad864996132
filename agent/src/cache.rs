//! Cache storage.
//!
//! Named stores mapping request URLs to captured responses. The host
//! owns the storage and keeps it internally synchronized; the agent
//! reads and writes it only from inside its event handlers. The whole
//! storage can be snapshotted to bytes (postcard) so the host can park
//! it in whatever persistent store it manages between worker restarts.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::fetch::Response;

// ── Types ───────────────────────────────────────────────────

/// A single cached response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// The request URL this response is keyed on.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// HTTP status text.
    pub status_text: String,
    /// Response headers (name → value).
    pub headers: BTreeMap<String, String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl CachedResponse {
    /// Capture a network response for storage under `url`.
    pub fn capture(url: &str, response: &Response) -> Self {
        Self {
            url: String::from(url),
            status: response.status,
            status_text: response.status_text.clone(),
            headers: response.headers.clone(),
            body: response.body.clone(),
        }
    }

    /// Rebuild the transient response value served to the page.
    pub fn to_response(&self) -> Response {
        Response {
            url: self.url.clone(),
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

/// A named cache store (one agent generation's assets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cache {
    /// Cache name (e.g., `"v1"`).
    name: String,
    /// URL → cached response.
    entries: BTreeMap<String, CachedResponse>,
}

impl Cache {
    /// Create a new empty cache.
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            entries: BTreeMap::new(),
        }
    }

    /// Cache name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a response under its URL, replacing any previous entry.
    pub fn put(&mut self, url: &str, response: CachedResponse) {
        self.entries.insert(String::from(url), response);
    }

    /// Look up a cached response by URL.
    pub fn match_url(&self, url: &str) -> Option<&CachedResponse> {
        self.entries.get(url)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache storage error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Snapshot bytes could not be decoded.
    CorruptSnapshot,
    /// Backing storage failure reported by the host.
    StorageError(String),
}

impl core::fmt::Display for CacheError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CacheError::CorruptSnapshot => write!(f, "snapshot could not be decoded"),
            CacheError::StorageError(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

/// The origin's set of named cache stores (the `caches` object).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStorage {
    /// cache name → cache.
    caches: BTreeMap<String, Cache>,
}

// ── Implementation ──────────────────────────────────────────

impl CacheStorage {
    /// Create empty cache storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or create) a named cache.
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches
            .entry(String::from(name))
            .or_insert_with(|| Cache::new(name))
    }

    /// Check if a named cache exists.
    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Delete a named cache.
    ///
    /// Returns whether a cache by that name existed. The in-memory store
    /// cannot fail here; the `Result` is the host-storage contract.
    pub fn delete(&mut self, name: &str) -> Result<bool, CacheError> {
        Ok(self.caches.remove(name).is_some())
    }

    /// List all cache names.
    pub fn keys(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// Put a response into the named cache, creating the cache if absent.
    pub fn put(
        &mut self,
        cache_name: &str,
        url: &str,
        response: CachedResponse,
    ) -> Result<(), CacheError> {
        self.open(cache_name).put(url, response);
        Ok(())
    }

    /// Match a URL across all caches (returns first hit).
    pub fn match_url(&self, url: &str) -> Option<&CachedResponse> {
        self.caches.values().find_map(|cache| cache.match_url(url))
    }

    /// Match a URL in a specific cache.
    pub fn match_in(&self, cache_name: &str, url: &str) -> Option<&CachedResponse> {
        self.caches.get(cache_name)?.match_url(url)
    }

    /// Encode the whole storage for host persistence.
    pub fn snapshot(&self) -> Result<Vec<u8>, CacheError> {
        postcard::to_allocvec(self).map_err(|e| CacheError::StorageError(e.to_string()))
    }

    /// Rebuild storage from snapshot bytes.
    pub fn restore(bytes: &[u8]) -> Result<Self, CacheError> {
        postcard::from_bytes(bytes).map_err(|_| CacheError::CorruptSnapshot)
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(url: &str, body: &[u8]) -> CachedResponse {
        CachedResponse {
            url: String::from(url),
            status: 200,
            status_text: String::from("OK"),
            headers: BTreeMap::new(),
            body: body.to_vec(),
        }
    }

    #[test]
    fn cache_put_and_match() {
        let mut cache = Cache::new("v1");
        cache.put("/style.css", make_response("/style.css", b"body{color:red}"));

        let found = cache.match_url("/style.css").unwrap();
        assert_eq!(found.body, b"body{color:red}");
        assert_eq!(found.status, 200);
        assert!(cache.match_url("/other.css").is_none());
    }

    #[test]
    fn cache_replace_same_url() {
        let mut cache = Cache::new("v1");
        cache.put("/file", make_response("/file", b"version1"));
        cache.put("/file", make_response("/file", b"version2"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.match_url("/file").unwrap().body, b"version2");
    }

    #[test]
    fn storage_open_and_has() {
        let mut storage = CacheStorage::new();
        assert!(!storage.has("v1"));
        storage.open("v1");
        assert!(storage.has("v1"));
        assert!(storage.open("v1").is_empty());
    }

    #[test]
    fn storage_delete() {
        let mut storage = CacheStorage::new();
        storage.open("temp");
        assert_eq!(storage.delete("temp"), Ok(true));
        assert!(!storage.has("temp"));
        assert_eq!(storage.delete("temp"), Ok(false));
    }

    #[test]
    fn storage_put_and_match_across_caches() {
        let mut storage = CacheStorage::new();
        storage
            .put("v1", "/index.html", make_response("/index.html", b"<html>"))
            .unwrap();

        let resp = storage.match_url("/index.html").unwrap();
        assert_eq!(resp.body, b"<html>");
        assert!(storage.match_url("/missing").is_none());
    }

    #[test]
    fn storage_match_in() {
        let mut storage = CacheStorage::new();
        storage.put("v1", "/a.js", make_response("/a.js", b"var x")).unwrap();
        storage.put("v2", "/b.js", make_response("/b.js", b"var y")).unwrap();

        assert!(storage.match_in("v1", "/a.js").is_some());
        assert!(storage.match_in("v1", "/b.js").is_none());
        assert!(storage.match_in("v2", "/b.js").is_some());
    }

    #[test]
    fn storage_keys() {
        let mut storage = CacheStorage::new();
        storage.open("v1");
        storage.open("v0");
        assert_eq!(storage.keys(), ["v0", "v1"]);
    }

    #[test]
    fn capture_and_rebuild_response() {
        let resp = Response::new(200).with_url("/logo.png").with_body(b"png".to_vec());
        let cached = CachedResponse::capture("/logo.png", &resp);
        let rebuilt = cached.to_response();

        assert_eq!(rebuilt.url, "/logo.png");
        assert_eq!(rebuilt.status, 200);
        assert_eq!(rebuilt.status_text, "OK");
        assert_eq!(rebuilt.body, b"png");
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut storage = CacheStorage::new();
        storage.put("v1", "/", make_response("/", b"<html>")).unwrap();
        storage.put("v1", "/a.css", make_response("/a.css", b"a{}")).unwrap();
        storage.open("v0");

        let bytes = storage.snapshot().unwrap();
        let restored = CacheStorage::restore(&bytes).unwrap();

        assert_eq!(restored.keys(), ["v0", "v1"]);
        assert_eq!(restored.match_in("v1", "/").unwrap().body, b"<html>");
        assert_eq!(restored.match_in("v1", "/a.css").unwrap().body, b"a{}");
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let err = CacheStorage::restore(&[0xFF, 0x01, 0x02]).unwrap_err();
        assert_eq!(err, CacheError::CorruptSnapshot);
    }
}
