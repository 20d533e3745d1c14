//! Topic routing catalog.
//!
//! A lazily-initialized, cached catalog over the companion resource
//! artifacts that drive topic selection: tiered routing rules, role and
//! department maps, and a binary offset-indexed text blob giving O(1)
//! topic-text retrieval.
//!
//! ## Resources
//!
//! | Resource | Required | Contents |
//! |----------|----------|----------|
//! | `routing/core.json` | yes | core send/receive routing tiers |
//! | `routing/roles.json` | yes | role map: `{department, role, file_id}` rows |
//! | `routing/departments.json` | yes | department list: `{department, slug}` rows |
//! | `routing/topics.idx` | yes | fixed 12-byte offset/length records |
//! | `routing/topics.blob` | yes | raw UTF-8 topic text, sliced by the index |
//! | `routing/dept_{slug}.json` | no | per-department routing tier |
//! | `routing/role_{file_id}.json` | no | per-role routing tier |
//!
//! Missing required resources are fatal configuration errors surfaced on
//! first catalog use. Missing companion documents are soft misses. Index
//! records pointing outside the blob are lookup failures, never crashes.
//!
//! ## Concurrency
//!
//! Build one catalog during process start-up and share it by reference. The
//! one-time load runs exactly once even under concurrent first access; the
//! companion-document caches tolerate redundant concurrent parsing (the
//! parse is idempotent and side-effect-free, so racing readers never observe
//! divergent results).

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::types::{
    DepartmentEntry, RoleMapEntry, TopicIndexEntry, TopicRoutingTier, TOPIC_INDEX_RECORD_LEN,
};

pub mod dir;
pub mod memory;
pub mod provider;

pub use dir::DirResources;
pub use memory::InMemoryResources;
pub use provider::ResourceProvider;

use provider::resolve;

/// Core routing tier document.
pub const CORE_TIERS_RESOURCE: &str = "routing/core.json";
/// Role map document.
pub const ROLE_MAP_RESOURCE: &str = "routing/roles.json";
/// Department list document.
pub const DEPARTMENT_LIST_RESOURCE: &str = "routing/departments.json";
/// Binary topic index.
pub const TOPIC_INDEX_RESOURCE: &str = "routing/topics.idx";
/// Topic text blob.
pub const TOPIC_BLOB_RESOURCE: &str = "routing/topics.blob";

/// Capacity of each companion-document cache.
const ROUTING_CACHE_CAPACITY: usize = 256;

/// Companion document name for a department slug.
fn department_resource(slug: &str) -> String {
    format!("routing/dept_{}.json", slug.to_lowercase())
}

/// Companion document name for a role file id.
fn role_resource(file_id: &str) -> String {
    format!("routing/role_{}.json", file_id.to_lowercase())
}

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A required resource is absent from the provider.
    #[error("Required catalog resource missing: {0}")]
    MissingResource(String),
    /// A present resource failed to parse.
    #[error("Malformed catalog resource {name}: {source}")]
    MalformedResource {
        /// Resource name as requested.
        name: String,
        /// Parse failure.
        source: serde_json::Error,
    },
    /// Provider I/O failure.
    #[error("Resource I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed state of the five required artifacts.
struct LoadedCatalog {
    core: TopicRoutingTier,
    /// `"department|role"` (lower-cased) to file id.
    role_files: HashMap<String, String>,
    /// Department name (lower-cased) to slug.
    department_slugs: HashMap<String, String>,
    index: Vec<u8>,
    blob: Vec<u8>,
}

/// Cache statistics for one companion-document cache.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Current number of entries.
    pub len: usize,
    /// Maximum capacity.
    pub cap: usize,
}

type TierCache = RwLock<LruCache<String, Option<Arc<TopicRoutingTier>>>>;

/// Lazily-loaded topic routing catalog.
///
/// Construction is cheap; the resource load happens once, on first use, and
/// every caller observes the same fully-initialized state.
pub struct TopicRoutingCatalog<P: ResourceProvider> {
    provider: P,
    loaded: OnceCell<LoadedCatalog>,
    department_cache: TierCache,
    role_cache: TierCache,
}

fn new_tier_cache() -> TierCache {
    let cap = NonZeroUsize::new(ROUTING_CACHE_CAPACITY).expect("capacity is non-zero");
    RwLock::new(LruCache::new(cap))
}

impl<P: ResourceProvider> TopicRoutingCatalog<P> {
    /// Create a catalog over a resource provider. Performs no I/O.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            loaded: OnceCell::new(),
            department_cache: new_tier_cache(),
            role_cache: new_tier_cache(),
        }
    }

    fn required(&self, name: &str) -> Result<Vec<u8>, CatalogError> {
        resolve(&self.provider, name)?
            .ok_or_else(|| CatalogError::MissingResource(name.to_string()))
    }

    fn parse_json<T: serde::de::DeserializeOwned>(
        name: &str,
        bytes: &[u8],
    ) -> Result<T, CatalogError> {
        serde_json::from_slice(bytes).map_err(|source| CatalogError::MalformedResource {
            name: name.to_string(),
            source,
        })
    }

    fn load(&self) -> Result<LoadedCatalog, CatalogError> {
        let core: TopicRoutingTier =
            Self::parse_json(CORE_TIERS_RESOURCE, &self.required(CORE_TIERS_RESOURCE)?)?;
        let roles: Vec<RoleMapEntry> =
            Self::parse_json(ROLE_MAP_RESOURCE, &self.required(ROLE_MAP_RESOURCE)?)?;
        let departments: Vec<DepartmentEntry> = Self::parse_json(
            DEPARTMENT_LIST_RESOURCE,
            &self.required(DEPARTMENT_LIST_RESOURCE)?,
        )?;
        let index = self.required(TOPIC_INDEX_RESOURCE)?;
        let blob = self.required(TOPIC_BLOB_RESOURCE)?;

        let role_files = roles
            .into_iter()
            .map(|entry| {
                (
                    format!("{}|{}", entry.department, entry.role).to_lowercase(),
                    entry.file_id,
                )
            })
            .collect::<HashMap<_, _>>();
        let department_slugs = departments
            .into_iter()
            .map(|entry| (entry.department.to_lowercase(), entry.slug))
            .collect::<HashMap<_, _>>();

        debug!(
            roles = role_files.len(),
            departments = department_slugs.len(),
            topics = index.len() / TOPIC_INDEX_RECORD_LEN,
            "loaded topic routing catalog"
        );

        Ok(LoadedCatalog {
            core,
            role_files,
            department_slugs,
            index,
            blob,
        })
    }

    /// One-time lazy load; all callers observe the same instance.
    fn loaded(&self) -> Result<&LoadedCatalog, CatalogError> {
        self.loaded.get_or_try_init(|| self.load())
    }

    /// The core routing tier document.
    pub fn core_routing(&self) -> Result<&TopicRoutingTier, CatalogError> {
        Ok(&self.loaded()?.core)
    }

    /// Companion-document file id for a department/role pair.
    pub fn role_file_id(
        &self,
        department: &str,
        role: &str,
    ) -> Result<Option<String>, CatalogError> {
        let key = format!("{department}|{role}").to_lowercase();
        Ok(self.loaded()?.role_files.get(&key).cloned())
    }

    /// Companion-document slug for a department name.
    pub fn department_slug(&self, department: &str) -> Result<Option<String>, CatalogError> {
        Ok(self
            .loaded()?
            .department_slugs
            .get(&department.to_lowercase())
            .cloned())
    }

    /// Memoized lookup of an optional companion routing document.
    fn companion(
        &self,
        cache: &TierCache,
        key: String,
        resource: String,
    ) -> Result<Option<Arc<TopicRoutingTier>>, CatalogError> {
        // Any catalog use forces the one-time load first, so configuration
        // errors surface loudly rather than as soft misses.
        self.loaded()?;

        if let Some(hit) = cache.read().peek(&key) {
            return Ok(hit.clone());
        }

        debug!(%resource, "routing cache miss");
        let tier = match resolve(&self.provider, &resource)? {
            Some(bytes) => Some(Arc::new(Self::parse_json::<TopicRoutingTier>(
                &resource, &bytes,
            )?)),
            None => None,
        };

        cache.write().put(key, tier.clone());
        Ok(tier)
    }

    /// Routing tier for a department slug. Absence is a soft miss.
    pub fn department_routing(
        &self,
        slug: &str,
    ) -> Result<Option<Arc<TopicRoutingTier>>, CatalogError> {
        self.companion(
            &self.department_cache,
            slug.to_lowercase(),
            department_resource(slug),
        )
    }

    /// Routing tier for a role file id. Absence is a soft miss.
    pub fn role_routing(
        &self,
        file_id: &str,
    ) -> Result<Option<Arc<TopicRoutingTier>>, CatalogError> {
        self.companion(&self.role_cache, file_id.to_lowercase(), role_resource(file_id))
    }

    /// Retrieve the text of a topic by id.
    ///
    /// Soft misses: negative ids, ids past the index, records pointing
    /// outside the blob, non-UTF-8 slices, and blank text.
    pub fn topic_text(&self, topic_id: i64) -> Result<Option<String>, CatalogError> {
        let loaded = self.loaded()?;
        if topic_id < 0 {
            return Ok(None);
        }

        let record_start = match (topic_id as u64).checked_mul(TOPIC_INDEX_RECORD_LEN as u64) {
            Some(offset) if offset + TOPIC_INDEX_RECORD_LEN as u64 <= loaded.index.len() as u64 => {
                offset as usize
            }
            _ => return Ok(None),
        };

        let mut record = [0u8; TOPIC_INDEX_RECORD_LEN];
        record.copy_from_slice(&loaded.index[record_start..record_start + TOPIC_INDEX_RECORD_LEN]);
        let entry = TopicIndexEntry::decode(&record);

        if !entry.fits_within(loaded.blob.len()) {
            warn!(
                topic_id,
                offset = entry.offset,
                length = entry.length,
                "topic index record points outside the blob"
            );
            return Ok(None);
        }

        let start = entry.offset as usize;
        let end = start + entry.length as usize;
        match std::str::from_utf8(&loaded.blob[start..end]) {
            Ok(text) if !text.trim().is_empty() => Ok(Some(text.to_string())),
            _ => Ok(None),
        }
    }

    /// Companion-document cache statistics `(department, role)`.
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        let stats = |cache: &TierCache| {
            let cache = cache.read();
            CacheStats {
                len: cache.len(),
                cap: cache.cap().get(),
            }
        };
        (stats(&self.department_cache), stats(&self.role_cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier_doc(topic: u32) -> String {
        format!(r#"{{"send": {{"both": [{topic}]}}, "receive": {{"both": [{topic}]}}}}"#)
    }

    fn fixture() -> InMemoryResources {
        let texts: &[&str] = &["hello", "budget review", ""];
        let mut blob = Vec::new();
        let mut index = Vec::new();
        for text in texts {
            let entry = TopicIndexEntry {
                offset: blob.len() as u64,
                length: text.len() as u32,
            };
            index.extend_from_slice(&entry.encode());
            blob.extend_from_slice(text.as_bytes());
        }
        // A record pointing past the end of the blob.
        index.extend_from_slice(
            &TopicIndexEntry {
                offset: blob.len() as u64,
                length: 10,
            }
            .encode(),
        );

        InMemoryResources::new()
            .with_str(CORE_TIERS_RESOURCE, &tier_doc(1))
            .with_str(
                ROLE_MAP_RESOURCE,
                r#"[{"department": "Finance", "role": "Analyst", "file_id": "fin_analyst"}]"#,
            )
            .with_str(
                DEPARTMENT_LIST_RESOURCE,
                r#"[{"department": "Finance", "slug": "finance"}]"#,
            )
            .with(TOPIC_INDEX_RESOURCE, index)
            .with(TOPIC_BLOB_RESOURCE, blob)
    }

    #[test]
    fn test_topic_text_roundtrip() {
        let catalog = TopicRoutingCatalog::new(fixture());
        assert_eq!(catalog.topic_text(0).unwrap().as_deref(), Some("hello"));
        assert_eq!(
            catalog.topic_text(1).unwrap().as_deref(),
            Some("budget review")
        );
    }

    #[test]
    fn test_topic_text_soft_misses() {
        let catalog = TopicRoutingCatalog::new(fixture());
        // Negative id.
        assert_eq!(catalog.topic_text(-1).unwrap(), None);
        // Empty text.
        assert_eq!(catalog.topic_text(2).unwrap(), None);
        // Record pointing outside the blob.
        assert_eq!(catalog.topic_text(3).unwrap(), None);
        // Id past the index.
        assert_eq!(catalog.topic_text(4).unwrap(), None);
        assert_eq!(catalog.topic_text(i64::MAX).unwrap(), None);
    }

    #[test]
    fn test_map_lookups_are_case_insensitive() {
        let catalog = TopicRoutingCatalog::new(fixture());
        assert_eq!(
            catalog.role_file_id("FINANCE", "analyst").unwrap().as_deref(),
            Some("fin_analyst")
        );
        assert_eq!(
            catalog.department_slug("Finance").unwrap().as_deref(),
            Some("finance")
        );
        assert_eq!(catalog.department_slug("Legal").unwrap(), None);
    }

    #[test]
    fn test_missing_required_resource_is_fatal() {
        let provider = InMemoryResources::new().with_str(CORE_TIERS_RESOURCE, "{}");
        let catalog = TopicRoutingCatalog::new(provider);
        let err = catalog.topic_text(0).unwrap_err();
        assert!(matches!(err, CatalogError::MissingResource(_)));
    }

    #[test]
    fn test_malformed_required_resource_is_fatal() {
        let mut provider = fixture();
        provider.insert(CORE_TIERS_RESOURCE, b"not json".to_vec());
        let catalog = TopicRoutingCatalog::new(provider);
        let err = catalog.core_routing().unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResource { .. }));
    }

    #[test]
    fn test_companion_documents_memoize_soft_misses() {
        let provider = fixture().with_str("routing/dept_finance.json", &tier_doc(7));
        let catalog = TopicRoutingCatalog::new(provider);

        let tier = catalog.department_routing("Finance").unwrap().unwrap();
        assert_eq!(tier.send.both, vec![7]);
        // Case-insensitive cache key: same entry, no second parse observable.
        assert!(catalog.department_routing("FINANCE").unwrap().is_some());

        // Absent companion is a cached soft miss, not an error.
        assert!(catalog.role_routing("fin_analyst").unwrap().is_none());
        assert!(catalog.role_routing("fin_analyst").unwrap().is_none());

        let (dept_stats, role_stats) = catalog.cache_stats();
        assert_eq!(dept_stats.len, 1);
        assert_eq!(role_stats.len, 1);
    }

    #[test]
    fn test_role_companion_document() {
        let provider = fixture().with_str("routing/role_fin_analyst.json", &tier_doc(9));
        let catalog = TopicRoutingCatalog::new(provider);
        let tier = catalog.role_routing("FIN_ANALYST").unwrap().unwrap();
        assert_eq!(tier.receive.both, vec![9]);
    }

    #[test]
    fn test_suffix_mangled_resource_names_resolve() {
        let mut provider = InMemoryResources::new();
        for name in [
            CORE_TIERS_RESOURCE,
            ROLE_MAP_RESOURCE,
            DEPARTMENT_LIST_RESOURCE,
        ] {
            let source = fixture().read(name).unwrap().unwrap();
            provider.insert(format!("bundle.g_abc123.{name}"), source);
        }
        for name in [TOPIC_INDEX_RESOURCE, TOPIC_BLOB_RESOURCE] {
            let source = fixture().read(name).unwrap().unwrap();
            provider.insert(format!("bundle.g_abc123.{name}"), source);
        }
        let catalog = TopicRoutingCatalog::new(provider);
        assert_eq!(catalog.topic_text(0).unwrap().as_deref(), Some("hello"));
        assert!(catalog.department_slug("finance").unwrap().is_some());
    }
}
