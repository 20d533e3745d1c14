//! In-memory resource provider for testing.

use std::collections::BTreeMap;
use std::io;

use super::provider::ResourceProvider;

/// In-memory resource provider for testing and fixtures.
///
/// Uses a BTreeMap for deterministic manifest order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResources {
    files: BTreeMap<String, Vec<u8>>,
}

impl InMemoryResources {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binary resource.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), bytes.into());
    }

    /// Builder-style binary resource.
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Builder-style text resource.
    pub fn with_str(self, name: impl Into<String>, text: &str) -> Self {
        self.with(name, text.as_bytes().to_vec())
    }
}

impl ResourceProvider for InMemoryResources {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.files.get(name).cloned())
    }

    fn names(&self) -> io::Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }
}
