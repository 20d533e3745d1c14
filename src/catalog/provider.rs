//! Resource provider seam for the routing catalog.

use std::io;

/// Source of named catalog resources.
///
/// Implementations must be cheap to query repeatedly; the catalog reads each
/// resource at most once and caches the parsed result.
pub trait ResourceProvider: Send + Sync {
    /// Read a resource by exact name. `Ok(None)` means the name is absent.
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Full manifest of available resource names.
    ///
    /// Used for the suffix-match fallback when an exact name misses.
    fn names(&self) -> io::Result<Vec<String>>;
}

/// Resolve a resource name, tolerating manifest prefix mangling.
///
/// Build systems that embed resources may prefix or otherwise mangle names;
/// when the exact name misses, the first manifest entry ending with the
/// requested name is used instead.
pub(crate) fn resolve(
    provider: &dyn ResourceProvider,
    name: &str,
) -> io::Result<Option<Vec<u8>>> {
    if let Some(bytes) = provider.read(name)? {
        return Ok(Some(bytes));
    }
    for candidate in provider.names()? {
        if candidate != name && candidate.ends_with(name) {
            return provider.read(&candidate);
        }
    }
    Ok(None)
}
