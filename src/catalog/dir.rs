//! Directory-backed resource provider.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::provider::ResourceProvider;

/// Resource provider reading from a directory tree on disk.
///
/// Resource names are slash-separated paths relative to the root. This is the
/// only disk I/O in the crate, and the catalog performs it exactly once per
/// resource.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    /// Create a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collect_names(&self, dir: &Path, prefix: &str, out: &mut Vec<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            if entry.file_type()?.is_dir() {
                self.collect_names(&entry.path(), &relative, out)?;
            } else {
                out.push(relative);
            }
        }
        Ok(())
    }
}

impl ResourceProvider for DirResources {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.root.join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn names(&self) -> io::Result<Vec<String>> {
        let mut out = Vec::new();
        self.collect_names(&self.root, "", &mut out)?;
        out.sort();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_and_names_from_disk() {
        let dir = std::env::temp_dir().join(format!("corpus-kernel-test-{}", std::process::id()));
        fs::create_dir_all(dir.join("routing")).unwrap();
        fs::write(dir.join("routing/core.json"), b"{}").unwrap();

        let provider = DirResources::new(&dir);
        assert_eq!(provider.read("routing/core.json").unwrap().unwrap(), b"{}");
        assert!(provider.read("routing/missing.json").unwrap().is_none());
        assert!(provider
            .names()
            .unwrap()
            .contains(&"routing/core.json".to_string()));

        fs::remove_dir_all(&dir).unwrap();
    }
}
