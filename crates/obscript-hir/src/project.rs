//! Source keys and stable file ids.

use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Identifies an open file within one [`Database`](crate::Database).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// Canonical key for a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    /// File-backed source, normalized.
    Path(PathBuf),
    /// An editor buffer or a non-file URI.
    Virtual(String),
}

impl SourceKey {
    /// Create a file-backed source key.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        SourceKey::Path(normalize_path(path.as_ref()))
    }

    /// Create a virtual source key.
    pub fn from_virtual(name: impl Into<String>) -> Self {
        SourceKey::Virtual(name.into())
    }

    /// Create a key from a URI: `file://` URIs become paths.
    pub fn from_uri(uri: &str) -> Self {
        match uri.strip_prefix("file://") {
            Some(path) => Self::from_path(path),
            None => Self::from_virtual(uri),
        }
    }

    /// Render the key as a display string.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            SourceKey::Path(path) => path.to_string_lossy().to_string(),
            SourceKey::Virtual(name) => name.clone(),
        }
    }
}

/// Assigns file ids to source keys. Ids are never reused.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    next_id: u32,
    ids_by_key: FxHashMap<SourceKey, FileId>,
    keys_by_id: FxHashMap<FileId, SourceKey>,
}

impl SourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a file id from a source key.
    #[must_use]
    pub fn file_id_for_key(&self, key: &SourceKey) -> Option<FileId> {
        self.ids_by_key.get(key).copied()
    }

    /// Resolve a source key from a file id.
    #[must_use]
    pub fn key_for_file_id(&self, file_id: FileId) -> Option<&SourceKey> {
        self.keys_by_id.get(&file_id)
    }

    /// Ensure a file id exists for the key (allocate if missing).
    pub fn ensure_file_id(&mut self, key: SourceKey) -> FileId {
        if let Some(existing) = self.ids_by_key.get(&key).copied() {
            return existing;
        }
        let file_id = FileId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.ids_by_key.insert(key.clone(), file_id);
        self.keys_by_id.insert(file_id, key);
        file_id
    }

    /// Remove a source key and return its file id.
    pub fn remove(&mut self, key: &SourceKey) -> Option<FileId> {
        let file_id = self.ids_by_key.remove(key)?;
        self.keys_by_id.remove(&file_id);
        Some(file_id)
    }

    /// Iterate registered keys and ids.
    pub fn iter(&self) -> impl Iterator<Item = (&SourceKey, FileId)> {
        self.ids_by_key.iter().map(|(key, id)| (key, *id))
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids_by_key.len()
    }

    /// Returns `true` if no key is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids_by_key.is_empty()
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canon) = path.canonicalize() {
        return canon;
    }
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            _ => normalized.push(component.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable_and_not_reused() {
        let mut registry = SourceRegistry::new();
        let a = registry.ensure_file_id(SourceKey::from_virtual("untitled:1"));
        let b = registry.ensure_file_id(SourceKey::from_virtual("untitled:2"));
        assert_ne!(a, b);
        assert_eq!(
            registry.ensure_file_id(SourceKey::from_virtual("untitled:1")),
            a
        );

        assert_eq!(registry.remove(&SourceKey::from_virtual("untitled:1")), Some(a));
        let c = registry.ensure_file_id(SourceKey::from_virtual("untitled:1"));
        assert_ne!(c, a);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_uri_keys() {
        assert_eq!(
            SourceKey::from_uri("untitled:Untitled-1"),
            SourceKey::Virtual("untitled:Untitled-1".into())
        );
        let key = SourceKey::from_uri("file:///no/such/dir/../script.obs");
        assert_eq!(key, SourceKey::Path(PathBuf::from("/no/such/script.obs")));
    }
}
