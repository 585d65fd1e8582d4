//! Persistence of the last-built outline.
//!
//! A rebuild overwrites the cached tree wholesale; a view reads it back
//! without touching the pipeline. Loading never fails: a missing,
//! unreadable or corrupt cache is simply a miss.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::hierarchy::TreeNode;

/// Storage for the last-built outline.
pub trait StructureCache: Send + Sync {
    /// Replace the cached tree.
    fn save(&self, tree: &[TreeNode]) -> Result<()>;

    /// The cached tree, `None` on a miss.
    fn load(&self) -> Option<Vec<TreeNode>>;
}

/// JSON file cache with atomic replacement.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    /// Cache stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StructureCache for JsonFileCache {
    fn save(&self, tree: &[TreeNode]) -> Result<()> {
        let content = serde_json::to_string_pretty(tree)?;
        write_atomic(&self.path, &content)?;
        debug!(path = %self.path.display(), n_nodes = tree.len(), "outline cached");
        Ok(())
    }

    fn load(&self) -> Option<Vec<TreeNode>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "outline cache unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(tree) => Some(tree),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "outline cache corrupt, ignoring");
                None
            }
        }
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .and_then(|x| x.to_str())
        .ok_or_else(|| Error::Other(format!("invalid cache file name: {}", path.display())))?;
    let tmp_path = parent.join(format!(".{file_name}.tmp.{}", uuid::Uuid::new_v4().simple()));

    {
        let mut tmp = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp_path)?;
        tmp.write_all(content.as_bytes())?;
        tmp.sync_all()?;
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::from(err));
    }

    if let Ok(dir) = fs::File::open(parent) {
        let _ = dir.sync_all();
    }
    Ok(())
}

/// In-process cache, last write wins.
#[derive(Debug, Default)]
pub struct MemoryCache {
    tree: RwLock<Option<Vec<TreeNode>>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached tree.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.tree.write() {
            *guard = None;
        }
    }
}

impl StructureCache for MemoryCache {
    fn save(&self, tree: &[TreeNode]) -> Result<()> {
        let mut guard = self
            .tree
            .write()
            .map_err(|_| Error::Other("outline cache lock poisoned".into()))?;
        *guard = Some(tree.to_vec());
        Ok(())
    }

    fn load(&self) -> Option<Vec<TreeNode>> {
        self.tree.read().ok().and_then(|guard| guard.clone())
    }
}
