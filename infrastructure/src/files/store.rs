//! Filesystem boundary for the file set.
//!
//! The core only handles relative path → content maps. [`FileSetStore`]
//! turns an existing project directory into such a map and writes a
//! delivered map back out.

use foundry_domain::FileSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Files larger than this are not loaded (1 MB).
const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Directories never loaded into the file set.
const SKIPPED_DIRS: [&str; 5] = [".git", "target", "node_modules", "__pycache__", ".venv"];

#[derive(Error, Debug)]
pub enum FileStoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to write outside the output directory: {0}")]
    UnsafePath(String),
}

impl FileStoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Loads and writes file sets rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileSetStore {
    root: PathBuf,
}

impl FileSetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every UTF-8 text file under the root.
    ///
    /// Hidden entries, build output directories, oversized and binary
    /// files are skipped. Keys use `/` separators. A missing root loads
    /// as an empty set.
    pub fn load(&self) -> Result<FileSet, FileStoreError> {
        let mut files = FileSet::new();
        if !self.root.exists() {
            return Ok(files);
        }
        self.load_dir(&self.root, &mut files)?;
        debug!(root = %self.root.display(), files = files.len(), "Loaded file set");
        Ok(files)
    }

    fn load_dir(&self, dir: &Path, files: &mut FileSet) -> Result<(), FileStoreError> {
        let entries = fs::read_dir(dir).map_err(|e| FileStoreError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| FileStoreError::io(dir, e))?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                continue;
            }

            let file_type = entry.file_type().map_err(|e| FileStoreError::io(&path, e))?;
            if file_type.is_dir() {
                self.load_dir(&path, files)?;
            } else if file_type.is_file() {
                let size = entry
                    .metadata()
                    .map_err(|e| FileStoreError::io(&path, e))?
                    .len();
                if size > MAX_FILE_SIZE {
                    debug!(path = %path.display(), size, "Skipping oversized file");
                    continue;
                }
                match fs::read_to_string(&path) {
                    Ok(content) => {
                        files.insert(self.relative_key(&path), content);
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                        debug!(path = %path.display(), "Skipping non-UTF-8 file");
                    }
                    Err(e) => return Err(FileStoreError::io(&path, e)),
                }
            }
        }
        Ok(())
    }

    fn relative_key(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Write every file under the root, creating directories as needed.
    ///
    /// Returns the written paths. Absolute paths and `..` components are
    /// rejected before anything is written.
    pub fn write(&self, files: &FileSet) -> Result<Vec<PathBuf>, FileStoreError> {
        let targets = files
            .iter()
            .map(|(relative, content)| Ok((self.resolve(relative)?, content)))
            .collect::<Result<Vec<_>, FileStoreError>>()?;

        let mut written = Vec::with_capacity(targets.len());
        for (path, content) in targets {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| FileStoreError::io(parent, e))?;
            }
            fs::write(&path, content).map_err(|e| FileStoreError::io(&path, e))?;
            written.push(path);
        }

        debug!(root = %self.root.display(), files = written.len(), "Wrote file set");
        Ok(written)
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, FileStoreError> {
        let relative_path = Path::new(relative);
        let safe = !relative.trim().is_empty()
            && relative_path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            warn!("Rejected unsafe output path: {}", relative);
            return Err(FileStoreError::UnsafePath(relative.to_string()));
        }
        Ok(self.root.join(relative_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_skips_hidden_and_build_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/bin")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::write(root.join("Cargo.toml"), "[package]").unwrap();
        fs::write(root.join("src/bin/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();
        fs::write(root.join("target/debug/out"), "bin").unwrap();
        fs::write(root.join("image.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let files = FileSetStore::new(root).load().unwrap();
        let keys: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Cargo.toml", "src/bin/main.rs"]);
        assert_eq!(files["src/bin/main.rs"], "fn main() {}");
    }

    #[test]
    fn test_load_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileSetStore::new(dir.path().join("absent")).load().unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSetStore::new(dir.path().join("out"));
        let mut files = FileSet::new();
        files.insert("README.md".to_string(), "# demo".to_string());
        files.insert("src/lib.rs".to_string(), "pub fn f() {}".to_string());

        let written = store.write(&files).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(store.load().unwrap(), files);
    }

    #[test]
    fn test_write_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSetStore::new(dir.path().join("out"));
        for bad in ["../evil.sh", "/etc/passwd", "a/../../b", ""] {
            let mut files = FileSet::new();
            files.insert("ok.txt".to_string(), "fine".to_string());
            files.insert(bad.to_string(), "nope".to_string());
            let err = store.write(&files).unwrap_err();
            assert!(matches!(err, FileStoreError::UnsafePath(_)), "{}", bad);
        }
        // Nothing is written when any path is rejected
        assert!(!dir.path().join("out").exists());
    }
}
