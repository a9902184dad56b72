use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gemstore_core::DesiredItemList;
use gemstore_logging::{gem_debug, gem_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("directory missing or not writable: {0}")]
    Directory(String),
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Ensure the directory exists; create if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::Directory(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::Directory(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::Directory(e.to_string()))?;
    }
    Ok(())
}

/// Atomically replace `path` by writing a sibling temp file then renaming it.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), PersistError> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    ensure_dir(dir)?;
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistError::io(dir, e))?;
    let tmp_path = tmp.path().to_path_buf();
    tmp.write_all(content.as_bytes())
        .map_err(|e| PersistError::io(&tmp_path, e))?;
    tmp.flush().map_err(|e| PersistError::io(&tmp_path, e))?;
    tmp.as_file_mut()
        .sync_all()
        .map_err(|e| PersistError::io(&tmp_path, e))?;
    tmp.persist(path).map_err(|e| PersistError::io(path, e.error))?;
    Ok(())
}

/// Last-seen revision timestamp between runs.
pub trait StateStore: Send + Sync {
    /// `None` when nothing has been recorded yet.
    fn load(&self) -> Result<Option<String>, PersistError>;
    fn save(&self, timestamp: &str) -> Result<(), PersistError>;
}

/// Source of the user's watch list.
pub trait WatchListSource: Send + Sync {
    fn load(&self) -> Result<DesiredItemList, PersistError>;
}

/// Single-line text file holding the last-seen timestamp.
///
/// Overlapping runs are not coordinated; two processes racing on the same file
/// can double-notify or miss an update.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let value = text.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                gem_debug!("No run state at {:?}; treating as first run", self.path);
                Ok(None)
            }
            Err(err) => Err(PersistError::io(&self.path, err)),
        }
    }

    fn save(&self, timestamp: &str) -> Result<(), PersistError> {
        write_atomic(&self.path, &format!("{timestamp}\n"))
    }
}

/// Newline-delimited watch list; see [`DesiredItemList::parse`].
#[derive(Debug, Clone)]
pub struct FileWatchListSource {
    path: PathBuf,
}

impl FileWatchListSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WatchListSource for FileWatchListSource {
    fn load(&self) -> Result<DesiredItemList, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(DesiredItemList::parse(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                gem_warn!(
                    "Watch list {:?} not found; nothing will match this run",
                    self.path
                );
                Ok(DesiredItemList::default())
            }
            Err(err) => Err(PersistError::io(&self.path, err)),
        }
    }
}
