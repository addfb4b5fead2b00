//! Persistent key-value storage for session state.
//!
//! The file store keeps one JSON object at
//! `~/.config/coursekit/state.json` (or `$XDG_CONFIG_HOME/coursekit/state.json`),
//! readable by the owner only.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

const APP_DIR_NAME: &str = "coursekit";
const STATE_FILE_NAME: &str = "state.json";

/// Errors for persisted state operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No suitable user config directory is available.
    #[error("unable to determine config directory (set XDG_CONFIG_HOME or HOME)")]
    ConfigDirUnavailable,
    /// Filesystem I/O failed.
    #[error("state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The state file is not a JSON object.
    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A value could not be encoded as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Storage seam for session state. Values are JSON.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Removes a value. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Value>> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.values().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.values().remove(key).is_some())
    }
}

/// Store backed by a single JSON file, rewritten on every change.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at the default location under the user config directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConfigDirUnavailable`] if no usable config dir is found.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(default_config_dir()?.join(STATE_FILE_NAME)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Value>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, values: &BTreeMap<String, Value>) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let text = serde_json::to_string_pretty(values).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(io_error)?;
        set_owner_only_permissions(&self.path).map_err(io_error)
    }

    fn modify<T>(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, Value>) -> T,
    ) -> Result<T, StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut values = self.load()?;
        let outcome = change(&mut values);
        self.save(&values)?;
        Ok(outcome)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.modify(|values| {
            values.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.modify(|values| values.remove(key).is_some())
    }
}

/// User config directory for the tool (`$XDG_CONFIG_HOME/coursekit` or
/// `~/.config/coursekit`).
///
/// # Errors
///
/// Returns [`StorageError::ConfigDirUnavailable`] if neither variable is set.
pub fn default_config_dir() -> Result<PathBuf, StorageError> {
    resolve_config_dir(
        sanitize_env_path(env::var_os("XDG_CONFIG_HOME")),
        sanitize_env_path(env::var_os("HOME")),
        sanitize_env_path(env::var_os("APPDATA")),
    )
}

fn sanitize_env_path(value: Option<OsString>) -> Option<PathBuf> {
    let value = value?;
    if value.to_string_lossy().trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(value))
}

fn resolve_config_dir(
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
    app_data: Option<PathBuf>,
) -> Result<PathBuf, StorageError> {
    if let Some(xdg) = xdg_config_home {
        return Ok(xdg.join(APP_DIR_NAME));
    }
    if let Some(home) = home {
        return Ok(home.join(".config").join(APP_DIR_NAME));
    }
    if let Some(app_data) = app_data {
        return Ok(app_data.join(APP_DIR_NAME));
    }
    Err(StorageError::ConfigDirUnavailable)
}

#[cfg(unix)]
fn set_owner_only_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn set_owner_only_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
