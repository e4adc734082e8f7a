use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the storage root.
pub const ROOT_ENV_VAR: &str = "BLOBLITE_ROOT";

/// Directory created under the user's home when no override is given.
pub const DEFAULT_ROOT_DIR_NAME: &str = ".bloblite_storage";

/// Resolve the default storage root.
///
/// Priority:
/// 1. `$BLOBLITE_ROOT` if set and non-empty
/// 2. `~/.bloblite_storage`
/// 3. `./.bloblite_storage` when no home directory can be found
pub fn default_root() -> PathBuf {
    resolve_root(std::env::var_os(ROOT_ENV_VAR), dirs::home_dir)
}

fn resolve_root(env_value: Option<OsString>, home: impl FnOnce() -> Option<PathBuf>) -> PathBuf {
    env_value
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            home()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_ROOT_DIR_NAME)
        })
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory anchoring every container.
    pub root: PathBuf,
}

impl StorageConfig {
    /// Configuration rooted at an explicit directory.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Configuration resolved from the environment (see [`default_root`]).
    pub fn from_env() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
