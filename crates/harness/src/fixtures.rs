//! JSON fixture loading.
//!
//! Fixtures are plain JSON files looked up by exact filename inside a single
//! directory. Every call reads the file again; nothing is cached.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::FixtureError;

/// Response body for the Get scenario.
pub const USER_GET: &str = "user_get.json";
/// Request and response body for the Create scenario.
pub const USER_POST: &str = "user_post.json";
/// Request and response body for the Update scenario.
pub const USER_PUT: &str = "user_put.json";
/// Response body for the Delete scenario.
pub const USER_DELETE: &str = "user_delete.json";

/// Loads fixtures from a fixed directory.
#[derive(Debug, Clone)]
pub struct FixtureLoader {
    dir: PathBuf,
}

impl FixtureLoader {
    /// Creates a loader reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loader over the fixtures shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata"))
    }

    /// Loader over `dir` if given, otherwise the bundled set.
    pub fn from_dir_or_bundled(dir: Option<&Path>) -> Self {
        dir.map(Self::new).unwrap_or_else(Self::bundled)
    }

    /// The directory fixtures are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the bundled fixtures.
    pub fn names() -> [&'static str; 4] {
        [USER_GET, USER_POST, USER_PUT, USER_DELETE]
    }

    /// Resolves a fixture name to its path.
    ///
    /// Names must be a single non-empty path component so lookups never leave
    /// the fixture directory.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, FixtureError> {
        let is_plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !is_plain {
            return Err(FixtureError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(name))
    }

    /// Returns the full text of the named fixture.
    pub fn load(&self, name: &str) -> Result<String, FixtureError> {
        let path = self.path_for(name)?;
        debug!(fixture = %name, path = %path.display(), "Loading fixture");

        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => FixtureError::NotFound {
                name: name.to_string(),
                path,
            },
            _ => FixtureError::Unreadable {
                name: name.to_string(),
                source,
            },
        })
    }

    /// Loads the named fixture and parses it as JSON.
    pub fn load_json(&self, name: &str) -> Result<Value, FixtureError> {
        let text = self.load(name)?;
        serde_json::from_str(&text).map_err(|source| FixtureError::Malformed {
            name: name.to_string(),
            source,
        })
    }
}

impl Default for FixtureLoader {
    fn default() -> Self {
        Self::bundled()
    }
}
