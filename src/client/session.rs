use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::auth::dto::AuthResponse;

use super::error::ClientError;

pub const DEFAULT_SESSION_FILE: &str = ".recipebox_session.json";

/// Logged-in identity kept between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

impl From<AuthResponse> for Session {
    fn from(r: AuthResponse) -> Self {
        Self {
            token: r.token,
            user_id: r.user_id,
            username: r.username,
        }
    }
}

/// JSON file holding the current session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file means "logged out".
    pub fn load(&self) -> Option<Session> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read session file");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt session file");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        write_private(&self.path, &serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    /// Removes the session and the cached search results.
    pub fn clear(&self) -> Result<(), ClientError> {
        remove_if_present(&self.path)?;
        remove_if_present(&self.results_path())
    }

    /// Sibling file holding the cards of the last search,
    /// e.g. `.recipebox_session.results.json`.
    pub fn results_path(&self) -> PathBuf {
        self.path.with_extension("results.json")
    }

    pub fn save_results(&self, cards: &Value) -> Result<(), ClientError> {
        write_private(&self.results_path(), &serde_json::to_vec(cards)?)?;
        Ok(())
    }

    /// Card with the given id from the last search, if any.
    pub fn find_card(&self, recipe_id: i64) -> Option<Value> {
        let raw = fs::read_to_string(self.results_path()).ok()?;
        let cards: Value = serde_json::from_str(&raw).ok()?;
        cards
            .as_array()?
            .iter()
            .find(|c| c.get("id").and_then(Value::as_i64) == Some(recipe_id))
            .cloned()
    }
}

fn remove_if_present(path: &Path) -> Result<(), ClientError> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Writes `bytes` readable by the owner only; the file holds a bearer token.
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    // mode() only applies when the file is created
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)
}
