//! Saving a session's cart to a local JSON file.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::CartState;
use crate::error::CommerceError;
use crate::ids::SessionId;
use crate::money::Currency;

/// A cart together with the session it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSnapshot {
    pub session_id: SessionId,
    /// When the snapshot was last written.
    pub saved_at: DateTime<Utc>,
    pub state: CartState,
}

impl CartSnapshot {
    /// Start a new session with an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            session_id: SessionId::generate(),
            saved_at: Utc::now(),
            state: CartState::new(currency),
        }
    }
}

/// A cart snapshot stored at a fixed path.
#[derive(Debug, Clone)]
pub struct CartFile {
    path: PathBuf,
}

impl CartFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, `None` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<CartSnapshot>, CommerceError> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CommerceError::Persistence(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        let snapshot: CartSnapshot = serde_json::from_slice(&content)?;
        snapshot.state.validate().map_err(|e| {
            CommerceError::Persistence(format!("invalid cart in {}: {e}", self.path.display()))
        })?;
        debug!(
            path = %self.path.display(),
            session_id = %snapshot.session_id,
            lines = snapshot.state.len(),
            "loaded cart"
        );
        Ok(Some(snapshot))
    }

    /// Read the snapshot or start a fresh session.
    pub fn load_or_new(&self, currency: Currency) -> Result<CartSnapshot, CommerceError> {
        Ok(self.load()?.unwrap_or_else(|| CartSnapshot::new(currency)))
    }

    /// Write the snapshot, replacing the previous file atomically.
    pub fn save(&self, snapshot: &mut CartSnapshot) -> Result<(), CommerceError> {
        snapshot.saved_at = Utc::now();

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, &*snapshot)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .map_err(|e| CommerceError::Persistence(e.error.to_string()))?;

        debug!(
            path = %self.path.display(),
            session_id = %snapshot.session_id,
            lines = snapshot.state.len(),
            "saved cart"
        );
        Ok(())
    }

    /// Delete the saved cart. Returns whether a file existed.
    pub fn remove(&self) -> Result<bool, CommerceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
