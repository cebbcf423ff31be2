//! Two-tier session persistence.
//!
//! The durable tier is a JSON file on disk and survives process restarts;
//! the ephemeral tier lives in process memory and dies with the client.
//! Exactly one tier is written per save, chosen by the caller's `remember`
//! flag. When both tiers hold a session the ephemeral one wins: a
//! session-scoped login is the more recent, deliberate act and overrides a
//! remembered one for the life of the process.

use std::fs;
use std::path::PathBuf;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::models::Profile;

/// Token plus cached profile, as persisted between runs.
///
/// The profile here is a cache for instant restarts; the authoritative
/// copy is always the last server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: Profile,
}

/// Two-tier store for the current session
#[derive(Debug)]
pub struct SessionStore {
    file: PathBuf,
    ephemeral: RwLock<Option<StoredSession>>,
}

impl SessionStore {
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            ephemeral: RwLock::new(None),
        }
    }

    /// Persist a session in exactly one tier.
    ///
    /// A durable save supersedes any session-scoped login, so the
    /// ephemeral tier is dropped; an ephemeral save leaves the durable
    /// file alone for the next process. A failed durable write falls back
    /// to the ephemeral tier so the running session keeps its credential.
    pub fn save(&self, token: &str, user: &Profile, persistent: bool) {
        let session = StoredSession {
            token: token.to_string(),
            user: user.clone(),
        };

        if persistent {
            match self.write_file(&session) {
                Ok(()) => *self.ephemeral.write() = None,
                Err(e) => {
                    tracing::warn!("Failed to write session file: {}", e);
                    *self.ephemeral.write() = Some(session);
                }
            }
        } else {
            *self.ephemeral.write() = Some(session);
        }
    }

    /// Current session, ephemeral tier first.
    pub fn load(&self) -> Option<StoredSession> {
        if let Some(session) = self.ephemeral.read().clone() {
            return Some(session);
        }
        self.read_file()
    }

    /// Current bearer token, if any. Read on every outgoing request.
    pub fn token(&self) -> Option<String> {
        self.load().map(|s| s.token)
    }

    /// Refresh the cached profile in whichever tier currently holds the
    /// session, leaving the token untouched.
    pub fn update_profile(&self, user: &Profile) {
        let mut ephemeral = self.ephemeral.write();
        if let Some(session) = ephemeral.as_mut() {
            session.user = user.clone();
            return;
        }
        drop(ephemeral);

        if let Some(mut session) = self.read_file() {
            session.user = user.clone();
            if let Err(e) = self.write_file(&session) {
                tracing::warn!("Failed to refresh cached profile: {}", e);
            }
        }
    }

    /// Remove the session from both tiers. Idempotent; a missing file is
    /// not an error.
    pub fn clear(&self) {
        *self.ephemeral.write() = None;
        if let Err(e) = fs::remove_file(&self.file) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove session file: {}", e);
            }
        }
    }

    fn write_file(&self, session: &StoredSession) -> std::io::Result<()> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.file, json)
    }

    fn read_file(&self) -> Option<StoredSession> {
        let raw = match fs::read_to_string(&self.file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read session file: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                // A corrupt session file must never crash the caller; it
                // just means logging in again.
                tracing::warn!("Ignoring malformed session file: {}", e);
                None
            }
        }
    }
}
