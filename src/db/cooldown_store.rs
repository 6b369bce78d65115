//! Durable per-user proposal cooldowns.
//!
//! The whole mapping lives in memory and is written to a single JSON file
//! after every mutation:
//!
//! ```text
//! { "<user id>": "<RFC 3339 timestamp>", ... }
//! ```
//!
//! A missing or unreadable file loads as an empty mapping.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serenity::all::UserId;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::bot::error::Error;
use crate::constants::timeouts::PERSIST_RETRY_DELAY_MILLIS;

/// Result of checking a user against the cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No recent accepted post; the entry now points at the new post
    Admitted,
    /// Last accepted post is too recent; nothing was recorded
    CoolingDown {
        last_post_at: DateTime<Utc>,
        remaining: chrono::Duration,
    },
}

pub struct CooldownStore {
    path: PathBuf,
    /// user_id -> last accepted post
    entries: DashMap<u64, DateTime<Utc>>,
    /// Serializes file writes so a later write always carries every earlier update
    write_lock: Mutex<()>,
}

impl CooldownStore {
    /// Load the store from `path`, treating a missing or corrupt file as empty
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load_entries(&path).into_iter().collect();

        Self {
            path,
            entries,
            write_lock: Mutex::new(()),
        }
    }

    /// Read the persisted mapping without building a store
    pub fn load_entries(path: &Path) -> HashMap<u64, DateTime<Utc>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cooldown file at {}, starting empty", path.display());
                return HashMap::new();
            }
            Err(e) => {
                warn!("Could not read cooldown file {}: {}", path.display(), e);
                return HashMap::new();
            }
        };

        match parse_entries(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Cooldown file {} is corrupt ({}), starting empty",
                    path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last accepted post time for a user
    pub fn get(&self, user_id: UserId) -> Option<DateTime<Utc>> {
        self.entries.get(&user_id.get()).map(|r| *r)
    }

    /// Record an accepted post and persist the mapping.
    ///
    /// Timestamps only move forward: an older `at` than the stored one is ignored.
    pub async fn set(&self, user_id: UserId, at: DateTime<Utc>) -> Result<(), Error> {
        let changed = match self.entries.entry(user_id.get()) {
            Entry::Occupied(mut entry) => {
                if at > *entry.get() {
                    entry.insert(at);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(at);
                true
            }
        };

        if changed {
            self.persist().await?;
        }
        Ok(())
    }

    /// Check the user against `cooldown` and, if eligible, record `now` in one step.
    ///
    /// Exactly `cooldown` elapsed counts as eligible. An error means the
    /// post was admitted in memory but the file could not be written.
    pub async fn admit(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Result<Verdict, Error> {
        let cooldown = chrono::Duration::from_std(cooldown).unwrap_or(chrono::Duration::MAX);

        let verdict = match self.entries.entry(user_id.get()) {
            Entry::Occupied(mut entry) => {
                let last_post_at = *entry.get();
                let elapsed = now - last_post_at;
                if elapsed >= cooldown {
                    entry.insert(now);
                    Verdict::Admitted
                } else {
                    Verdict::CoolingDown {
                        last_post_at,
                        remaining: cooldown.checked_sub(&elapsed).unwrap_or(cooldown),
                    }
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                Verdict::Admitted
            }
        };

        if verdict == Verdict::Admitted {
            self.persist().await?;
        }
        Ok(verdict)
    }

    /// Write the mapping to disk, retrying once on failure
    async fn persist(&self) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;

        match self.write_snapshot().await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    "Failed to save cooldowns to {}: {}, retrying once",
                    self.path.display(),
                    e
                );
                tokio::time::sleep(Duration::from_millis(PERSIST_RETRY_DELAY_MILLIS)).await;
                self.write_snapshot().await
            }
        }
    }

    async fn write_snapshot(&self) -> Result<(), Error> {
        let snapshot: BTreeMap<String, DateTime<Utc>> = self
            .entries
            .iter()
            .map(|entry| (entry.key().to_string(), *entry.value()))
            .collect();
        let json = serde_json::to_vec_pretty(&snapshot)?;

        // Write beside the target and rename so a crash never leaves half a file
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Saved {} cooldown entries", snapshot.len());
        Ok(())
    }
}

impl std::fmt::Debug for CooldownStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CooldownStore")
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// User ids are text keys on disk but must all be integers
fn parse_entries(raw: &str) -> Result<HashMap<u64, DateTime<Utc>>, Error> {
    let data: HashMap<String, DateTime<Utc>> = serde_json::from_str(raw)?;

    data.into_iter()
        .map(|(key, at)| {
            key.parse::<u64>()
                .map(|user_id| (user_id, at))
                .map_err(|_| Error::custom(format!("invalid user id key '{}'", key)))
        })
        .collect()
}
