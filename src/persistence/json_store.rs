// Copyright 2026 Campus Registry Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JSON file snapshot store.
//!
//! Persists the registry as two pretty-printed JSON files, `users.json` and
//! `events.json`, under a data directory. An advisory lock on `.lock` guards
//! the directory against a second registry process. Writes go through a
//! temporary file and rename so a crashed save never truncates the previous
//! snapshot.

use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{PersistenceError, Snapshot, SnapshotStore};
use crate::registry_core::models::{Event, EventId, User, UserId};

const USERS_FILE: &str = "users.json";
const EVENTS_FILE: &str = "events.json";
const LOCK_FILE: &str = ".lock";

pub struct JsonSnapshotStore {
    data_dir: PathBuf,
    // Held for the lifetime of the store; dropping releases the lock.
    _lock: File,
}

impl JsonSnapshotStore {
    /// Open (creating the directory if needed) and take the advisory lock.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(data_dir.join(LOCK_FILE))?;
        lock.try_lock_exclusive().map_err(|e| {
            // Contention is the only case reported as Locked; permission or
            // disk errors stay I/O errors.
            if e.kind() == io::ErrorKind::WouldBlock {
                warn!(dir = %data_dir.display(), "data directory already locked");
                PersistenceError::Locked
            } else {
                PersistenceError::Io(e)
            }
        })?;

        debug!(dir = %data_dir.display(), "opened json snapshot store");
        Ok(Self {
            data_dir,
            _lock: lock,
        })
    }

    fn read_map<K, V>(&self, name: &str) -> Result<Option<BTreeMap<K, V>>, PersistenceError>
    where
        K: serde::de::DeserializeOwned + Ord,
        V: serde::de::DeserializeOwned,
    {
        let path = self.data_dir.join(name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn write_atomic(&self, name: &str, payload: &str) -> Result<(), PersistenceError> {
        let tmp = self.data_dir.join(format!("{name}.tmp"));
        let dest = self.data_dir.join(name);
        {
            let mut f = File::create(&tmp)?;
            f.write_all(payload.as_bytes())?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &dest)?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let users: Option<BTreeMap<UserId, User>> = self.read_map(USERS_FILE)?;
        let events: Option<BTreeMap<EventId, Event>> = self.read_map(EVENTS_FILE)?;
        match (users, events) {
            (None, None) => Ok(None),
            (users, events) => Ok(Some(Snapshot {
                users: users.unwrap_or_default(),
                events: events.unwrap_or_default(),
            })),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let users = serde_json::to_string_pretty(&snapshot.users)?;
        let events = serde_json::to_string_pretty(&snapshot.events)?;
        self.write_atomic(USERS_FILE, &users)?;
        self.write_atomic(EVENTS_FILE, &events)?;
        debug!(
            users = snapshot.users.len(),
            events = snapshot.events.len(),
            "snapshot saved"
        );
        Ok(())
    }
}
