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

//! In-memory snapshot store for tests and ephemeral runs.

use super::{PersistenceError, Snapshot, SnapshotStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    last: Option<Snapshot>,
    /// When set, every save fails. Lets tests exercise the
    /// persistence-failure path without touching the filesystem.
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail, for persistence-failure tests.
    pub fn failing() -> Self {
        Self {
            last: None,
            fail_saves: true,
        }
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            last: Some(snapshot),
            fail_saves: false,
        }
    }

    pub fn last_saved(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        Ok(self.last.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::Io(std::io::Error::other(
                "save disabled by test",
            )));
        }
        self.last = Some(snapshot.clone());
        Ok(())
    }
}
