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

//! Snapshot persistence seam.
//!
//! The registry core talks to storage exclusively through [`SnapshotStore`]:
//! one load at startup, one save after every successful mutation. Stores are
//! the logging layer for durability problems; the core only sees typed errors.

pub mod json_store;
pub mod memory;

pub use json_store::JsonSnapshotStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::registry_core::models::{Event, EventId, User, UserId};

/// Full persisted state at a point in time. BTreeMap keeps id order stable
/// across round trips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: BTreeMap<UserId, User>,
    pub events: BTreeMap<EventId, Event>,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("data directory is locked by another process")]
    Locked,
}

/// Storage provider for registry snapshots.
pub trait SnapshotStore {
    /// Load the last saved snapshot, or `None` if no data exists yet.
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;

    /// Persist the snapshot. Must complete or fail before returning; the
    /// caller surfaces failures but does not roll back in-memory state.
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}
