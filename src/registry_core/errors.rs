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

//! Typed outcomes for registry operations.
//!
//! Every failure is a recoverable, local result returned to the caller; the
//! core never panics or terminates the process on these. Rendering is the
//! presentation layer's job.

use thiserror::Error;

use crate::persistence::PersistenceError;
use crate::registry_core::auth::Action;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// No actor is logged in for an operation that requires one.
    #[error("not logged in")]
    NotLoggedIn,

    /// The authenticated actor's role does not permit the action.
    #[error("access denied: {action:?} not permitted for this role")]
    Denied { action: Action },

    /// The referenced user or event id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed or out-of-range field: empty required text, non-positive
    /// capacity, or an impossible calendar date.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The event's attendee set is already at max_capacity.
    #[error("event is at full capacity")]
    CapacityExceeded,

    #[error("already registered for this event")]
    AlreadyRegistered,

    #[error("not registered for this event")]
    NotRegistered,

    /// The snapshot write failed. The in-memory mutation has still taken
    /// effect; durability is not guaranteed until the next successful save.
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl RegistryError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(id.to_string())
    }
}
