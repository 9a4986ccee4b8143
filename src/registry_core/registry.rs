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

//! Registry service.
//!
//! The central brain of the registry: it owns the user and event maps,
//! enforces authorization and the capacity/uniqueness invariants, and
//! snapshots state through the persistence seam after every mutation.
//! It returns typed outcomes and never prints or logs; rendering belongs
//! to the presentation layer.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::persistence::{Snapshot, SnapshotStore};
use crate::query::engine as query;
use crate::registry_core::auth::{can, Action};
use crate::registry_core::errors::{RegistryError, RegistryResult};
use crate::registry_core::models::{
    Event, EventDraft, EventId, EventPatch, Role, Stats, User, UserId,
};

/// The in-memory aggregate: all users and events plus the active actor.
///
/// Single-session model: zero or one authenticated actor at a time. Every
/// gated operation resolves the actor once, so the permission check and the
/// mutation observe the same identity. All mutating operations take
/// `&mut self`, which makes the compound invariants (capacity check then
/// append, id assignment) race-free in-process by construction.
pub struct Registry {
    users: BTreeMap<UserId, User>,
    events: BTreeMap<EventId, Event>,
    next_user: u32,
    next_event: u32,
    current_actor: Option<UserId>,
    store: Box<dyn SnapshotStore>,
}

impl Registry {
    /// Build a registry over a store, loading the last snapshot if one
    /// exists. Id counters resume above the highest id seen so identifiers
    /// are never reused, even across restarts and deletions.
    pub fn open(store: Box<dyn SnapshotStore>) -> RegistryResult<Self> {
        let snapshot = store.load()?.unwrap_or_default();
        let next_user = snapshot
            .users
            .keys()
            .map(|id| id.index())
            .max()
            .unwrap_or(0)
            + 1;
        let next_event = snapshot
            .events
            .keys()
            .map(|id| id.index())
            .max()
            .unwrap_or(0)
            + 1;
        Ok(Self {
            users: snapshot.users,
            events: snapshot.events,
            next_user,
            next_event,
            current_actor: None,
            store,
        })
    }

    // ---- session ----

    /// Set the current actor if the id exists. Possession of the identifier
    /// is the whole credential; there is no password check.
    pub fn login(&mut self, user_id: UserId) -> bool {
        if self.users.contains_key(&user_id) {
            self.current_actor = Some(user_id);
            true
        } else {
            false
        }
    }

    /// Clear the current actor. Idempotent.
    pub fn logout(&mut self) {
        self.current_actor = None;
    }

    pub fn current_actor(&self) -> Option<&User> {
        self.current_actor.and_then(|id| self.users.get(&id))
    }

    /// Resolve the logged-in actor's id and role, or refuse.
    fn require_actor(&self) -> RegistryResult<(UserId, Role)> {
        let id = self.current_actor.ok_or(RegistryError::NotLoggedIn)?;
        let user = self
            .users
            .get(&id)
            .ok_or_else(|| RegistryError::not_found(id))?;
        Ok((id, user.role))
    }

    fn require_permission(&self, action: Action) -> RegistryResult<(UserId, Role)> {
        let (id, role) = self.require_actor()?;
        if can(role, action) {
            Ok((id, role))
        } else {
            Err(RegistryError::Denied { action })
        }
    }

    // ---- mutations ----

    /// Self-service signup; no actor required and no validation beyond the
    /// closed role set (the type already guarantees that). The new id is
    /// sequential and never reassigned.
    pub fn register_user(
        &mut self,
        username: &str,
        role: Role,
        email: Option<String>,
    ) -> RegistryResult<UserId> {
        let id = UserId::new(self.next_user);
        self.next_user += 1;
        self.users.insert(id, User::new(id, username, role, email));
        self.persist()?;
        Ok(id)
    }

    /// Create an event owned by the current actor.
    pub fn create_event(&mut self, draft: EventDraft) -> RegistryResult<EventId> {
        let (actor_id, _) = self.require_permission(Action::CreateEvent)?;
        validate_text("name", &draft.name)?;
        validate_text("description", &draft.description)?;
        validate_text("time", &draft.time)?;
        validate_text("location", &draft.location)?;
        if draft.max_capacity == 0 {
            return Err(RegistryError::InvalidInput(
                "maximum capacity must be greater than 0".into(),
            ));
        }

        let id = EventId::new(self.next_event);
        self.next_event += 1;
        let event = Event {
            id,
            name: draft.name,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            max_capacity: draft.max_capacity,
            organizer: actor_id,
            attendees: Vec::new(),
            created_at: Utc::now(),
        };
        self.events.insert(id, event);
        if let Some(actor) = self.users.get_mut(&actor_id) {
            actor.created_events.push(id);
        }
        self.persist()?;
        Ok(id)
    }

    /// Apply only the supplied fields; absent fields stay untouched.
    pub fn update_event(&mut self, event_id: EventId, patch: EventPatch) -> RegistryResult<()> {
        self.require_permission(Action::UpdateEvent)?;
        if !self.events.contains_key(&event_id) {
            return Err(RegistryError::not_found(event_id));
        }
        if let Some(name) = &patch.name {
            validate_text("name", name)?;
        }
        if let Some(description) = &patch.description {
            validate_text("description", description)?;
        }
        if let Some(time) = &patch.time {
            validate_text("time", time)?;
        }
        if let Some(location) = &patch.location {
            validate_text("location", location)?;
        }
        if patch.max_capacity == Some(0) {
            return Err(RegistryError::InvalidInput(
                "maximum capacity must be greater than 0".into(),
            ));
        }

        let event = self
            .events
            .get_mut(&event_id)
            .ok_or_else(|| RegistryError::not_found(event_id))?;
        if let Some(name) = patch.name {
            event.name = name;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(time) = patch.time {
            event.time = time;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(cap) = patch.max_capacity {
            event.max_capacity = cap;
        }
        self.persist()
    }

    /// Remove the event and cascade the id out of every user's created and
    /// registered sets, so no dangling reference stays reachable.
    pub fn delete_event(&mut self, event_id: EventId) -> RegistryResult<()> {
        self.require_permission(Action::DeleteEvent)?;
        if self.events.remove(&event_id).is_none() {
            return Err(RegistryError::not_found(event_id));
        }
        for user in self.users.values_mut() {
            user.created_events.retain(|id| *id != event_id);
            user.registered_events.retain(|id| *id != event_id);
        }
        self.persist()
    }

    /// Register the current actor as an attendee.
    pub fn register_for_event(&mut self, event_id: EventId) -> RegistryResult<()> {
        let (actor_id, _) = self.require_permission(Action::Register)?;
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or_else(|| RegistryError::not_found(event_id))?;
        // Capacity is checked before the duplicate check, matching the
        // observed precedence when both conditions hold.
        if event.is_full() {
            return Err(RegistryError::CapacityExceeded);
        }
        if event.has_attendee(actor_id) {
            return Err(RegistryError::AlreadyRegistered);
        }
        // Both sides of the membership update, then one snapshot.
        event.attendees.push(actor_id);
        if let Some(actor) = self.users.get_mut(&actor_id) {
            actor.registered_events.push(event_id);
        }
        self.persist()
    }

    /// Remove the current actor from the attendee set.
    pub fn unregister_from_event(&mut self, event_id: EventId) -> RegistryResult<()> {
        let (actor_id, _) = self.require_permission(Action::Unregister)?;
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or_else(|| RegistryError::not_found(event_id))?;
        if !event.has_attendee(actor_id) {
            return Err(RegistryError::NotRegistered);
        }
        event.attendees.retain(|id| *id != actor_id);
        if let Some(actor) = self.users.get_mut(&actor_id) {
            actor.registered_events.retain(|id| *id != event_id);
        }
        self.persist()
    }

    // ---- queries ----

    /// Case-insensitive keyword search; open to everyone, logged in or not.
    pub fn search_events(&self, keyword: &str) -> Vec<Event> {
        query::search(&self.events, keyword)
    }

    pub fn view_all_events(&self) -> RegistryResult<Vec<Event>> {
        self.require_permission(Action::ViewAllEvents)?;
        Ok(self.events.values().cloned().collect())
    }

    pub fn view_own_created_events(&self) -> RegistryResult<Vec<Event>> {
        let (actor_id, _) = self.require_permission(Action::ViewOwnCreatedEvents)?;
        let actor = self
            .users
            .get(&actor_id)
            .ok_or_else(|| RegistryError::not_found(actor_id))?;
        Ok(query::resolve_events(&actor.created_events, &self.events))
    }

    pub fn view_own_registered_events(&self) -> RegistryResult<Vec<Event>> {
        let (actor_id, _) = self.require_permission(Action::ViewOwnRegisteredEvents)?;
        let actor = self
            .users
            .get(&actor_id)
            .ok_or_else(|| RegistryError::not_found(actor_id))?;
        Ok(query::resolve_events(&actor.registered_events, &self.events))
    }

    pub fn event_attendees(&self, event_id: EventId) -> RegistryResult<Vec<User>> {
        self.require_permission(Action::ViewAttendees)?;
        let event = self
            .events
            .get(&event_id)
            .ok_or_else(|| RegistryError::not_found(event_id))?;
        Ok(query::attendees_of(event, &self.users))
    }

    pub fn statistics(&self) -> RegistryResult<Stats> {
        self.require_permission(Action::ViewStatistics)?;
        Ok(query::statistics(&self.events))
    }

    /// Look up a user by id; read-only copy.
    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).cloned()
    }

    /// Look up an event by id; read-only copy.
    pub fn event(&self, id: EventId) -> Option<Event> {
        self.events.get(&id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn users(&self) -> &BTreeMap<UserId, User> {
        &self.users
    }

    pub(crate) fn events(&self) -> &BTreeMap<EventId, Event> {
        &self.events
    }

    pub(crate) fn check_permission(&self, action: Action) -> RegistryResult<(UserId, Role)> {
        self.require_permission(action)
    }

    // ---- persistence ----

    /// Snapshot after a successful mutation. A failed save is surfaced to
    /// the caller while the in-memory change stands; there is no rollback,
    /// so durability lags until the next successful save.
    fn persist(&mut self) -> RegistryResult<()> {
        let snapshot = Snapshot {
            users: self.users.clone(),
            events: self.events.clone(),
        };
        self.store.save(&snapshot)?;
        Ok(())
    }
}

fn validate_text(field: &str, value: &str) -> RegistryResult<()> {
    if value.trim().is_empty() {
        Err(RegistryError::InvalidInput(format!("{field} is required")))
    } else {
        Ok(())
    }
}
