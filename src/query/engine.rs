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

//! Read-only projections over the entity maps.
//!
//! Filtering (search), aggregation (statistics), and flattening (id sets
//! resolved to entity lists). Stale ids are skipped, never an error: after an
//! out-of-band deletion a dangling reference only omits the missing entity.

use std::collections::BTreeMap;

use crate::registry_core::models::{Event, EventId, Stats, User, UserId};

/// Case-insensitive substring search over name, description, and location.
/// An empty keyword matches everything.
pub fn search(events: &BTreeMap<EventId, Event>, keyword: &str) -> Vec<Event> {
    let keyword = keyword.trim().to_lowercase();
    events
        .values()
        .filter(|e| {
            keyword.is_empty()
                || e.name.to_lowercase().contains(&keyword)
                || e.description.to_lowercase().contains(&keyword)
                || e.location.to_lowercase().contains(&keyword)
        })
        .cloned()
        .collect()
}

/// Resolve an id set to events, silently dropping ids that no longer exist.
pub fn resolve_events(ids: &[EventId], events: &BTreeMap<EventId, Event>) -> Vec<Event> {
    ids.iter().filter_map(|id| events.get(id)).cloned().collect()
}

/// Resolve an event's attendee set to users, dropping unresolvable ids.
pub fn attendees_of(event: &Event, users: &BTreeMap<UserId, User>) -> Vec<User> {
    event
        .attendees
        .iter()
        .filter_map(|id| users.get(id))
        .cloned()
        .collect()
}

/// Aggregate totals plus the best- and worst-attended exemplars. Ties
/// resolve to the lowest event id since the map iterates in id order.
pub fn statistics(events: &BTreeMap<EventId, Event>) -> Stats {
    let total_attendees = events.values().map(Event::attendance_count).sum();
    // First match wins on equal counts; the map iterates in ascending id
    // order, so ties resolve to the lowest id.
    let mut highest: Option<&Event> = None;
    let mut lowest: Option<&Event> = None;
    for e in events.values() {
        if highest.map_or(true, |h| e.attendance_count() > h.attendance_count()) {
            highest = Some(e);
        }
        if lowest.map_or(true, |l| e.attendance_count() < l.attendance_count()) {
            lowest = Some(e);
        }
    }
    let highest = highest.cloned();
    let lowest = lowest.cloned();
    Stats {
        total_events: events.len(),
        total_attendees,
        highest_attendance: highest,
        lowest_attendance: lowest,
    }
}
