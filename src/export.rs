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

//! Report-row projections with fixed column sets.
//!
//! The registry supplies the data; writing the rows anywhere is the
//! presentation layer's concern. CSV encoding here is plain RFC-4180-style
//! quoting of the fixed columns.

use serde::Serialize;

use crate::registry_core::auth::Action;
use crate::registry_core::errors::{RegistryError, RegistryResult};
use crate::registry_core::models::EventId;
use crate::registry_core::registry::Registry;

pub const EVENT_COLUMNS: [&str; 9] = [
    "EventID",
    "Name",
    "Description",
    "Date",
    "Time",
    "Location",
    "MaxCapacity",
    "CurrentAttendees",
    "Organizer",
];

pub const ATTENDEE_COLUMNS: [&str; 4] = ["UserID", "Username", "Role", "Email"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub event_id: String,
    pub name: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub max_capacity: u32,
    pub current_attendees: usize,
    /// Organizer username; empty if the organizer id no longer resolves.
    pub organizer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendeeRow {
    pub user_id: String,
    pub username: String,
    pub role: String,
    pub email: String,
}

/// Project every event into a report row. Admin only.
pub fn event_rows(registry: &Registry) -> RegistryResult<Vec<EventRow>> {
    registry.check_permission(Action::ExportEvents)?;
    let rows = registry
        .events()
        .values()
        .map(|event| EventRow {
            event_id: event.id.to_string(),
            name: event.name.clone(),
            description: event.description.clone(),
            date: event.date.to_string(),
            time: event.time.clone(),
            location: event.location.clone(),
            max_capacity: event.max_capacity,
            current_attendees: event.attendance_count(),
            organizer: registry
                .users()
                .get(&event.organizer)
                .map(|u| u.username.clone())
                .unwrap_or_default(),
        })
        .collect();
    Ok(rows)
}

/// Project one event's attendees into report rows. Admin or organizer.
pub fn attendee_rows(registry: &Registry, event_id: EventId) -> RegistryResult<Vec<AttendeeRow>> {
    registry.check_permission(Action::ExportAttendees)?;
    let event = registry
        .events()
        .get(&event_id)
        .ok_or_else(|| RegistryError::not_found(event_id))?;
    let rows = event
        .attendees
        .iter()
        .filter_map(|id| registry.users().get(id))
        .map(|user| AttendeeRow {
            user_id: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.to_string(),
            email: user.email.clone().unwrap_or_default(),
        })
        .collect();
    Ok(rows)
}

/// Encode event rows as CSV text, header first.
pub fn events_csv(rows: &[EventRow]) -> String {
    let mut out = csv_line(EVENT_COLUMNS.iter().map(|s| s.to_string()));
    for r in rows {
        out.push_str(&csv_line([
            r.event_id.clone(),
            r.name.clone(),
            r.description.clone(),
            r.date.clone(),
            r.time.clone(),
            r.location.clone(),
            r.max_capacity.to_string(),
            r.current_attendees.to_string(),
            r.organizer.clone(),
        ]));
    }
    out
}

/// Encode attendee rows as CSV text, header first.
pub fn attendees_csv(rows: &[AttendeeRow]) -> String {
    let mut out = csv_line(ATTENDEE_COLUMNS.iter().map(|s| s.to_string()));
    for r in rows {
        out.push_str(&csv_line([
            r.user_id.clone(),
            r.username.clone(),
            r.role.clone(),
            r.email.clone(),
        ]));
    }
    out
}

fn csv_line(fields: impl IntoIterator<Item = String>) -> String {
    let mut line = fields
        .into_iter()
        .map(|f| csv_field(&f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_has_fixed_header() {
        let text = events_csv(&[]);
        assert_eq!(
            text,
            "EventID,Name,Description,Date,Time,Location,MaxCapacity,CurrentAttendees,Organizer\n"
        );
        let text = attendees_csv(&[]);
        assert_eq!(text, "UserID,Username,Role,Email\n");
    }

    #[test]
    fn event_row_renders_values() {
        let rows = [EventRow {
            event_id: "event_1".into(),
            name: "Fair, the big one".into(),
            description: "fun".into(),
            date: "2026-03-15".into(),
            time: "10:00".into(),
            location: "Hall".into(),
            max_capacity: 200,
            current_attendees: 2,
            organizer: "ana".into(),
        }];
        let text = events_csv(&rows);
        assert!(text.ends_with("event_1,\"Fair, the big one\",fun,2026-03-15,10:00,Hall,200,2,ana\n"));
    }
}
