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

//! Domain models for the campus event registry.
//!
//! Pure data structures representing users, events, and derived statistics.
//! Free of I/O side effects; all mutation happens through the Registry service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::registry_core::errors::RegistryError;

/// Newtype wrapper for type-safe user identification.
///
/// Rendered as `user_{n}` on the wire, matching the snapshot file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(u32);

/// Newtype wrapper for type-safe event identification.
///
/// Rendered as `event_{n}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(u32);

/// Parse error for prefixed identifiers.
#[derive(Debug, Clone, thiserror::Error)]
#[error("malformed identifier: {0:?}")]
pub struct IdParseError(pub String);

fn parse_prefixed(s: &str, prefix: &str) -> Result<u32, IdParseError> {
    s.strip_prefix(prefix)
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| IdParseError(s.to_string()))
}

impl UserId {
    pub fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl EventId {
    pub fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event_{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, "user_").map(UserId)
    }
}

impl FromStr for EventId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, "event_").map(EventId)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.to_string()
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = IdParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for EventId {
    type Error = IdParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Closed set of user roles. Matched exhaustively in the permission table,
/// so a new role cannot be added without deciding its permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[serde(rename = "event_organizer")]
    Organizer,
    Student,
    Visitor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Organizer => "event_organizer",
            Role::Student => "student",
            Role::Visitor => "visitor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "organizer" | "event_organizer" => Ok(Role::Organizer),
            "student" => Ok(Role::Student),
            "visitor" => Ok(Role::Visitor),
            other => Err(RegistryError::InvalidInput(format!(
                "unknown role: {other:?}"
            ))),
        }
    }
}

/// A registered person. The created/registered sets hold event ids; the
/// created set is meaningful for organizers and admins, the registered set
/// for students and visitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    /// Absent email is stored as an empty string in the snapshot files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub created_events: Vec<EventId>,
    #[serde(default)]
    pub registered_events: Vec<EventId>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, role: Role, email: Option<String>) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            email: email.filter(|e| !e.is_empty()),
            created_events: Vec::new(),
            registered_events: Vec::new(),
        }
    }
}

/// A campus event. Attendees are insertion-ordered and duplicate-free;
/// `attendees.len() <= max_capacity` holds after every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    /// Calendar date, round-tripped as ISO `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Time of day, kept as entered (e.g. "14:00"). Not interpreted.
    pub time: String,
    pub location: String,
    pub max_capacity: u32,
    pub organizer: UserId,
    #[serde(default)]
    pub attendees: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn attendance_count(&self) -> usize {
        self.attendees.len()
    }

    pub fn is_full(&self) -> bool {
        self.attendees.len() >= self.max_capacity as usize
    }

    pub fn has_attendee(&self, user: UserId) -> bool {
        self.attendees.contains(&user)
    }
}

/// Input for event creation. All fields required; validation happens in the
/// service (empty text, zero capacity) or during parsing (calendar date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub max_capacity: u32,
}

impl EventDraft {
    /// Build a draft from raw console input. Rejects malformed or impossible
    /// calendar dates (day 31 in a 30-day month, Feb 29 outside leap years).
    pub fn parse(
        name: &str,
        description: &str,
        date: &str,
        time: &str,
        location: &str,
        max_capacity: u32,
    ) -> Result<Self, RegistryError> {
        let date = parse_event_date(date)?;
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            date,
            time: time.to_string(),
            location: location.to_string(),
            max_capacity,
        })
    }
}

/// Parse an ISO `YYYY-MM-DD` date, enforcing Gregorian validity.
pub fn parse_event_date(s: &str) -> Result<NaiveDate, RegistryError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| RegistryError::InvalidInput(format!("invalid date (expected YYYY-MM-DD): {s:?}")))
}

/// Partial update for an event. Absent fields are left unchanged; there is
/// no way to "unset" a field to a zero value through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub max_capacity: Option<u32>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.location.is_none()
            && self.max_capacity.is_none()
    }
}

/// Aggregate statistics over the event map. Exemplars are clones; ties on
/// attendance resolve to the lowest event id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_events: usize,
    pub total_attendees: usize,
    pub highest_attendance: Option<Event>,
    pub lowest_attendance: Option<Event>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_display_and_parse_round_trip() {
        let uid = UserId::new(7);
        assert_eq!(uid.to_string(), "user_7");
        assert_eq!("user_7".parse::<UserId>().unwrap(), uid);

        let eid = EventId::new(42);
        assert_eq!(eid.to_string(), "event_42");
        assert_eq!("event_42".parse::<EventId>().unwrap(), eid);
    }

    #[test]
    fn id_parse_rejects_foreign_prefix() {
        assert!("event_7".parse::<UserId>().is_err());
        assert!("user_7".parse::<EventId>().is_err());
        assert!("user_".parse::<UserId>().is_err());
        assert!("7".parse::<UserId>().is_err());
    }

    #[test]
    fn role_serde_uses_original_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::Organizer).unwrap(),
            "\"event_organizer\""
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"visitor\"").unwrap(),
            Role::Visitor
        );
    }

    #[test]
    fn date_parsing_enforces_leap_rule() {
        assert!(parse_event_date("2023-02-29").is_err());
        assert!(parse_event_date("2024-02-29").is_ok());
        assert!(parse_event_date("2023-04-31").is_err());
        assert!(parse_event_date("2023-04-30").is_ok());
        assert!(parse_event_date("not-a-date").is_err());
    }

    #[test]
    fn empty_email_normalizes_to_none() {
        let u = User::new(UserId::new(1), "sam", Role::Student, Some(String::new()));
        assert_eq!(u.email, None);
    }
}
