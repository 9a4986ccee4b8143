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

//! Role-based permission table.
//!
//! A pure, total predicate over (role, action). The match is exhaustive on
//! both enums, so extending either set without updating the table is a
//! compile error. No state, no I/O.

use crate::registry_core::models::Role;

/// Everything a caller can ask the registry to do that is permission-gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    ViewAllEvents,
    ViewOwnCreatedEvents,
    ViewAttendees,
    ViewStatistics,
    ExportEvents,
    ExportAttendees,
    Register,
    Unregister,
    ViewOwnRegisteredEvents,
}

/// Permission predicate. Admins manage the registry, organizers manage their
/// own events, students and visitors attend.
pub fn can(role: Role, action: Action) -> bool {
    use Action::*;
    match role {
        Role::Admin => match action {
            CreateEvent | UpdateEvent | DeleteEvent | ViewAllEvents | ViewAttendees
            | ViewStatistics | ExportEvents | ExportAttendees => true,
            ViewOwnCreatedEvents | Register | Unregister | ViewOwnRegisteredEvents => false,
        },
        Role::Organizer => match action {
            CreateEvent | ViewAllEvents | ViewOwnCreatedEvents | ViewAttendees
            | ExportAttendees => true,
            UpdateEvent | DeleteEvent | ViewStatistics | ExportEvents | Register | Unregister
            | ViewOwnRegisteredEvents => false,
        },
        Role::Student | Role::Visitor => match action {
            Register | Unregister | ViewOwnRegisteredEvents => true,
            CreateEvent | UpdateEvent | DeleteEvent | ViewAllEvents | ViewOwnCreatedEvents
            | ViewAttendees | ViewStatistics | ExportEvents | ExportAttendees => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 12] = [
        Action::CreateEvent,
        Action::UpdateEvent,
        Action::DeleteEvent,
        Action::ViewAllEvents,
        Action::ViewOwnCreatedEvents,
        Action::ViewAttendees,
        Action::ViewStatistics,
        Action::ExportEvents,
        Action::ExportAttendees,
        Action::Register,
        Action::Unregister,
        Action::ViewOwnRegisteredEvents,
    ];

    #[test]
    fn admin_manages_but_does_not_attend() {
        assert!(can(Role::Admin, Action::CreateEvent));
        assert!(can(Role::Admin, Action::UpdateEvent));
        assert!(can(Role::Admin, Action::DeleteEvent));
        assert!(can(Role::Admin, Action::ViewStatistics));
        assert!(can(Role::Admin, Action::ExportEvents));
        assert!(!can(Role::Admin, Action::Register));
        assert!(!can(Role::Admin, Action::Unregister));
        assert!(!can(Role::Admin, Action::ViewOwnCreatedEvents));
    }

    #[test]
    fn organizer_gets_attendee_export_only() {
        assert!(can(Role::Organizer, Action::CreateEvent));
        assert!(can(Role::Organizer, Action::ViewOwnCreatedEvents));
        assert!(can(Role::Organizer, Action::ExportAttendees));
        assert!(!can(Role::Organizer, Action::ExportEvents));
        assert!(!can(Role::Organizer, Action::ViewStatistics));
        assert!(!can(Role::Organizer, Action::UpdateEvent));
        assert!(!can(Role::Organizer, Action::DeleteEvent));
    }

    #[test]
    fn students_and_visitors_share_the_same_row() {
        for action in ALL_ACTIONS {
            assert_eq!(
                can(Role::Student, action),
                can(Role::Visitor, action),
                "matrix rows diverge on {action:?}"
            );
        }
        assert!(can(Role::Student, Action::Register));
        assert!(can(Role::Visitor, Action::ViewOwnRegisteredEvents));
        assert!(!can(Role::Student, Action::DeleteEvent));
        assert!(!can(Role::Visitor, Action::ViewAllEvents));
    }

    #[test]
    fn predicate_is_total() {
        // Every pair has a defined answer; just exercise them all.
        for role in [Role::Admin, Role::Organizer, Role::Student, Role::Visitor] {
            for action in ALL_ACTIONS {
                let _ = can(role, action);
            }
        }
    }
}
