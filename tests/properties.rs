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

//! Invariant properties of the registry service.

use campus_registry::persistence::MemoryStore;
use campus_registry::registry_core::errors::RegistryError;
use campus_registry::registry_core::models::{EventDraft, EventId, Role, UserId};
use campus_registry::registry_core::registry::Registry;
use proptest::prelude::*;

fn seeded_registry(capacity: u32, students: usize) -> (Registry, Vec<UserId>, EventId) {
    let mut reg = Registry::open(Box::new(MemoryStore::new())).unwrap();
    let admin = reg.register_user("admin", Role::Admin, None).unwrap();
    reg.login(admin);
    let event = reg
        .create_event(
            EventDraft::parse("Fair", "fair", "2026-05-01", "10:00", "Quad", capacity).unwrap(),
        )
        .unwrap();
    let ids = (0..students)
        .map(|i| {
            reg.register_user(&format!("s{i}"), Role::Student, None)
                .unwrap()
        })
        .collect();
    (reg, ids, event)
}

proptest! {
    /// `len(attendees) <= max_capacity` after every call, no matter which
    /// student registers (or re-registers) in which order.
    #[test]
    fn capacity_never_exceeded(
        capacity in 1u32..8,
        attempts in prop::collection::vec(0usize..12, 0..40)
    ) {
        let (mut reg, students, event) = seeded_registry(capacity, 12);
        for idx in attempts {
            reg.login(students[idx]);
            match reg.register_for_event(event) {
                Ok(())
                | Err(RegistryError::CapacityExceeded)
                | Err(RegistryError::AlreadyRegistered) => {}
                Err(other) => prop_assert!(false, "unexpected outcome: {other:?}"),
            }
            let e = reg.event(event).unwrap();
            prop_assert!(e.attendance_count() <= e.max_capacity as usize);
        }
    }

    /// Register/unregister sequences keep both membership sides in sync.
    #[test]
    fn membership_sides_stay_in_sync(
        ops in prop::collection::vec((0usize..6, prop::bool::ANY), 0..60)
    ) {
        let (mut reg, students, event) = seeded_registry(4, 6);
        for (idx, join) in ops {
            reg.login(students[idx]);
            if join {
                let _ = reg.register_for_event(event);
            } else {
                let _ = reg.unregister_from_event(event);
            }
            let e = reg.event(event).unwrap();
            for id in &students {
                let user = reg.user(*id).unwrap();
                prop_assert_eq!(
                    e.has_attendee(*id),
                    user.registered_events.contains(&event)
                );
            }
        }
    }

    /// Search never panics and never invents events.
    #[test]
    fn search_is_total(keyword in "\\PC*") {
        let (reg, _, _) = seeded_registry(5, 2);
        let hits = reg.search_events(&keyword);
        prop_assert!(hits.len() <= reg.event_count());
    }
}
