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

//! Persistence round trips through the JSON file store.

use campus_registry::persistence::{JsonSnapshotStore, SnapshotStore};
use campus_registry::registry_core::models::{EventDraft, Role, UserId};
use campus_registry::registry_core::registry::Registry;

#[test]
fn save_then_load_reproduces_users_and_events() {
    let dir = tempfile::tempdir().unwrap();

    let (admin, fair);
    {
        let store = JsonSnapshotStore::open(dir.path()).unwrap();
        let mut reg = Registry::open(Box::new(store)).unwrap();
        admin = reg
            .register_user("admin", Role::Admin, Some("admin@campus.edu".into()))
            .unwrap();
        reg.login(admin);
        fair = reg
            .create_event(
                EventDraft::parse(
                    "Career Fair",
                    "companies on campus",
                    "2026-03-15",
                    "10:00",
                    "Main Auditorium",
                    200,
                )
                .unwrap(),
            )
            .unwrap();
        let student = reg.register_user("sam", Role::Student, None).unwrap();
        reg.login(student);
        reg.register_for_event(fair).unwrap();
        // Store lock released when reg (and its store) drops.
    }

    let store = JsonSnapshotStore::open(dir.path()).unwrap();
    let snapshot = store.load().unwrap().expect("snapshot exists");
    assert_eq!(snapshot.users.len(), 2);
    assert_eq!(snapshot.events.len(), 1);

    let event = &snapshot.events[&fair];
    assert_eq!(event.name, "Career Fair");
    assert_eq!(event.date.to_string(), "2026-03-15");
    assert_eq!(event.time, "10:00");
    assert_eq!(event.max_capacity, 200);
    assert_eq!(event.organizer, admin);
    assert_eq!(event.attendees, vec![UserId::new(2)]);

    let admin_user = &snapshot.users[&admin];
    assert_eq!(admin_user.role, Role::Admin);
    assert_eq!(admin_user.email.as_deref(), Some("admin@campus.edu"));
    assert_eq!(admin_user.created_events, vec![fair]);

    let student_user = &snapshot.users[&UserId::new(2)];
    assert_eq!(student_user.registered_events, vec![fair]);

    // A registry reopened over the same directory sees identical state.
    let reg = Registry::open(Box::new(store)).unwrap();
    assert_eq!(reg.user_count(), 2);
    assert_eq!(reg.event_count(), 1);
    assert_eq!(reg.event(fair).unwrap(), snapshot.events[&fair]);
}

#[test]
fn snapshot_files_use_original_wire_format() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = JsonSnapshotStore::open(dir.path()).unwrap();
        let mut reg = Registry::open(Box::new(store)).unwrap();
        let organizer = reg
            .register_user("olga", Role::Organizer, None)
            .unwrap();
        reg.login(organizer);
        reg.create_event(
            EventDraft::parse("Expo", "tech expo", "2026-06-01", "09:00", "Hall B", 50).unwrap(),
        )
        .unwrap();
    }

    let users: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("users.json")).unwrap())
            .unwrap();
    assert_eq!(users["user_1"]["role"], "event_organizer");
    assert_eq!(users["user_1"]["created_events"][0], "event_1");

    let events: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("events.json")).unwrap())
            .unwrap();
    assert_eq!(events["event_1"]["date"], "2026-06-01");
    assert_eq!(events["event_1"]["organizer"], "user_1");
}
