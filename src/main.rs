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

// Console presentation layer. Everything here renders values returned by the
// registry service; the service itself never prints.

use anyhow::Result;
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use campus_registry::config::Config;
use campus_registry::export;
use campus_registry::persistence::{JsonSnapshotStore, MemoryStore, SnapshotStore};
use campus_registry::registry_core::errors::RegistryError;
use campus_registry::registry_core::models::{Event, EventDraft, EventPatch, Role};
use campus_registry::registry_core::registry::Registry;

#[derive(Parser, Debug)]
#[command(version, about = "Campus event registry console", long_about = None)]
struct Cli {
    /// Data directory for JSON snapshots
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep all state in memory; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,

    /// Seed demo users and events into an empty registry
    #[arg(long)]
    seed_demo: bool,

    /// Log level filter (overrides CAMPUS_REGISTRY_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: "text" or "json"
    #[arg(long)]
    log_format: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.seed_demo |= cli.seed_demo;

    init_tracing(&config);

    let store: Box<dyn SnapshotStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonSnapshotStore::open(&config.data_dir)?)
    };
    let mut registry = Registry::open(store)?;
    info!(
        users = registry.user_count(),
        events = registry.event_count(),
        "registry loaded"
    );

    if config.seed_demo && registry.user_count() == 0 {
        seed_demo(&mut registry)?;
        info!("demo data seeded");
    }

    println!("CAMPUS EVENT REGISTRY");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if registry.current_actor().is_none() {
            if !login_menu(&mut registry, &mut lines)? {
                break;
            }
        } else {
            role_menu(&mut registry, &mut lines, &config)?;
        }
    }
    println!("Goodbye.");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

/// The original demo data set: four users, three events.
fn seed_demo(registry: &mut Registry) -> Result<()> {
    let admin = registry.register_user("admin", Role::Admin, Some("admin@campus.edu".into()))?;
    let organizer = registry.register_user(
        "organizer1",
        Role::Organizer,
        Some("organizer1@campus.edu".into()),
    )?;
    registry.register_user("student1", Role::Student, Some("student1@campus.edu".into()))?;
    registry.register_user("visitor1", Role::Visitor, Some("visitor1@campus.edu".into()))?;

    registry.login(admin);
    registry.create_event(EventDraft::parse(
        "Campus Career Fair 2026",
        "Annual career fair with top companies",
        "2026-03-15",
        "10:00",
        "Main Auditorium",
        200,
    )?)?;
    registry.login(organizer);
    registry.create_event(EventDraft::parse(
        "Rust Programming Workshop",
        "Learn Rust basics and advanced concepts",
        "2026-03-20",
        "14:00",
        "Computer Lab 101",
        30,
    )?)?;
    registry.create_event(EventDraft::parse(
        "Student Leadership Conference",
        "Leadership skills development workshop",
        "2026-03-25",
        "09:00",
        "Conference Hall",
        100,
    )?)?;
    registry.logout();
    Ok(())
}

type Lines<'a> = io::Lines<io::StdinLock<'a>>;

fn prompt(lines: &mut Lines, msg: &str) -> Result<Option<String>> {
    print!("{msg}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

/// Returns false when the user chose to exit (or stdin closed).
fn login_menu(registry: &mut Registry, lines: &mut Lines) -> Result<bool> {
    println!("\n1. Login\n2. Register new user\n3. Exit");
    let choice = match prompt(lines, "Choice: ")? {
        Some(c) => c,
        None => return Ok(false),
    };
    match choice.as_str() {
        "1" => {
            let raw = match prompt(lines, "User ID: ")? {
                Some(r) => r,
                None => return Ok(false),
            };
            match raw.parse() {
                Ok(id) if registry.login(id) => {
                    let name = registry
                        .current_actor()
                        .map(|u| u.username.clone())
                        .unwrap_or_default();
                    println!("Welcome back, {name}!");
                }
                _ => println!("Invalid user ID."),
            }
        }
        "2" => register_user_menu(registry, lines)?,
        "3" => return Ok(false),
        _ => println!("Invalid choice."),
    }
    Ok(true)
}

fn register_user_menu(registry: &mut Registry, lines: &mut Lines) -> Result<()> {
    let username = prompt(lines, "Username: ")?.unwrap_or_default();
    println!("Roles: admin, organizer, student, visitor");
    let role_raw = prompt(lines, "Role: ")?.unwrap_or_default();
    let role: Role = match role_raw.parse() {
        Ok(r) => r,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };
    let email = prompt(lines, "Email (optional): ")?.unwrap_or_default();
    let email = (!email.is_empty()).then_some(email);
    match registry.register_user(&username, role, email) {
        Ok(id) => println!("Registered. Your user ID is: {id}"),
        Err(e) => render_error(&e),
    }
    Ok(())
}

fn role_menu(registry: &mut Registry, lines: &mut Lines, config: &Config) -> Result<()> {
    let (role, name) = match registry.current_actor() {
        Some(u) => (u.role, u.username.clone()),
        None => return Ok(()),
    };
    println!("\nLogged in as {name} ({role})");
    match role {
        Role::Admin => admin_menu(registry, lines, config),
        Role::Organizer => organizer_menu(registry, lines, config),
        Role::Student | Role::Visitor => attendee_menu(registry, lines),
    }
}

fn admin_menu(registry: &mut Registry, lines: &mut Lines, config: &Config) -> Result<()> {
    println!(
        "1. Create event\n2. Update event\n3. Delete event\n4. View all events\n\
         5. View attendees\n6. Statistics\n7. Export events CSV\n8. Export attendees CSV\n9. Logout"
    );
    let choice = prompt(lines, "Choice: ")?.unwrap_or_else(|| "9".into());
    match choice.as_str() {
        "1" => create_event_menu(registry, lines)?,
        "2" => update_event_menu(registry, lines)?,
        "3" => {
            if let Some(raw) = prompt(lines, "Event ID to delete: ")? {
                match raw.parse() {
                    Ok(id) => report(registry.delete_event(id), "Event deleted."),
                    Err(_) => println!("Invalid event ID."),
                }
            }
        }
        "4" => match registry.view_all_events() {
            Ok(events) => print_events(&events),
            Err(e) => render_error(&e),
        },
        "5" => attendees_menu(registry, lines)?,
        "6" => match registry.statistics() {
            Ok(stats) => {
                println!("Total events: {}", stats.total_events);
                println!("Total attendees: {}", stats.total_attendees);
                if let Some(e) = stats.highest_attendance {
                    println!("Highest attendance: {} ({})", e.name, e.attendance_count());
                }
                if let Some(e) = stats.lowest_attendance {
                    println!("Lowest attendance: {} ({})", e.name, e.attendance_count());
                }
            }
            Err(e) => render_error(&e),
        },
        "7" => match export::event_rows(registry) {
            Ok(rows) => {
                fs::create_dir_all(&config.data_dir)?;
                let path = config.data_dir.join("events_report.csv");
                fs::write(&path, export::events_csv(&rows))?;
                println!("Events exported to {}", path.display());
            }
            Err(e) => render_error(&e),
        },
        "8" => export_attendees_menu(registry, lines, config)?,
        "9" => registry.logout(),
        _ => println!("Invalid choice."),
    }
    Ok(())
}

fn organizer_menu(registry: &mut Registry, lines: &mut Lines, config: &Config) -> Result<()> {
    println!(
        "1. Create event\n2. View my events\n3. View attendees\n4. Export attendees CSV\n5. Logout"
    );
    let choice = prompt(lines, "Choice: ")?.unwrap_or_else(|| "5".into());
    match choice.as_str() {
        "1" => create_event_menu(registry, lines)?,
        "2" => match registry.view_own_created_events() {
            Ok(events) => print_events(&events),
            Err(e) => render_error(&e),
        },
        "3" => attendees_menu(registry, lines)?,
        "4" => export_attendees_menu(registry, lines, config)?,
        "5" => registry.logout(),
        _ => println!("Invalid choice."),
    }
    Ok(())
}

fn attendee_menu(registry: &mut Registry, lines: &mut Lines) -> Result<()> {
    println!(
        "1. Search events\n2. View my registrations\n3. Register for event\n\
         4. Unregister from event\n5. Logout"
    );
    let choice = prompt(lines, "Choice: ")?.unwrap_or_else(|| "5".into());
    match choice.as_str() {
        "1" => {
            let keyword = prompt(lines, "Keyword: ")?.unwrap_or_default();
            print_events(&registry.search_events(&keyword));
        }
        "2" => match registry.view_own_registered_events() {
            Ok(events) => print_events(&events),
            Err(e) => render_error(&e),
        },
        "3" => {
            if let Some(raw) = prompt(lines, "Event ID: ")? {
                match raw.parse() {
                    Ok(id) => report(registry.register_for_event(id), "Registered."),
                    Err(_) => println!("Invalid event ID."),
                }
            }
        }
        "4" => {
            if let Some(raw) = prompt(lines, "Event ID: ")? {
                match raw.parse() {
                    Ok(id) => report(registry.unregister_from_event(id), "Unregistered."),
                    Err(_) => println!("Invalid event ID."),
                }
            }
        }
        "5" => registry.logout(),
        _ => println!("Invalid choice."),
    }
    Ok(())
}

fn create_event_menu(registry: &mut Registry, lines: &mut Lines) -> Result<()> {
    let name = prompt(lines, "Name: ")?.unwrap_or_default();
    let description = prompt(lines, "Description: ")?.unwrap_or_default();
    let date = prompt(lines, "Date (YYYY-MM-DD): ")?.unwrap_or_default();
    let time = prompt(lines, "Time (HH:MM): ")?.unwrap_or_default();
    let location = prompt(lines, "Location: ")?.unwrap_or_default();
    let capacity = prompt(lines, "Max capacity: ")?.unwrap_or_default();
    let capacity: u32 = match capacity.parse() {
        Ok(c) => c,
        Err(_) => {
            println!("Invalid capacity.");
            return Ok(());
        }
    };
    let draft = match EventDraft::parse(&name, &description, &date, &time, &location, capacity) {
        Ok(d) => d,
        Err(e) => {
            render_error(&e);
            return Ok(());
        }
    };
    match registry.create_event(draft) {
        Ok(id) => println!("Event created with ID: {id}"),
        Err(e) => render_error(&e),
    }
    Ok(())
}

fn update_event_menu(registry: &mut Registry, lines: &mut Lines) -> Result<()> {
    let raw = match prompt(lines, "Event ID to update: ")? {
        Some(r) => r,
        None => return Ok(()),
    };
    let id = match raw.parse() {
        Ok(id) => id,
        Err(_) => {
            println!("Invalid event ID.");
            return Ok(());
        }
    };
    println!("Leave a field blank to keep its current value.");
    let name = prompt(lines, "New name: ")?.filter(|s| !s.is_empty());
    let description = prompt(lines, "New description: ")?.filter(|s| !s.is_empty());
    let date = match prompt(lines, "New date (YYYY-MM-DD): ")?.filter(|s| !s.is_empty()) {
        Some(raw) => match campus_registry::registry_core::models::parse_event_date(&raw) {
            Ok(d) => Some(d),
            Err(e) => {
                render_error(&e);
                return Ok(());
            }
        },
        None => None,
    };
    let time = prompt(lines, "New time (HH:MM): ")?.filter(|s| !s.is_empty());
    let location = prompt(lines, "New location: ")?.filter(|s| !s.is_empty());
    let max_capacity = match prompt(lines, "New max capacity: ")?.filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse() {
            Ok(c) => Some(c),
            Err(_) => {
                println!("Invalid capacity.");
                return Ok(());
            }
        },
        None => None,
    };
    let patch = EventPatch {
        name,
        description,
        date,
        time,
        location,
        max_capacity,
    };
    if patch.is_empty() {
        println!("No updates provided.");
        return Ok(());
    }
    report(registry.update_event(id, patch), "Event updated.");
    Ok(())
}

fn attendees_menu(registry: &mut Registry, lines: &mut Lines) -> Result<()> {
    if let Some(raw) = prompt(lines, "Event ID: ")? {
        match raw.parse() {
            Ok(id) => match registry.event_attendees(id) {
                Ok(attendees) if attendees.is_empty() => println!("No attendees."),
                Ok(attendees) => {
                    for a in attendees {
                        println!(
                            "  {} ({}) - {}",
                            a.username,
                            a.role,
                            a.email.unwrap_or_default()
                        );
                    }
                }
                Err(e) => render_error(&e),
            },
            Err(_) => println!("Invalid event ID."),
        }
    }
    Ok(())
}

fn export_attendees_menu(registry: &mut Registry, lines: &mut Lines, config: &Config) -> Result<()> {
    if let Some(raw) = prompt(lines, "Event ID: ")? {
        match raw.parse() {
            Ok(id) => match export::attendee_rows(registry, id) {
                Ok(rows) => {
                    fs::create_dir_all(&config.data_dir)?;
                    let path = config.data_dir.join(format!("attendees_{id}.csv"));
                    fs::write(&path, export::attendees_csv(&rows))?;
                    println!("Attendees exported to {}", path.display());
                }
                Err(e) => render_error(&e),
            },
            Err(_) => println!("Invalid event ID."),
        }
    }
    Ok(())
}

fn print_events(events: &[Event]) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }
    for e in events {
        println!("\n{}: {}", e.id, e.name);
        println!("  {}", e.description);
        println!("  {} at {}, {}", e.date, e.time, e.location);
        println!("  Capacity: {}/{}", e.attendance_count(), e.max_capacity);
    }
}

fn report(result: Result<(), RegistryError>, success: &str) {
    match result {
        Ok(()) => println!("{success}"),
        Err(e) => render_error(&e),
    }
}

fn render_error(err: &RegistryError) {
    println!("Error: {err}");
}
