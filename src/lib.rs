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

//! campus-registry: role-gated campus event registry.
//!
//! This library holds the in-process domain layer: users, events, the
//! permission table, and the registry service that enforces registration
//! and capacity invariants. Persistence is a snapshot provider behind a
//! trait; presentation is whoever renders the returned values.

pub mod config;
pub mod export;
pub mod persistence;
pub mod query;
pub mod registry_core;
