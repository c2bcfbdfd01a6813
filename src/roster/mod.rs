// SPDX-License-Identifier: MIT
//! Static actor roster.
//!
//! Identity on the board is a self-asserted display name checked against this
//! roster; there is no authentication. The roster is loaded once from config
//! at startup and never changes while the daemon runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One named participant and their capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    /// Display color, attribution only.
    pub color: String,
    /// May mark tasks and edit quality flags / review status.
    #[serde(default)]
    pub admin: bool,
    /// May assign tasks to assignable actors.
    #[serde(default)]
    pub assign: bool,
}

/// Per-actor capabilities as pushed to clients in the init payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorView {
    pub color: String,
    pub admin: bool,
    pub assign: bool,
}

impl From<&Actor> for ActorView {
    fn from(actor: &Actor) -> Self {
        Self { color: actor.color.clone(), admin: actor.admin, assign: actor.assign }
    }
}

/// The full actor set plus the subset eligible to receive assignments.
#[derive(Debug, Clone)]
pub struct Roster {
    actors: BTreeMap<String, Actor>,
    assignable: Vec<String>,
}

impl Roster {
    /// Build a roster, dropping assignable entries that name unknown actors.
    ///
    /// Duplicate actor names keep the last definition so a config override of
    /// a built-in actor behaves as expected.
    pub fn new(actors: Vec<Actor>, assignable: Vec<String>) -> Self {
        let mut map = BTreeMap::new();
        for actor in actors {
            if map.insert(actor.name.clone(), actor).is_some() {
                warn!("duplicate actor definition, keeping the later one");
            }
        }
        let assignable: Vec<String> = assignable
            .into_iter()
            .filter(|name| {
                let known = map.contains_key(name);
                if !known {
                    warn!(actor = %name, "assignable entry names an unknown actor, dropping");
                }
                known
            })
            .collect();
        Self { actors: map, assignable }
    }

    pub fn get(&self, name: &str) -> Option<&Actor> {
        self.actors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actors.contains_key(name)
    }

    /// True when `name` may be the target of an assignment.
    pub fn is_assignable(&self, name: &str) -> bool {
        self.assignable.iter().any(|n| n == name)
    }

    pub fn assignable(&self) -> &[String] {
        &self.assignable
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Actor table keyed by name, the shape clients receive on init.
    pub fn table(&self) -> BTreeMap<String, ActorView> {
        self.actors.iter().map(|(name, actor)| (name.clone(), ActorView::from(actor))).collect()
    }
}
