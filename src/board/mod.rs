// SPDX-License-Identifier: MIT
//! `board` — the shared task board and its mutation pipeline.
//!
//! [`Board`] owns the registry behind a `tokio::sync::RwLock` and is the only
//! path to it. Every mutating operation runs the full
//! resolve-authorize-apply sequence under one write lock acquisition, so two
//! concurrent claims of the same task cannot both pass policy on a stale
//! view. Handlers call in here and never touch the registry directly.

pub mod mutation;
pub mod record;
pub mod registry;

use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::board::mutation::{MutationOutcome, TaskOp, TaskUpdate};
use crate::board::record::TaskRecord;
use crate::board::registry::TaskRegistry;
use crate::ipc::event::EventBroadcaster;
use crate::metrics::SharedMetrics;
use crate::policy::{self, DenyReason};
use crate::roster::{ActorView, Roster};
use crate::storage::BoardStorage;

/// Full board state as pushed to a newly connected session and returned by
/// `board.snapshot`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub tasks: BTreeMap<u32, TaskRecord>,
    pub actors: BTreeMap<String, ActorView>,
    pub assignable: Vec<String>,
}

/// Shared board state plus the fan-out and persistence wiring.
pub struct Board {
    registry: RwLock<TaskRegistry>,
    roster: Roster,
    storage: BoardStorage,
    broadcaster: EventBroadcaster,
    metrics: SharedMetrics,
}

impl Board {
    pub fn new(
        registry: TaskRegistry,
        roster: Roster,
        storage: BoardStorage,
        broadcaster: EventBroadcaster,
        metrics: SharedMetrics,
    ) -> Self {
        Self { registry: RwLock::new(registry), roster, storage, broadcaster, metrics }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Apply one op to one task on behalf of `actor_name`.
    ///
    /// On success the updated record has already been broadcast to every
    /// session and a snapshot save has been spawned. Denials leave the
    /// registry untouched and broadcast nothing.
    pub async fn apply_op(
        &self,
        task_id: u32,
        actor_name: &str,
        op: TaskOp,
    ) -> Result<MutationOutcome, DenyReason> {
        let Some(actor) = self.roster.get(actor_name) else {
            self.metrics.inc_ops_denied();
            debug!(actor = %actor_name, op = op.name(), "op from unknown actor denied");
            return Err(DenyReason::UnknownActor { actor: actor_name.to_string() });
        };

        let mut registry = self.registry.write().await;
        let Some(record) = registry.get_mut(task_id) else {
            self.metrics.inc_ops_ignored();
            debug!(task_id, op = op.name(), "op for unknown task ignored");
            return Ok(MutationOutcome::UnknownTask);
        };

        if let Err(reason) = policy::authorize(actor, record, &op, &self.roster) {
            self.metrics.inc_ops_denied();
            debug!(task_id, actor = %actor_name, op = op.name(), reason = %reason, "op denied");
            return Err(reason);
        }

        mutation::apply(record, &op, actor_name);
        let updated = record.clone();
        let snapshot = registry.clone();

        // Broadcast before releasing the write lock so fan-out order matches
        // apply order for every session.
        let update = TaskUpdate { task_id, task: updated.clone() };
        self.broadcaster
            .broadcast("task.updated", serde_json::to_value(&update).unwrap_or_default());
        drop(registry);

        self.metrics.inc_ops_applied();
        self.metrics.inc_broadcasts();
        debug!(task_id, actor = %actor_name, op = op.name(), "op applied");

        self.spawn_save(snapshot);
        Ok(MutationOutcome::Applied(updated))
    }

    /// Wipe every record back to its default state.
    ///
    /// Destructive and deliberately ungated beyond roster membership; every
    /// invocation is logged with the acting name.
    pub async fn reset_all(&self, actor_name: &str) -> Result<(), DenyReason> {
        let Some(actor) = self.roster.get(actor_name) else {
            self.metrics.inc_ops_denied();
            return Err(DenyReason::UnknownActor { actor: actor_name.to_string() });
        };
        policy::authorize_reset(actor)?;

        let mut registry = self.registry.write().await;
        registry.reset_all();
        let snapshot = registry.clone();

        let tasks: BTreeMap<u32, TaskRecord> =
            registry.iter().map(|(id, r)| (id, r.clone())).collect();
        self.broadcaster
            .broadcast("board.reset", serde_json::json!({ "tasks": tasks }));
        drop(registry);

        warn!(actor = %actor_name, "board reset, all records reinitialized");
        self.metrics.inc_ops_applied();
        self.metrics.inc_broadcasts();

        self.spawn_save(snapshot);
        Ok(())
    }

    /// Point-in-time copy of the whole board for init pushes and
    /// `board.snapshot`.
    pub async fn snapshot(&self) -> BoardSnapshot {
        let registry = self.registry.read().await;
        let tasks = registry.iter().map(|(id, r)| (id, r.clone())).collect();
        BoardSnapshot {
            tasks,
            actors: self.roster.table(),
            assignable: self.roster.assignable().to_vec(),
        }
    }

    /// `(first_id, last_id, total, completed)` for status payloads.
    pub async fn counts(&self) -> (u32, u32, usize, usize) {
        let registry = self.registry.read().await;
        let range = registry.range();
        (*range.start(), *range.end(), registry.len(), registry.completed_count())
    }

    /// Synchronous save of the current state, used at graceful shutdown.
    pub async fn save_now(&self) -> Result<(), crate::storage::StorageError> {
        let snapshot = self.registry.read().await.clone();
        self.storage.save(&snapshot).await
    }

    /// Fire-and-forget snapshot save. Failures are counted and logged, never
    /// surfaced to clients.
    fn spawn_save(&self, snapshot: TaskRegistry) {
        let storage = self.storage.clone();
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            match storage.save(&snapshot).await {
                Ok(()) => metrics.inc_snapshot_saves(),
                Err(e) => {
                    metrics.inc_snapshot_save_failures();
                    error!(err = %e, "snapshot save failed");
                }
            }
        });
    }
}
