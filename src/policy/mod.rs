// SPDX-License-Identifier: MIT
//! `policy` — authorization rules for board mutations.
//!
//! Pure decision functions: given the acting user, the current record, and
//! the requested op, return `Ok(())` or a typed denial. No state, no I/O.
//! The orchestrator resolves the actor name against the roster before calling
//! in here, so unknown names never reach these checks.

use thiserror::Error;

use crate::board::mutation::TaskOp;
use crate::board::record::TaskRecord;
use crate::roster::{Actor, Roster};

// ─── Denials ─────────────────────────────────────────────────────────────────

/// Why a mutation was refused. The display string is the user-visible
/// message sent back to the requesting session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenyReason {
    /// The acting name is not in the roster.
    #[error("unknown actor '{actor}'")]
    UnknownActor { actor: String },

    /// Someone else holds the completion; only they may release it.
    #[error("already completed by someone else")]
    AlreadyCompleted,

    /// Marking and annotation edits need the admin capability.
    #[error("admin only")]
    AdminOnly,

    /// Assignment needs the assign capability.
    #[error("assign capability required")]
    AssignOnly,

    /// The target is not in the assignable set.
    #[error("invalid assignment target '{target}'")]
    InvalidAssignTarget { target: String },
}

// ─── Authorization check ─────────────────────────────────────────────────────

/// Decide whether `actor` may apply `op` to `record`.
///
/// Evaluated against the record state the caller currently holds under the
/// registry lock, so a passing decision cannot be based on a stale view.
pub fn authorize(
    actor: &Actor,
    record: &TaskRecord,
    op: &TaskOp,
    roster: &Roster,
) -> Result<(), DenyReason> {
    match op {
        TaskOp::Toggle => {
            // Open tasks are claimable by anyone; held tasks only release
            // for the actor named in completedBy.
            if !record.completed {
                return Ok(());
            }
            if record.completed_by.as_deref() == Some(actor.name.as_str()) {
                return Ok(());
            }
            Err(DenyReason::AlreadyCompleted)
        }
        TaskOp::ToggleMark | TaskOp::SetQualityFlag { .. } | TaskOp::SetTeacherStatus { .. } => {
            if actor.admin {
                Ok(())
            } else {
                Err(DenyReason::AdminOnly)
            }
        }
        TaskOp::Assign { target } => {
            if !actor.assign {
                return Err(DenyReason::AssignOnly);
            }
            match target {
                Some(name) if !roster.is_assignable(name) => {
                    Err(DenyReason::InvalidAssignTarget { target: name.clone() })
                }
                // Clearing (None) needs only the capability check.
                _ => Ok(()),
            }
        }
    }
}

/// Decide whether `actor` may wipe the whole board.
///
/// Deliberately ungated beyond roster membership (which the caller has
/// already established by resolving the actor). The orchestrator logs every
/// reset at warn level with the actor name.
pub fn authorize_reset(_actor: &Actor) -> Result<(), DenyReason> {
    Ok(())
}
