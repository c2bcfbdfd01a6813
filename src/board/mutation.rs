// SPDX-License-Identifier: MIT
//! State transitions for a single task record.
//!
//! An op arrives here only after the policy layer has approved it, so every
//! transition is total: applying an op to a record always succeeds and leaves
//! the record coherent (`completed_by` set iff `completed`).

use serde::{Deserialize, Serialize};

use crate::board::record::{QualityFlagKind, TaskRecord, TeacherStatus};

/// One approved mutation against a single task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOp {
    /// Flip completion; completing stamps the acting user, uncompleting
    /// clears the stamp.
    Toggle,
    /// Flip the "available for pickup" mark.
    ToggleMark,
    /// Set one quality flag, leaving the others alone.
    SetQualityFlag { flag: QualityFlagKind, value: bool },
    /// Replace the review status.
    SetTeacherStatus { status: TeacherStatus },
    /// Point the assignment at a target, or clear it with `None`.
    Assign { target: Option<String> },
}

impl TaskOp {
    /// Stable short name used in log fields and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            TaskOp::Toggle => "toggle",
            TaskOp::ToggleMark => "mark",
            TaskOp::SetQualityFlag { .. } => "quality_flag",
            TaskOp::SetTeacherStatus { .. } => "teacher_status",
            TaskOp::Assign { .. } => "assign",
        }
    }
}

/// Apply `op` to `record` on behalf of `actor`.
pub fn apply(record: &mut TaskRecord, op: &TaskOp, actor: &str) {
    match op {
        TaskOp::Toggle => {
            if record.completed {
                record.completed = false;
                record.completed_by = None;
            } else {
                record.completed = true;
                record.completed_by = Some(actor.to_string());
            }
        }
        TaskOp::ToggleMark => {
            record.marked = !record.marked;
        }
        TaskOp::SetQualityFlag { flag, value } => {
            record.quality_flags.set(*flag, *value);
        }
        TaskOp::SetTeacherStatus { status } => {
            record.teacher_status = *status;
        }
        TaskOp::Assign { target } => {
            record.assigned_to = target.clone();
        }
    }
}

/// Outcome of routing an op through the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The op was applied; the updated record is attached for broadcast.
    Applied(TaskRecord),
    /// The id is outside the board's range; nothing changed.
    UnknownTask,
}

/// Serialized form of an applied mutation, pushed to every session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub task_id: u32,
    pub task: TaskRecord,
}
