//! Wire and snapshot shape of a single task record.
//!
//! Field names and enum strings match the persisted document produced by
//! earlier deployments of the board, so an existing snapshot loads unchanged.
//! `status` and `in_progress_by` are carried for that reason only; no
//! operation reads or writes them.

use serde::{Deserialize, Serialize};

/// Default placeholder for the vestigial `status` field.
const STATUS_NOT_STARTED: &str = "not_started";

// ─── Quality flags ───────────────────────────────────────────────────────────

/// Independent boolean annotations an administrator can put on a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityFlags {
    pub suspicious: bool,
    pub high_duplicate: bool,
    pub fake: bool,
}

/// The closed set of quality-flag keys accepted by the update operation.
///
/// Unknown keys are rejected at the gateway as invalid params instead of
/// being written into the record as arbitrary properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QualityFlagKind {
    Suspicious,
    HighDuplicate,
    Fake,
}

impl QualityFlags {
    /// Set one named flag, leaving the other two untouched.
    pub fn set(&mut self, flag: QualityFlagKind, value: bool) {
        match flag {
            QualityFlagKind::Suspicious => self.suspicious = value,
            QualityFlagKind::HighDuplicate => self.high_duplicate = value,
            QualityFlagKind::Fake => self.fake = value,
        }
    }

    /// Read one named flag.
    pub fn get(&self, flag: QualityFlagKind) -> bool {
        match flag {
            QualityFlagKind::Suspicious => self.suspicious,
            QualityFlagKind::HighDuplicate => self.high_duplicate,
            QualityFlagKind::Fake => self.fake,
        }
    }
}

// ─── Teacher review status ───────────────────────────────────────────────────

/// Mutually exclusive review state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeacherStatus {
    #[default]
    NotModified,
    WaitingTeacher,
    TeacherDone,
}

// ─── Task record ─────────────────────────────────────────────────────────────

/// Full mutable state for one numbered work item.
///
/// Invariant: `completed_by` is `Some` iff `completed` is true. The mutation
/// engine maintains it; loaders and tests may assert it via
/// [`TaskRecord::completion_coherent`].
///
/// Every field tolerates being absent in a loaded document (older snapshots
/// predate `quality_flags` and `teacher_status`), so deserialization never
/// fails on a legacy record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRecord {
    pub completed: bool,
    pub completed_by: Option<String>,
    /// Advisory assignment; a member of the assignable list or absent.
    pub assigned_to: Option<String>,
    /// "Available for pickup" flag, administrator-only.
    pub marked: bool,
    /// Vestigial; always `"not_started"` in practice.
    pub status: String,
    /// Vestigial; never set by any operation.
    pub in_progress_by: Option<String>,
    pub quality_flags: QualityFlags,
    pub teacher_status: TeacherStatus,
    /// Free text, present in the shape, unused by current operations.
    pub notes: String,
}

impl Default for TaskRecord {
    fn default() -> Self {
        Self {
            completed: false,
            completed_by: None,
            assigned_to: None,
            marked: false,
            status: STATUS_NOT_STARTED.to_string(),
            in_progress_by: None,
            quality_flags: QualityFlags::default(),
            teacher_status: TeacherStatus::default(),
            notes: String::new(),
        }
    }
}

impl TaskRecord {
    /// True when `completed` and `completed_by` agree (set iff completed).
    pub fn completion_coherent(&self) -> bool {
        self.completed == self.completed_by.is_some()
    }
}
