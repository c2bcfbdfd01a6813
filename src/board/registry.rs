// SPDX-License-Identifier: MIT
//! Fixed-range task table.
//!
//! The registry owns one [`TaskRecord`] per id in a contiguous inclusive
//! range. Ids outside the range do not exist and cannot be created, so every
//! lookup is either a hit or a definitive miss.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use tracing::warn;

use crate::board::record::TaskRecord;

/// All task records for the configured id range.
///
/// Cloning is deliberate and cheap enough at this scale (a few hundred small
/// records); snapshots for persistence and init payloads clone the whole
/// registry so no lock is held across I/O.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    range: RangeInclusive<u32>,
    tasks: BTreeMap<u32, TaskRecord>,
}

impl TaskRegistry {
    /// Fresh registry with a default record for every id in `range`.
    pub fn new(range: RangeInclusive<u32>) -> Self {
        let tasks = range.clone().map(|id| (id, TaskRecord::default())).collect();
        Self { range, tasks }
    }

    /// Rebuild a registry from loaded records.
    ///
    /// Records outside `range` are dropped with a warning; ids inside the
    /// range that are missing from `records` get a default record. The result
    /// always covers the full range exactly.
    pub fn from_records(range: RangeInclusive<u32>, records: BTreeMap<u32, TaskRecord>) -> Self {
        let mut registry = Self::new(range);
        let mut dropped = 0usize;
        for (id, record) in records {
            if registry.range.contains(&id) {
                registry.tasks.insert(id, record);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!(dropped, "discarded task records outside the configured id range");
        }
        registry
    }

    pub fn range(&self) -> &RangeInclusive<u32> {
        &self.range
    }

    pub fn contains(&self, id: u32) -> bool {
        self.range.contains(&id)
    }

    pub fn get(&self, id: u32) -> Option<&TaskRecord> {
        self.tasks.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut TaskRecord> {
        self.tasks.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &TaskRecord)> {
        self.tasks.iter().map(|(id, record)| (*id, record))
    }

    /// Replace every record with the default, keeping the range.
    pub fn reset_all(&mut self) {
        for record in self.tasks.values_mut() {
            *record = TaskRecord::default();
        }
    }

    /// Count of records currently marked completed.
    pub fn completed_count(&self) -> usize {
        self.tasks.values().filter(|r| r.completed).count()
    }
}
