//! Criterion benchmarks for hot paths in the boardd daemon.
//!
//! Run with:
//!   cargo bench
//!
//! Covers:
//!   - JSON-RPC request parsing (serde_json)
//!   - Policy check + mutation apply (the per-op critical section)
//!   - Full-board snapshot serialization (init push / persisted document)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::Value;

use boardd::board::mutation::{self, TaskOp};
use boardd::board::record::TaskRecord;
use boardd::board::registry::TaskRegistry;
use boardd::board::BoardSnapshot;
use boardd::policy;
use boardd::roster::{Actor, Roster};

// ─── JSON-RPC parsing ────────────────────────────────────────────────────────

static TASK_TOGGLE: &str = r#"{
    "jsonrpc": "2.0",
    "id": 42,
    "method": "task.toggle",
    "params": {
        "taskId": 451,
        "actorName": "ada"
    }
}"#;

static DAEMON_STATUS: &str = r#"{
    "jsonrpc": "2.0",
    "id": 1,
    "method": "daemon.status",
    "params": {}
}"#;

fn bench_rpc_parse(c: &mut Criterion) {
    c.bench_function("rpc_parse_task_toggle", |b| {
        b.iter(|| {
            let v: Value = serde_json::from_str(black_box(TASK_TOGGLE)).unwrap();
            black_box(v);
        });
    });

    c.bench_function("rpc_parse_daemon_status", |b| {
        b.iter(|| {
            let v: Value = serde_json::from_str(black_box(DAEMON_STATUS)).unwrap();
            black_box(v);
        });
    });

    c.bench_function("rpc_serialize_ack", |b| {
        let resp = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 42,
            "result": { "ok": true }
        });
        b.iter(|| {
            let s = serde_json::to_string(black_box(&resp)).unwrap();
            black_box(s);
        });
    });
}

// ─── Policy + apply ──────────────────────────────────────────────────────────
//
// The work done per accepted op inside the registry write lock, minus the
// lock itself: authorize against the current record, then apply.

fn bench_roster() -> Roster {
    let actor = |name: &str, admin: bool, assign: bool| Actor {
        name: name.to_string(),
        color: "#FF6B6B".to_string(),
        admin,
        assign,
    };
    Roster::new(
        vec![
            actor("ada", false, false),
            actor("vera", true, false),
            actor("theo", false, true),
            actor("kai", false, false),
        ],
        vec!["ada".to_string(), "kai".to_string()],
    )
}

fn bench_policy_apply(c: &mut Criterion) {
    let roster = bench_roster();

    c.bench_function("authorize_claim_open_task", |b| {
        let record = TaskRecord::default();
        let actor = roster.get("ada").unwrap();
        b.iter(|| {
            let r = policy::authorize(
                black_box(actor),
                black_box(&record),
                black_box(&TaskOp::Toggle),
                &roster,
            );
            black_box(r).unwrap();
        });
    });

    c.bench_function("authorize_and_apply_toggle", |b| {
        let actor = roster.get("ada").unwrap();
        b.iter_with_setup(TaskRecord::default, |mut record| {
            if policy::authorize(actor, &record, &TaskOp::Toggle, &roster).is_ok() {
                mutation::apply(&mut record, &TaskOp::Toggle, "ada");
            }
            black_box(record);
        });
    });

    c.bench_function("authorize_assign_with_target_lookup", |b| {
        let record = TaskRecord::default();
        let actor = roster.get("theo").unwrap();
        let op = TaskOp::Assign { target: Some("kai".to_string()) };
        b.iter(|| {
            let r = policy::authorize(black_box(actor), &record, black_box(&op), &roster);
            black_box(r).unwrap();
        });
    });
}

// ─── Snapshot serialization ──────────────────────────────────────────────────
//
// A full board is re-serialized on every init push and every persisted save,
// so this is the largest single allocation the daemon makes per op.

fn bench_snapshot_serialize(c: &mut Criterion) {
    let roster = bench_roster();
    let mut registry = TaskRegistry::new(323..=622);
    // Partially worked board, closer to live shape than all-default records.
    for id in (323..=622).step_by(3) {
        let record = registry.get_mut(id).unwrap();
        record.completed = true;
        record.completed_by = Some("ada".to_string());
    }

    let snapshot = BoardSnapshot {
        tasks: registry.iter().map(|(id, r)| (id, r.clone())).collect(),
        actors: roster.table(),
        assignable: roster.assignable().to_vec(),
    };

    c.bench_function("serialize_init_payload_300_tasks", |b| {
        b.iter(|| {
            let s = serde_json::to_string(black_box(&snapshot)).unwrap();
            black_box(s);
        });
    });

    c.bench_function("serialize_snapshot_document_300_tasks", |b| {
        b.iter(|| {
            let records: std::collections::BTreeMap<u32, &TaskRecord> = registry.iter().collect();
            let s = serde_json::to_string_pretty(black_box(&records)).unwrap();
            black_box(s);
        });
    });
}

// ─── Entry point ─────────────────────────────────────────────────────────────

criterion_group!(
    benches,
    bench_rpc_parse,
    bench_policy_apply,
    bench_snapshot_serialize
);
criterion_main!(benches);
