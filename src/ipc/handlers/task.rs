//! `task.*` — mutations against a single task record.
//!
//! All five methods share the same contract: resolve params, run the op
//! through the board, ack with `{ "ok": true }`. The updated record is not
//! echoed in the response; the requester learns the new state from the same
//! `task.updated` broadcast every other session receives. Ops addressed to
//! ids outside the board range are acked and ignored.

use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::board::mutation::TaskOp;
use crate::board::record::{QualityFlagKind, TeacherStatus};
use crate::AppContext;

fn sv<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key).and_then(|v| v.as_str())
}

/// Task ids arrive as JSON numbers from current clients, but older ones sent
/// the id as a string. Accept both.
fn task_id(params: &Value) -> Result<u32> {
    match params.get("taskId") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| anyhow!("invalid taskId")),
        Some(Value::String(s)) => s.parse::<u32>().map_err(|_| anyhow!("invalid taskId")),
        _ => Err(anyhow!("missing taskId")),
    }
}

fn actor_name<'a>(params: &'a Value) -> Result<&'a str> {
    sv(params, "actorName").ok_or_else(|| anyhow!("missing actorName"))
}

async fn run_op(params: &Value, ctx: &AppContext, op: TaskOp) -> Result<Value> {
    let id = task_id(params)?;
    let actor = actor_name(params)?;
    ctx.board.apply_op(id, actor, op).await?;
    Ok(json!({ "ok": true }))
}

pub async fn toggle(params: Value, ctx: &AppContext) -> Result<Value> {
    run_op(&params, ctx, TaskOp::Toggle).await
}

pub async fn mark(params: Value, ctx: &AppContext) -> Result<Value> {
    run_op(&params, ctx, TaskOp::ToggleMark).await
}

pub async fn update_quality_flag(params: Value, ctx: &AppContext) -> Result<Value> {
    let flag: QualityFlagKind = params
        .get("flag")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .ok_or_else(|| anyhow!("missing or invalid flag"))?;
    let value = params
        .get("value")
        .and_then(Value::as_bool)
        .ok_or_else(|| anyhow!("missing or invalid value"))?;
    run_op(&params, ctx, TaskOp::SetQualityFlag { flag, value }).await
}

pub async fn update_teacher_status(params: Value, ctx: &AppContext) -> Result<Value> {
    let status: TeacherStatus = params
        .get("status")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .ok_or_else(|| anyhow!("missing or invalid status"))?;
    run_op(&params, ctx, TaskOp::SetTeacherStatus { status }).await
}

pub async fn assign(params: Value, ctx: &AppContext) -> Result<Value> {
    let target = match params.get("assignTo") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(anyhow!("invalid assignTo")),
    };
    run_op(&params, ctx, TaskOp::Assign { target }).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_accepts_number_and_string() {
        assert_eq!(task_id(&json!({ "taskId": 323 })).unwrap(), 323);
        assert_eq!(task_id(&json!({ "taskId": "400" })).unwrap(), 400);
    }

    #[test]
    fn task_id_rejects_garbage() {
        assert!(task_id(&json!({})).is_err());
        assert!(task_id(&json!({ "taskId": -1 })).is_err());
        assert!(task_id(&json!({ "taskId": "abc" })).is_err());
        assert!(task_id(&json!({ "taskId": 4294967296_u64 })).is_err());
    }

    #[test]
    fn actor_name_must_be_a_string() {
        assert_eq!(actor_name(&json!({ "actorName": "ada" })).unwrap(), "ada");
        assert!(actor_name(&json!({ "actorName": 7 })).is_err());
        assert!(actor_name(&json!({})).is_err());
    }
}
