use crate::AppContext;
use anyhow::Result;
use serde_json::{json, Value};

pub async fn ping(_params: Value, _ctx: &AppContext) -> Result<Value> {
    Ok(json!({ "pong": true }))
}

pub async fn status(_params: Value, ctx: &AppContext) -> Result<Value> {
    let uptime = ctx.started_at.elapsed().as_secs();
    let (first, last, tasks, completed) = ctx.board.counts().await;
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": uptime,
        "port": ctx.config.port,
        "taskRange": { "start": first, "end": last },
        "tasks": tasks,
        "completed": completed,
        "activeConnections": ctx.metrics.open_connections(),
        "counters": ctx.metrics.snapshot()
    }))
}
