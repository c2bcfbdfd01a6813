//! `board.*` — whole-board operations.

use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::AppContext;

/// Reinitialize every record. Destructive; the board logs the acting name.
pub async fn reset_all(params: Value, ctx: &AppContext) -> Result<Value> {
    let actor = params
        .get("actorName")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("missing actorName"))?;
    ctx.board.reset_all(actor).await?;
    Ok(json!({ "ok": true }))
}

/// On-demand copy of the init payload, for clients that want to resync
/// without reconnecting.
pub async fn snapshot(_params: Value, ctx: &AppContext) -> Result<Value> {
    let snap = ctx.board.snapshot().await;
    Ok(serde_json::to_value(snap)?)
}
