use serde_json::Value;
use tokio::sync::broadcast;

/// Broadcasts JSON-RPC notification strings to all connected WebSocket clients.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<String>,
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self { tx }
    }

    /// Render a JSON-RPC notification frame (no id, so no response expected).
    pub fn notification(method: &str, params: Value) -> String {
        let frame = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params
        });
        serde_json::to_string(&frame).unwrap_or_default()
    }

    /// Send a JSON-RPC notification to all connected clients.
    pub fn broadcast(&self, method: &str, params: Value) {
        // Ignore errors — no subscribers is fine
        let _ = self.tx.send(Self::notification(method, params));
    }

    /// Subscribe to all broadcast events.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Number of sessions currently subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
