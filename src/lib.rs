pub mod board;
pub mod config;
pub mod ipc;
pub mod metrics;
pub mod observability;
pub mod policy;
pub mod roster;
pub mod storage;

use std::sync::Arc;

use board::Board;
use config::DaemonConfig;
use ipc::event::EventBroadcaster;
use metrics::SharedMetrics;

/// Shared application state passed to every RPC handler and background task.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<DaemonConfig>,
    /// The board itself: registry + roster + policy + persistence.
    pub board: Arc<Board>,
    /// Fan-out channel every connected session subscribes to.
    pub broadcaster: Arc<EventBroadcaster>,
    pub metrics: SharedMetrics,
    pub started_at: std::time::Instant,
}
