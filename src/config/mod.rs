use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::roster::Actor;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_FIRST_TASK: u32 = 323;
const DEFAULT_LAST_TASK: u32 = 622;

fn default_bind() -> String {
    // The board serves a whole crew over the LAN, not just localhost.
    "0.0.0.0".to_string()
}

// ─── Board section ────────────────────────────────────────────────────────────

/// The fixed task id range (`[board]` in config.toml).
///
/// Every id in the inclusive range exists from startup; ids outside it never
/// exist. Changing the range requires a restart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardSection {
    pub first_task: u32,
    pub last_task: u32,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self { first_task: DEFAULT_FIRST_TASK, last_task: DEFAULT_LAST_TASK }
    }
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// WebSocket server port (default: 5001).
    port: Option<u16>,
    /// Log level filter string, e.g. "debug", "info,boardd=trace" (default: "info").
    log: Option<String>,
    /// Bind address (default: "0.0.0.0"; use "127.0.0.1" to keep the board local).
    bind: Option<String>,
    /// Actor names eligible to receive assignments (subset of `[[actors]]`).
    assignable: Option<Vec<String>>,
    /// Task id range (`[board]`).
    board: Option<BoardSection>,
    /// The crew roster (`[[actors]]` tables).
    actors: Option<Vec<Actor>>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── DaemonConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log: String,
    /// Bind address for the WebSocket server (BOARDD_BIND env var, default: "0.0.0.0").
    pub bind: String,
    /// The fixed task id range served by this board.
    pub board: BoardSection,
    /// Static crew roster; falls back to the built-in nine-actor crew when
    /// config.toml defines none.
    pub actors: Vec<Actor>,
    /// Names eligible to receive assignments.
    pub assignable: Vec<String>,
}

impl DaemonConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());
        let bind = bind.or(toml.bind).unwrap_or_else(default_bind);

        let board = toml.board.unwrap_or_default();
        let board = if board.first_task > board.last_task {
            warn!(
                first_task = board.first_task,
                last_task = board.last_task,
                "invalid [board] range in config.toml — using the default range"
            );
            BoardSection::default()
        } else {
            board
        };

        let (actors, assignable) = match toml.actors {
            Some(actors) => (actors, toml.assignable.unwrap_or_default()),
            // No roster configured at all: built-in crew, so a fresh install
            // comes up usable without a config file.
            None => (default_actors(), toml.assignable.unwrap_or_else(default_assignable)),
        };

        Self { port, data_dir, log, bind, board, actors, assignable }
    }

    /// The inclusive task id range as used by the registry.
    pub fn task_range(&self) -> RangeInclusive<u32> {
        self.board.first_task..=self.board.last_task
    }
}

// ─── Built-in crew ────────────────────────────────────────────────────────────

/// Default roster: nine actors — one admin, one assigner, three assignable.
pub fn default_actors() -> Vec<Actor> {
    let plain = |name: &str, color: &str| Actor {
        name: name.to_string(),
        color: color.to_string(),
        admin: false,
        assign: false,
    };
    vec![
        plain("ada", "#FF6B6B"),
        Actor { name: "vera".to_string(), color: "#9B59B6".to_string(), admin: true, assign: false },
        plain("kai", "#2980B9"),
        plain("mira", "#FFA07A"),
        Actor { name: "theo".to_string(), color: "#4ECDC4".to_string(), admin: false, assign: true },
        plain("noor", "#2ECC71"),
        plain("finn", "#E67E22"),
        plain("iris", "#3498DB"),
        plain("remy", "#E74C3C"),
    ]
}

pub fn default_assignable() -> Vec<String> {
    vec!["ada".to_string(), "kai".to_string(), "noor".to_string()]
}

/// Starter config.toml written by `boardd init`. Mirrors the built-in
/// defaults so the rendered file behaves identically to no file at all.
pub fn sample_config() -> String {
    let mut out = String::from(
        r##"# boardd configuration. Every key is optional; CLI flags and BOARDD_* env
# vars take priority over this file. The daemon reads it once at startup.

# WebSocket + health port.
#port = 5001

# Log level filter, e.g. "debug" or "info,boardd=trace".
#log = "info"

# Bind address. The board serves a whole crew, so it defaults to 0.0.0.0;
# set 127.0.0.1 to keep it local.
#bind = "0.0.0.0"

# Actors eligible to receive assignments (subset of the roster below).
assignable = ["ada", "kai", "noor"]

# The fixed task id range. Every id in the range exists; ids outside it do not.
[board]
first_task = 323
last_task = 622

# The crew. `admin` may mark tasks and edit annotations; `assign` may hand
# tasks to the assignable actors above. Colors are attribution only.
"##,
    );
    for actor in default_actors() {
        out.push_str("\n[[actors]]\n");
        out.push_str(&format!("name = \"{}\"\n", actor.name));
        out.push_str(&format!("color = \"{}\"\n", actor.color));
        if actor.admin {
            out.push_str("admin = true\n");
        }
        if actor.assign {
            out.push_str("assign = true\n");
        }
    }
    out
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/boardd
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("boardd");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/boardd or ~/.local/share/boardd
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("boardd");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("boardd");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\boardd
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("boardd");
        }
    }
    // Fallback
    PathBuf::from(".boardd")
}

/// Public wrapper so `boardd init` can resolve the directory without
/// building a full config (which would try to read the file being created).
pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(default_data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(config.port, 5001);
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.task_range(), 323..=622);
        assert_eq!(config.actors.len(), 9);
        assert_eq!(config.assignable, vec!["ada", "kai", "noor"]);
        assert_eq!(config.actors.iter().filter(|a| a.admin).count(), 1);
        assert_eq!(config.actors.iter().filter(|a| a.assign).count(), 1);
    }

    #[test]
    fn cli_args_override_toml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = 6000\nlog = \"debug\"\n").unwrap();
        let config = DaemonConfig::new(
            Some(7000),
            Some(dir.path().to_path_buf()),
            None,
            Some("127.0.0.1".to_string()),
        );
        assert_eq!(config.port, 7000); // CLI wins
        assert_eq!(config.log, "debug"); // TOML fills the gap
        assert_eq!(config.bind, "127.0.0.1");
    }

    #[test]
    fn toml_roster_replaces_builtin() {
        let dir = TempDir::new().unwrap();
        let toml = r##"
assignable = ["lin"]

[board]
first_task = 1
last_task = 50

[[actors]]
name = "lin"
color = "#123456"
admin = true
"##;
        std::fs::write(dir.path().join("config.toml"), toml).unwrap();
        let config = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(config.task_range(), 1..=50);
        assert_eq!(config.actors.len(), 1);
        assert!(config.actors[0].admin);
        assert_eq!(config.assignable, vec!["lin"]);
    }

    #[test]
    fn unparseable_toml_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = {{{{").unwrap();
        let config = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(config.port, 5001);
        assert_eq!(config.actors.len(), 9);
    }

    #[test]
    fn inverted_board_range_falls_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[board]\nfirst_task = 100\nlast_task = 10\n",
        )
        .unwrap();
        let config = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(config.task_range(), 323..=622);
    }

    #[test]
    fn sample_config_round_trips_to_the_defaults() {
        let parsed: TomlConfig = toml::from_str(&sample_config()).unwrap();
        assert_eq!(parsed.actors.as_ref().map(Vec::len), Some(9));
        assert_eq!(parsed.board, Some(BoardSection::default()));
        assert_eq!(parsed.assignable, Some(default_assignable()));
        assert_eq!(parsed.actors, Some(default_actors()));
        // Commented-out keys really are commented out.
        assert_eq!(parsed.port, None);
    }
}
