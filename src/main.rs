use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

use boardd::{
    board::Board,
    config::{self, DaemonConfig},
    ipc::event::EventBroadcaster,
    metrics::{BoardMetrics, SharedMetrics},
    roster::Roster,
    storage::BoardStorage,
    AppContext,
};

#[derive(Parser)]
#[command(
    name = "boardd",
    about = "boardd — shared task-board sync daemon",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON-RPC WebSocket server port
    #[arg(long, env = "BOARDD_PORT")]
    port: Option<u16>,

    /// Data directory for the config file and board snapshot
    #[arg(long, env = "BOARDD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BOARDD_LOG")]
    log: Option<String>,

    /// Bind address for the WebSocket server (default: 0.0.0.0; use 127.0.0.1 to stay local)
    #[arg(long, env = "BOARDD_BIND")]
    bind: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "BOARDD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,

    /// Suppress progress and informational output.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Start the board daemon (default when no subcommand given).
    ///
    /// Runs boardd in the foreground. Viewers connect over WebSocket and
    /// receive the full board on connect plus every change as it happens.
    ///
    /// Examples:
    ///   boardd serve
    ///   boardd
    Serve,
    /// Write a starter config.toml to the data directory.
    ///
    /// The generated file mirrors the built-in defaults (task range, crew
    /// roster, assignable names) so it can be edited in place.
    ///
    /// Safe to re-run: an existing config.toml is never overwritten.
    ///
    /// Examples:
    ///   boardd init
    ///   boardd init --data-dir /srv/boardd
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ── Logging setup ────────────────────────────────────────────────────────
    // Init once — must happen before any tracing calls.
    let log_level = args.log.as_deref().unwrap_or("info").to_owned();
    let log_format = std::env::var("BOARDD_LOG_FORMAT")
        .unwrap_or_else(|_| "pretty".to_string());
    let _file_guard = setup_logging(&log_level, args.log_file.as_deref(), &log_format);

    match args.command {
        Some(Command::Init) => run_init(args.data_dir, args.quiet)?,
        None | Some(Command::Serve) => {
            run_server(args.port, args.data_dir, args.log, args.bind).await?;
        }
    }

    Ok(())
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("boardd.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stdout-only — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}

// ── Panic hook + crash log ────────────────────────────────────────────────────

/// Install a custom panic hook that writes panic info + backtrace to
/// `{data_dir}/crash.log`. The crash log is checked and removed on the next
/// startup (`check_crash_log`).
fn install_panic_hook(data_dir: std::path::PathBuf) {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Call the original hook first (prints to stderr).
        original(info);

        let crash_path = data_dir.join("crash.log");
        let msg = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("unknown panic");

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        let backtrace = std::backtrace::Backtrace::capture();
        let content = format!(
            "boardd panic at {location}\n\
             message: {msg}\n\
             version: {}\n\
             backtrace:\n{backtrace:#}\n",
            env!("CARGO_PKG_VERSION")
        );

        // Best-effort write — if this fails, we can't do much.
        let _ = std::fs::write(&crash_path, &content);
    }));
}

/// Check for a crash log from the previous run, log it at error level, then delete it.
fn check_crash_log(data_dir: &std::path::Path) {
    let crash_path = data_dir.join("crash.log");
    match std::fs::read_to_string(&crash_path) {
        Ok(content) => {
            tracing::error!(
                crash_report = %content.trim(),
                "previous daemon run ended with a panic — see crash report above"
            );
            let _ = std::fs::remove_file(&crash_path);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(err = %e, "could not read crash.log");
        }
    }
}

// ── boardd init ───────────────────────────────────────────────────────────────

fn run_init(data_dir: Option<std::path::PathBuf>, quiet: bool) -> Result<()> {
    let dir = config::resolve_data_dir(data_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory '{}'", dir.display()))?;

    let path = dir.join("config.toml");
    if path.exists() {
        if !quiet {
            println!("config already exists: {} (left untouched)", path.display());
        }
        return Ok(());
    }

    std::fs::write(&path, config::sample_config())
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    if !quiet {
        println!("wrote starter config: {}", path.display());
        println!("edit the roster, then start the board with: boardd serve");
    }
    Ok(())
}

// ── boardd serve ──────────────────────────────────────────────────────────────

async fn run_server(
    port: Option<u16>,
    data_dir: Option<std::path::PathBuf>,
    log: Option<String>,
    bind: Option<String>,
) -> Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "boardd starting");

    let config = Arc::new(DaemonConfig::new(port, data_dir, log, bind));
    info!(
        data_dir = %config.data_dir.display(),
        port = config.port,
        first_task = config.board.first_task,
        last_task = config.board.last_task,
        actors = config.actors.len(),
        "config loaded"
    );

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory '{}'", config.data_dir.display())
    })?;

    // ── Panic hook: write crash.log on panic ─────────────────────────────────
    install_panic_hook(config.data_dir.clone());
    // If previous run panicked, log the crash report and delete it.
    check_crash_log(&config.data_dir);

    let roster = Roster::new(config.actors.clone(), config.assignable.clone());
    if roster.is_empty() {
        warn!("roster is empty — every board operation will be denied");
    }

    let storage = BoardStorage::new(&config.data_dir);
    let registry = storage.load(config.task_range()).await;
    info!(
        tasks = registry.len(),
        completed = registry.completed_count(),
        "board loaded"
    );

    let broadcaster = EventBroadcaster::new();
    let metrics: SharedMetrics = Arc::new(BoardMetrics::new());

    let board = Arc::new(Board::new(
        registry,
        roster,
        storage,
        broadcaster.clone(),
        metrics.clone(),
    ));

    // Retain a handle for the final snapshot save after shutdown.
    let board_for_shutdown = board.clone();
    let ctx = Arc::new(AppContext {
        config,
        board,
        broadcaster: Arc::new(broadcaster),
        metrics,
        started_at: std::time::Instant::now(),
    });

    let run_result = boardd::ipc::run(ctx).await;

    // ── Final snapshot on clean shutdown ─────────────────────────────────────
    // In-flight fire-and-forget saves may have been cut off; write once more
    // so the file on disk matches the last in-memory state.
    match board_for_shutdown.save_now().await {
        Ok(()) => info!("final snapshot saved"),
        Err(e) => warn!(err = %e, "final snapshot save failed"),
    }

    run_result
}
