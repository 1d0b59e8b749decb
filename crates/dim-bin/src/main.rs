//! dim entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::{FsLineStore, Host, LineStore, handle_key};
use core_config::{Config, load_from};
use core_events::{KeyEvent, KeySource};
use core_render::RenderEngine;
use core_state::{Buffer, EditorSettings, EditorState};
use core_syntax::ProfileRegistry;
use core_terminal::{CrosstermBackend, CrosstermKeys, TerminalBackend};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "dim.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "dim", version, about = "dim modal text editor")]
struct Args {
    /// File to open at startup. If omitted an empty unnamed buffer is used.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `dim.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Key sources that also learn about terminal resizes.
trait ResizeSource: KeySource {
    fn take_resize(&mut self) -> Option<(u16, u16)>;
}

impl ResizeSource for CrosstermKeys {
    fn take_resize(&mut self) -> Option<(u16, u16)> {
        CrosstermKeys::take_resize(self)
    }
}

/// Interactive host: keys from `K`, frames painted into `W`, files on disk.
struct TerminalHost<K, W> {
    keys: K,
    out: W,
    engine: RenderEngine,
    store: FsLineStore,
    size: (u16, u16),
}

impl<K: ResizeSource, W: Write> TerminalHost<K, W> {
    fn new(keys: K, out: W, size: (u16, u16)) -> Self {
        Self {
            keys,
            out,
            engine: RenderEngine::new(),
            store: FsLineStore,
            size,
        }
    }
}

impl<K: ResizeSource, W: Write> KeySource for TerminalHost<K, W> {
    fn read_key(&mut self) -> Result<KeyEvent> {
        let key = self.keys.read_key()?;
        if let Some(size) = self.keys.take_resize() {
            debug!(target: "runtime", cols = size.0, rows = size.1, "resized");
            self.size = size;
        }
        Ok(key)
    }
}

impl<K: ResizeSource, W: Write> Host for TerminalHost<K, W> {
    fn refresh(&mut self, state: &mut EditorState) -> Result<()> {
        let (cols, rows) = self.size;
        self.engine.render(state, cols, rows, &mut self.out)
    }

    fn line_store(&mut self) -> &mut dyn LineStore {
        &mut self.store
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Session for `path` under `config`. A file that cannot be read is fatal.
fn bootstrap_state(
    config: &Config,
    path: Option<&Path>,
    store: &mut dyn LineStore,
) -> Result<EditorState> {
    let settings = EditorSettings::from_config(&config.file);
    let profiles = ProfileRegistry::with_user_profiles(&config.file.syntax.profiles);
    let mut state = EditorState::with_settings(Buffer::new(), settings, profiles);
    if let Some(path) = path {
        let lines = store.load_lines(path)?;
        info!(
            target: "io",
            file = %path.display(),
            rows = lines.len(),
            "startup_file_loaded"
        );
        state.load(path.to_path_buf(), lines);
    }
    Ok(state)
}

/// Paint, read, dispatch until a quit action completes.
fn run(state: &mut EditorState, host: &mut dyn Host) -> Result<()> {
    loop {
        host.refresh(state)?;
        let key = host.read_key()?;
        if handle_key(state, host, key)?.quit {
            info!(target: "runtime", "quit");
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(args.config.clone())?;
    let mut state = bootstrap_state(&config, args.path.as_deref(), &mut FsLineStore)?;
    let buffer_name = state.display_name();
    let config_path = config.path.as_ref().map(|p| p.display().to_string());
    info!(
        target: "runtime",
        buffer = buffer_name.as_str(),
        filetype = state.filetype(),
        config = config_path.as_deref(),
        "bootstrap_complete"
    );

    let mut backend = CrosstermBackend::new();
    backend.set_title(&format!("dim - {buffer_name}"))?;
    let size = backend.size()?;
    let _guard = backend.enter_guard()?;
    let mut host = TerminalHost::new(CrosstermKeys::new(), std::io::stdout(), size);
    run(&mut state, &mut host)
}
