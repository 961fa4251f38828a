//! rbac-console binary entry point.
//!
//! Parses the command line, sets up file logging, loads the seed data and
//! config files, then runs the TUI with the terminal in raw mode and
//! restores it on exit.
//!
use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rbac_console::app::keymap::Keymap;
use rbac_console::app::{self, AppState, Screen, Theme};
use rbac_console::seed::SeedData;

/// Terminal console for users, roles and permissions.
#[derive(Parser, Debug)]
#[command(name = "rbac-console")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON seed file; the built-in dataset is used when omitted.
    #[arg(long, env = "RBAC_CONSOLE_SEED")]
    seed: Option<PathBuf>,

    /// Screen shown at start-up.
    #[arg(long, value_enum, default_value = "dashboard")]
    screen: Screen,

    /// Theme file (default: theme.conf in the config directory).
    #[arg(long, env = "RBAC_CONSOLE_THEME")]
    theme: Option<PathBuf>,

    /// Keybinding file (default: keybinds.conf in the config directory).
    #[arg(long, env = "RBAC_CONSOLE_KEYBINDS")]
    keybinds: Option<PathBuf>,

    /// Log file (default: rbac-console.log in the config directory).
    #[arg(long, env = "RBAC_CONSOLE_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Tracing filter, e.g. `info` or `rbac_console=debug`.
    #[arg(long, env = "RBAC_CONSOLE_LOG", default_value = "warn")]
    log_level: String,
}

/// The terminal belongs to the UI, so logs always go to a file.
fn init_logging(args: &Args) -> Result<()> {
    let path = args
        .log_file
        .clone()
        .unwrap_or_else(|| app::config_file_write_path("rbac-console.log"));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false),
        )
        .init();
    Ok(())
}

type Tui = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();
    terminal.show_cursor().ok();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let seed = SeedData::load(args.seed.as_deref()).context("failed to load seed data")?;
    let theme_path = args
        .theme
        .clone()
        .unwrap_or_else(|| app::config_file_write_path("theme.conf"));
    let keybinds_path = args
        .keybinds
        .clone()
        .unwrap_or_else(|| app::config_file_write_path("keybinds.conf"));
    let theme = Theme::load_or_init(&theme_path);
    let keymap = Keymap::load_or_init(&keybinds_path);
    info!(
        users = seed.users.len(),
        roles = seed.roles.len(),
        permissions = seed.permissions.len(),
        screen = ?args.screen,
        "starting"
    );

    let mut app = AppState::new(seed, theme, keymap, args.screen);
    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    if let Err(err) = &res {
        error!(%err, "application error");
    }
    res
}
