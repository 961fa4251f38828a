//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the terminal console: which
//! screen is shown, the active modal, the colour theme and the config file
//! locations. The event loop lives in [`update`] and is re-exported as `run`.
//!
pub mod keymap;
pub mod update;

use std::path::{Path, PathBuf};
use std::time::Instant;

use ratatui::style::Color;
use tracing::{debug, warn};

use crate::dashboard::Totals;
use crate::form::ModalForm;
use crate::model::{EntityId, Permission, Role, User};
use crate::notify::{ConfirmRequest, PreparedNotifier, Severity};
use crate::screen::{EntityScreen, ScreenOps};
use crate::seed::SeedData;

use keymap::Keymap;

/// Directory name under the user's config home.
pub const APP_DIR: &str = "rbac-console";

/// `$XDG_CONFIG_HOME/rbac-console`, or `~/.config/rbac-console`.
pub fn config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join(APP_DIR))
}

/// Where a config file of that name should be written. Creates the config
/// directory; falls back to the working directory when there is no home.
pub fn config_file_write_path(name: &str) -> PathBuf {
    match config_dir() {
        Some(dir) => {
            if let Err(err) = std::fs::create_dir_all(&dir) {
                warn!(dir = %dir.display(), %err, "cannot create config dir");
                return PathBuf::from(name);
            }
            dir.join(name)
        }
        None => PathBuf::from(name),
    }
}

/// Top-level screen, switched from the sidebar keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Screen {
    Dashboard,
    Users,
    Roles,
    Permissions,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Dashboard, Screen::Users, Screen::Roles, Screen::Permissions];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Users => "Users",
            Screen::Roles => "Roles",
            Screen::Permissions => "Permissions",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
}

const THEME_KEYS: [&str; 14] = [
    "text",
    "muted",
    "title",
    "border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "highlight_bg",
    "success",
    "info",
    "warning",
    "error",
];

impl Theme {
    /// Catppuccin Mocha palette.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            success: Color::Rgb(0xa6, 0xe3, 0xa1), // green
            info: Color::Rgb(0x89, 0xb4, 0xfa),    // blue
            warning: Color::Rgb(0xfa, 0xb3, 0x87), // peach
            error: Color::Rgb(0xf3, 0x8b, 0xa8),   // red
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.success,
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "success" => &mut self.success,
            "info" => &mut self.info,
            "warning" => &mut self.warning,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    /// Load a key=value theme file. Unknown keys and bad colours are skipped;
    /// missing keys keep the `mocha` value.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            match (Self::parse_color(val), theme.slot(key)) {
                (Some(color), Some(slot)) => *slot = color,
                _ => debug!(key, val, "theme entry ignored"),
            }
        }
        Some(theme)
    }

    /// Parse hex (`#RRGGBB` or `RRGGBB`) or `reset`.
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
            Color::Black => "#000000".to_string(),
            Color::White => "#FFFFFF".to_string(),
            Color::Gray => "#B3B3B3".to_string(),
            Color::DarkGray => "#4D4D4D".to_string(),
            _ => "reset".to_string(),
        }
    }

    /// Persist the theme in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# rbac-console theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        let mut copy = *self;
        for key in THEME_KEYS {
            if let Some(color) = copy.slot(key) {
                let _ = writeln!(&mut buf, "{key} = {}", Self::color_to_str(*color));
            }
        }
        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing the defaults there first if it is missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(err) = theme.write_file(path) {
            warn!(path = %path.display(), %err, "cannot write default theme");
        }
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Deletions waiting on the confirm dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingAction {
    Delete { screen: Screen, id: EntityId },
    BulkDelete { screen: Screen },
}

/// Modal dialogs layered over the current screen.
#[derive(Clone, Debug)]
pub enum ModalState {
    UserForm(ModalForm<User>),
    RoleForm(ModalForm<Role>),
    PermissionForm(ModalForm<Permission>),
    /// Row 0 is "All" and is not part of `options`; row `i + 1` is `options[i]`.
    FilterMenu {
        selected: usize,
        options: Vec<String>,
    },
    Confirm {
        request: ConfirmRequest,
        action: PendingAction,
        /// 0 confirms, 1 cancels.
        selected: usize,
    },
    Info {
        message: String,
    },
    Help,
}

pub struct AppState {
    pub started_at: Instant,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub users: EntityScreen<User>,
    pub roles: EntityScreen<Role>,
    pub permissions: EntityScreen<Permission>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    /// Confirm answers and the toast log shown in the status bar.
    pub notifier: PreparedNotifier,
}

impl AppState {
    pub fn new(seed: SeedData, theme: Theme, keymap: Keymap, screen: Screen) -> Self {
        Self {
            started_at: Instant::now(),
            screen,
            input_mode: InputMode::Normal,
            users: EntityScreen::new(seed.users),
            roles: EntityScreen::new(seed.roles),
            permissions: EntityScreen::new(seed.permissions),
            theme,
            keymap,
            modal: None,
            notifier: PreparedNotifier::default(),
        }
    }

    /// The entity screen behind `screen`; `None` for the dashboard.
    pub fn list(&self, screen: Screen) -> Option<&dyn ScreenOps> {
        match screen {
            Screen::Dashboard => None,
            Screen::Users => Some(&self.users),
            Screen::Roles => Some(&self.roles),
            Screen::Permissions => Some(&self.permissions),
        }
    }

    pub fn list_mut(&mut self, screen: Screen) -> Option<&mut dyn ScreenOps> {
        match screen {
            Screen::Dashboard => None,
            Screen::Users => Some(&mut self.users),
            Screen::Roles => Some(&mut self.roles),
            Screen::Permissions => Some(&mut self.permissions),
        }
    }

    pub fn active(&self) -> Option<&dyn ScreenOps> {
        self.list(self.screen)
    }

    pub fn active_mut(&mut self) -> Option<&mut dyn ScreenOps> {
        self.list_mut(self.screen)
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.users, &self.roles, &self.permissions)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
