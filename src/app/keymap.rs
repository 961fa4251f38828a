//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! The file format is one binding per line, `<Action> = <KeySpec>`. Bindings in
//! the file are added on top of the defaults, so a file only needs the keys a
//! user wants to change.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

/// Semantic keyboard actions of the normal (non-modal) mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    NextScreen,
    PrevScreen,
    GotoDashboard,
    GotoUsers,
    GotoRoles,
    GotoPermissions,
    StartSearch,
    OpenFilterMenu,
    /// Sort by the next sortable column.
    SortNextColumn,
    /// Flip the direction of the current sort.
    ToggleSortDirection,
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    /// Select or unselect the highlighted row.
    ToggleRow,
    ToggleAll,
    New,
    Edit,
    Delete,
    BulkDelete,
    /// Drop every change and go back to the seed data.
    ReloadSeed,
    OpenHelp,
    Ignore,
}

const ACTIONS: [(KeyAction, &str); 24] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::NextScreen, "NextScreen"),
    (KeyAction::PrevScreen, "PrevScreen"),
    (KeyAction::GotoDashboard, "GotoDashboard"),
    (KeyAction::GotoUsers, "GotoUsers"),
    (KeyAction::GotoRoles, "GotoRoles"),
    (KeyAction::GotoPermissions, "GotoPermissions"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::OpenFilterMenu, "OpenFilterMenu"),
    (KeyAction::SortNextColumn, "SortNextColumn"),
    (KeyAction::ToggleSortDirection, "ToggleSortDirection"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PrevPage, "PrevPage"),
    (KeyAction::NextPage, "NextPage"),
    (KeyAction::ToggleRow, "ToggleRow"),
    (KeyAction::ToggleAll, "ToggleAll"),
    (KeyAction::New, "New"),
    (KeyAction::Edit, "Edit"),
    (KeyAction::Delete, "Delete"),
    (KeyAction::BulkDelete, "BulkDelete"),
    (KeyAction::ReloadSeed, "ReloadSeed"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::Ignore, "Ignore"),
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Default bindings: arrows and vim keys for movement, `1`-`4` for screens.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Tab), KeyAction::NextScreen);
        bindings.insert((M::NONE, BackTab), KeyAction::PrevScreen);
        // Some terminals report BackTab with SHIFT
        bindings.insert((M::SHIFT, BackTab), KeyAction::PrevScreen);
        bindings.insert((M::NONE, Char('1')), KeyAction::GotoDashboard);
        bindings.insert((M::NONE, Char('2')), KeyAction::GotoUsers);
        bindings.insert((M::NONE, Char('3')), KeyAction::GotoRoles);
        bindings.insert((M::NONE, Char('4')), KeyAction::GotoPermissions);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('f')), KeyAction::OpenFilterMenu);
        bindings.insert((M::NONE, Char('s')), KeyAction::SortNextColumn);
        bindings.insert((M::NONE, Char('o')), KeyAction::ToggleSortDirection);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Char(' ')), KeyAction::ToggleRow);
        bindings.insert((M::NONE, Char('a')), KeyAction::ToggleAll);
        bindings.insert((M::NONE, Char('n')), KeyAction::New);
        bindings.insert((M::NONE, Char('e')), KeyAction::Edit);
        bindings.insert((M::NONE, Enter), KeyAction::Edit);
        bindings.insert((M::NONE, Char('d')), KeyAction::Delete);
        bindings.insert((M::NONE, Delete), KeyAction::Delete);
        // crossterm reports an uppercase letter with SHIFT on most terminals
        bindings.insert((M::NONE, Char('D')), KeyAction::BulkDelete);
        bindings.insert((M::SHIFT, Char('D')), KeyAction::BulkDelete);
        bindings.insert((M::NONE, Char('R')), KeyAction::ReloadSeed);
        bindings.insert((M::SHIFT, Char('R')), KeyAction::ReloadSeed);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::SHIFT, Char('?')), KeyAction::OpenHelp);
        Self { bindings }
    }

    /// Load the keymap at `path`, writing a default file there if none exists.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            warn!(path = %path.display(), %err, "cannot write default keybinds");
        }
        km
    }

    /// Defaults overridden by the bindings in the file. `None` if it cannot be read.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => debug!(line, "keybind ignored"),
            }
        }
        Some(map)
    }

    /// Write every binding, sorted by action then key, so the file can be edited.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# rbac-console keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Tab, BackTab, Up, Down, Left, Right, PageUp, PageDown, Delete, Space, /\n\n");
        let mut lines: Vec<(usize, String)> = self
            .bindings
            .iter()
            .filter(|((mods, _), _)| !mods.contains(KeyModifiers::SHIFT))
            .map(|((mods, code), action)| {
                let order = ACTIONS.iter().position(|(a, _)| a == action).unwrap_or(usize::MAX);
                (order, format!("{} = {}", format_action(*action), Self::format_key(*mods, *code)))
            })
            .collect();
        lines.sort();
        for (_, line) in lines {
            let _ = writeln!(&mut buf, "{line}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Human-readable key spec such as `Ctrl+c`, `BackTab` or `Space`.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{code:?}"),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }

    /// Keys bound to `action`, formatted and sorted, for help text.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|((mods, _), a)| **a == action && !mods.contains(KeyModifiers::SHIFT))
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Space" => Char(' '),
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let name = s.trim();
    ACTIONS.iter().find(|(_, n)| *n == name).map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTIONS.iter().find(|(x, _)| *x == a).map_or("Ignore", |(_, n)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_handles_named_ctrl_and_single_chars() {
        assert_eq!(parse_key("Ctrl+c"), Some((KeyModifiers::CONTROL, KeyCode::Char('c'))));
        assert_eq!(parse_key(" Space "), Some((KeyModifiers::NONE, KeyCode::Char(' '))));
        assert_eq!(parse_key("PageDown"), Some((KeyModifiers::NONE, KeyCode::PageDown)));
        assert_eq!(parse_key("xy"), None);
    }

    #[test]
    fn every_action_name_round_trips() {
        for (action, name) in ACTIONS {
            assert_eq!(parse_action(name), Some(action));
            assert_eq!(format_action(action), name);
        }
    }

    #[test]
    fn defaults_cover_screen_numbers() {
        let km = Keymap::default();
        let key = KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE);
        assert_eq!(km.resolve(&key), Some(KeyAction::GotoRoles));
        assert_eq!(km.keys_for(KeyAction::BulkDelete), vec!["D".to_string()]);
    }
}
