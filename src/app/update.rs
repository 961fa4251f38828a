//! Event loop and key handling.
//!
//! Key events are routed by input mode: modal dialogs first, then the search
//! box, then the keymap. Everything but [`run_app`] is terminal-free so the
//! flows can be driven from tests with synthetic key events.

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use super::keymap::KeyAction;
use super::{AppState, InputMode, ModalState, PendingAction, Screen};
use crate::form::{FieldKind, ModalForm, SubmitOutcome};
use crate::handlers;
use crate::model::{Entity, EntityId, EntityKind};
use crate::notify::{Notifier, PreparedNotifier, Severity};
use crate::screen::{EntityScreen, ScreenOps};
use crate::ui;

/// Whether the loop keeps going after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app)).context("draw frame")?;

        if event::poll(Duration::from_millis(100)).context("poll terminal events")? {
            if let Event::Key(key) = event::read().context("read terminal event")? {
                if key.kind == KeyEventKind::Press && handle_key(app, key, Instant::now()) == Flow::Quit {
                    break;
                }
            }
        }
        tick(app, Instant::now());
    }

    info!(uptime_s = app.started_at.elapsed().as_secs(), "quit");
    Ok(())
}

/// Apply any search input whose debounce delay has passed.
pub fn tick(app: &mut AppState, now: Instant) {
    app.users.tick(now);
    app.roles.tick(now);
    app.permissions.tick(now);
}

pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> Flow {
    match app.input_mode {
        InputMode::Modal => {
            handle_modal_key(app, key.code);
            Flow::Continue
        }
        InputMode::Search => {
            handle_search_key(app, key.code, now);
            Flow::Continue
        }
        InputMode::Normal => match app.keymap.resolve(&key) {
            Some(action) => handle_action(app, action),
            None => Flow::Continue,
        },
    }
}

/// The screen's list and the notifier, borrowed together.
fn split(app: &mut AppState, screen: Screen) -> (Option<&mut dyn ScreenOps>, &mut PreparedNotifier) {
    let list: Option<&mut dyn ScreenOps> = match screen {
        Screen::Dashboard => None,
        Screen::Users => Some(&mut app.users),
        Screen::Roles => Some(&mut app.roles),
        Screen::Permissions => Some(&mut app.permissions),
    };
    (list, &mut app.notifier)
}

fn open_modal(app: &mut AppState, modal: ModalState) {
    app.modal = Some(modal);
    app.input_mode = InputMode::Modal;
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

fn switch_screen(app: &mut AppState, screen: Screen) {
    if app.screen != screen {
        debug!(from = ?app.screen, to = ?screen, "switch screen");
        app.screen = screen;
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Flow {
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::NextScreen => {
            let next = app.screen.next();
            switch_screen(app, next);
        }
        KeyAction::PrevScreen => {
            let prev = app.screen.prev();
            switch_screen(app, prev);
        }
        KeyAction::GotoDashboard => switch_screen(app, Screen::Dashboard),
        KeyAction::GotoUsers => switch_screen(app, Screen::Users),
        KeyAction::GotoRoles => switch_screen(app, Screen::Roles),
        KeyAction::GotoPermissions => switch_screen(app, Screen::Permissions),
        KeyAction::StartSearch => {
            if app.active().is_some() {
                app.input_mode = InputMode::Search;
            }
        }
        KeyAction::OpenFilterMenu => {
            if let Some(list) = app.active() {
                let options = list.categories();
                let selected = list
                    .filter()
                    .and_then(|f| options.iter().position(|o| o == f))
                    .map_or(0, |i| i + 1);
                open_modal(app, ModalState::FilterMenu { selected, options });
            }
        }
        KeyAction::SortNextColumn => with_active(app, |l| l.sort_next_column()),
        KeyAction::ToggleSortDirection => with_active(app, |l| l.reverse_sort()),
        KeyAction::MoveUp => with_active(app, |l| l.cursor_up()),
        KeyAction::MoveDown => with_active(app, |l| l.cursor_down()),
        KeyAction::PrevPage => with_active(app, |l| l.prev_page()),
        KeyAction::NextPage => with_active(app, |l| l.next_page()),
        KeyAction::ToggleRow => with_active(app, |l| l.toggle_highlighted()),
        KeyAction::ToggleAll => with_active(app, |l| l.toggle_all()),
        KeyAction::New => open_form(app, None),
        KeyAction::Edit => match highlighted(app) {
            Some((_, Some(id))) => open_form(app, Some(id)),
            Some((kind, None)) => nothing_highlighted(app, kind),
            None => {}
        },
        KeyAction::Delete => match highlighted(app) {
            Some((kind, Some(id))) => {
                let request = handlers::delete_request(kind, id);
                let action = PendingAction::Delete { screen: app.screen, id };
                open_modal(app, ModalState::Confirm { request, action, selected: 0 });
            }
            Some((kind, None)) => nothing_highlighted(app, kind),
            None => {}
        },
        KeyAction::BulkDelete => request_bulk_delete(app),
        KeyAction::ReloadSeed => {
            app.users.reload();
            app.roles.reload();
            app.permissions.reload();
            info!("reloaded seed data");
            app.notifier.notify("Seed data reloaded", Severity::Info);
        }
        KeyAction::OpenHelp => open_modal(app, ModalState::Help),
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

/// Kind of the active screen and the id under its cursor.
fn highlighted(app: &AppState) -> Option<(EntityKind, Option<EntityId>)> {
    app.active().map(|l| (l.kind(), l.highlighted_id()))
}

fn nothing_highlighted(app: &mut AppState, kind: EntityKind) {
    let message = format!("No {} match the current search and filter.", kind.plural());
    open_modal(app, ModalState::Info { message });
}

fn with_active(app: &mut AppState, f: impl FnOnce(&mut dyn ScreenOps)) {
    if let Some(list) = app.active_mut() {
        f(list);
    }
}

/// Empty selections go straight to the handler, which reports the error
/// without asking; otherwise the batch needs confirming first.
fn request_bulk_delete(app: &mut AppState) {
    let screen = app.screen;
    let Some((kind, count)) = app.active().map(|l| (l.kind(), l.selected())) else {
        return;
    };
    if count == 0 {
        let (list, notifier) = split(app, screen);
        if let Some(list) = list {
            if let Err(err) = list.bulk_delete(notifier) {
                debug!(%err, "bulk delete refused");
            }
        }
        return;
    }
    let request = handlers::bulk_delete_request(kind, count);
    let action = PendingAction::BulkDelete { screen };
    open_modal(app, ModalState::Confirm { request, action, selected: 0 });
}

/// New form when `id` is `None`, otherwise an edit form prefilled from that entity.
fn open_form(app: &mut AppState, id: Option<EntityId>) {
    fn build<T: Entity>(screen: &EntityScreen<T>, id: Option<EntityId>) -> Option<ModalForm<T>> {
        match id {
            None => Some(ModalForm::create()),
            Some(id) => screen.store().get(id).map(ModalForm::edit),
        }
    }
    let modal = match app.screen {
        Screen::Dashboard => None,
        Screen::Users => build(&app.users, id).map(ModalState::UserForm),
        Screen::Roles => build(&app.roles, id).map(ModalState::RoleForm),
        Screen::Permissions => build(&app.permissions, id).map(ModalState::PermissionForm),
    };
    if let Some(modal) = modal {
        open_modal(app, modal);
    }
}

fn handle_search_key(app: &mut AppState, code: KeyCode, now: Instant) {
    let Some(list) = app.active_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match code {
        KeyCode::Esc => {
            list.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            list.commit_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => list.erase_search(now),
        KeyCode::Char(c) => list.type_search(c, now),
        _ => {}
    }
}

/// Keys inside a form. Returns false once the form should close.
fn form_key<T: Entity>(
    form: &mut ModalForm<T>,
    code: KeyCode,
    screen: &mut EntityScreen<T>,
    notifier: &mut dyn Notifier,
) -> bool {
    match code {
        KeyCode::Esc => return false,
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter => {
            return match form.submit(screen, notifier) {
                SubmitOutcome::Closed => false,
                SubmitOutcome::Invalid(_) => true,
            };
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Left | KeyCode::Right => form.activate(),
        KeyCode::Char(' ') if form.focused().is_some_and(|f| f.kind != FieldKind::Text) => {
            form.activate()
        }
        KeyCode::Char(c) => form.type_char(c),
        _ => {}
    }
    true
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    let Some(modal) = app.modal.take() else {
        close_modal(app);
        return;
    };
    let next = match modal {
        ModalState::UserForm(mut form) => form_key(&mut form, code, &mut app.users, &mut app.notifier)
            .then_some(ModalState::UserForm(form)),
        ModalState::RoleForm(mut form) => form_key(&mut form, code, &mut app.roles, &mut app.notifier)
            .then_some(ModalState::RoleForm(form)),
        ModalState::PermissionForm(mut form) => {
            form_key(&mut form, code, &mut app.permissions, &mut app.notifier)
                .then_some(ModalState::PermissionForm(form))
        }
        ModalState::FilterMenu { mut selected, options } => match code {
            KeyCode::Esc => None,
            KeyCode::Up | KeyCode::Char('k') => {
                selected = selected.saturating_sub(1);
                Some(ModalState::FilterMenu { selected, options })
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if selected < options.len() {
                    selected += 1;
                }
                Some(ModalState::FilterMenu { selected, options })
            }
            KeyCode::Enter => {
                let filter = selected.checked_sub(1).and_then(|i| options.get(i).cloned());
                debug!(?filter, "apply filter");
                with_active(app, |l| l.set_filter(filter));
                None
            }
            _ => Some(ModalState::FilterMenu { selected, options }),
        },
        ModalState::Confirm { request, action, selected } => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                Some(ModalState::Confirm { request, action, selected: 1 - selected })
            }
            KeyCode::Char('y') => {
                perform_pending_action(app, action, true);
                None
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                perform_pending_action(app, action, false);
                None
            }
            KeyCode::Enter => {
                perform_pending_action(app, action, selected == 0);
                None
            }
            _ => Some(ModalState::Confirm { request, action, selected }),
        },
        ModalState::Info { message } => match code {
            KeyCode::Esc | KeyCode::Enter => None,
            _ => Some(ModalState::Info { message }),
        },
        ModalState::Help => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => None,
            _ => Some(ModalState::Help),
        },
    };
    match next {
        Some(modal) => open_modal(app, modal),
        None => close_modal(app),
    }
}

/// Run a confirmed (or declined) deletion through its handler.
pub fn perform_pending_action(app: &mut AppState, action: PendingAction, confirmed: bool) {
    match action {
        PendingAction::Delete { screen, id } => {
            if let (Some(list), notifier) = split(app, screen) {
                list.delete(id, notifier.answer(confirmed));
            }
        }
        PendingAction::BulkDelete { screen } => {
            if let (Some(list), notifier) = split(app, screen) {
                if let Err(err) = list.bulk_delete(notifier.answer(confirmed)) {
                    debug!(%err, "bulk delete refused");
                }
            }
        }
    }
}
