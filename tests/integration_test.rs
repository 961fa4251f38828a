// Integration tests for rbac-console: store, list view and handlers through
// the public API, and whole key-driven flows through the app state.

use std::collections::VecDeque;

use rbac_console::model::{Permission, PermissionDraft, Role, RoleColumn, User, UserDraft};
use rbac_console::notify::{ConfirmRequest, Notifier, Severity};
use rbac_console::screen::EntityScreen;

/// Answers confirmations from a script and records everything it is shown.
#[derive(Default)]
struct Scripted {
    answers: VecDeque<bool>,
    asked: Vec<ConfirmRequest>,
    told: Vec<(String, Severity)>,
}

impl Scripted {
    fn answering(answers: &[bool]) -> Self {
        Self { answers: answers.iter().copied().collect(), ..Self::default() }
    }

    fn last_message(&self) -> Option<&str> {
        self.told.last().map(|(m, _)| m.as_str())
    }
}

impl Notifier for Scripted {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        self.asked.push(request.clone());
        self.answers.pop_front().unwrap_or(false)
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.told.push((message.to_string(), severity));
    }
}

fn permissions() -> EntityScreen<Permission> {
    EntityScreen::new(vec![
        Permission { id: 1, name: "Read".into(), description: "View records".into() },
        Permission { id: 2, name: "Write".into(), description: "Change records".into() },
        Permission { id: 3, name: "Delete".into(), description: "Remove records".into() },
    ])
}

fn roles(n: u64) -> EntityScreen<Role> {
    EntityScreen::new(
        (1..=n)
            .map(|id| Role {
                id,
                name: format!("Role {}", (b'A' + ((id * 7) % 26) as u8) as char),
                description: if id % 3 == 0 { "Ops team".into() } else { "Office staff".into() },
                permissions: Default::default(),
            })
            .collect(),
    )
}

// 1) Worked example: add then confirmed delete
#[test]
fn add_then_confirmed_delete_of_permission() {
    let mut screen = permissions();
    let mut n = Scripted::answering(&[true]);

    let id = screen.add(PermissionDraft::new("Export", "Export data"), &mut n).unwrap();
    assert_eq!(id, 4);
    assert_eq!(screen.store().len(), 4);
    assert_eq!(screen.store().list().last().map(|p| p.name.as_str()), Some("Export"));
    assert_eq!(n.last_message(), Some("Permission added successfully!"));

    assert!(screen.delete(2, &mut n));
    assert_eq!(screen.store().ids(), vec![1, 3, 4]);
    assert_eq!(n.asked.len(), 1);
    assert_eq!(n.asked[0].title, "Are you sure?");
    assert_eq!(n.asked[0].confirm_label, "Yes, delete it!");
    assert_eq!(n.last_message(), Some("Permission with ID 2 deleted successfully"));
}

// 2) Search results only hold entities with a matching field, any case
#[test]
fn search_matches_case_insensitively() {
    let mut screen = roles(12);
    // "OPS" hits descriptions only, "ROLE H" a single name
    for (term, expected) in [("OPS", 4), ("ROLE H", 1), ("role", 12)] {
        screen.set_search_input(term, std::time::Instant::now());
        screen.commit_search();
        let needle = term.to_lowercase();
        let mut all = Vec::new();
        let pages = screen.view().page_count;
        for page in 1..=pages {
            screen.goto_page(page);
            all.extend(screen.view().rows.into_iter().cloned());
        }
        assert_eq!(all.len(), expected, "{term}");
        assert!(all.iter().all(|r| {
            r.name.to_lowercase().contains(&needle) || r.description.to_lowercase().contains(&needle)
        }));
    }
    screen.set_search_input("role h", std::time::Instant::now());
    screen.commit_search();
    assert_eq!(screen.view().rows[0].name, "Role H");
}

// 3) Filter keeps exactly the chosen category
#[test]
fn filter_matches_exact_category_only() {
    let mut screen = roles(12);
    let first = screen.categories()[0].clone();
    screen.set_filter(Some(first.clone()));
    let view = screen.view();
    assert!(view.total >= 1);
    assert!(view.rows.iter().all(|r| r.name == first));
    screen.set_filter(None);
    assert_eq!(screen.view().total, 12);
}

// 4) Sorting twice on the same key restores ascending order
#[test]
fn sort_toggle_returns_to_ascending() {
    let mut screen = roles(5);
    screen.sort_by(RoleColumn::Name);
    let asc: Vec<u64> = screen.view().rows.iter().map(|r| r.id).collect();
    screen.sort_by(RoleColumn::Name);
    let desc: Vec<u64> = screen.view().rows.iter().map(|r| r.id).collect();
    assert_eq!(asc.iter().rev().copied().collect::<Vec<_>>(), desc);
    screen.sort_by(RoleColumn::Name);
    let again: Vec<u64> = screen.view().rows.iter().map(|r| r.id).collect();
    assert_eq!(asc, again);

    // permission sets cannot be sorted
    screen.sort_by(RoleColumn::Permissions);
    assert_eq!(screen.query().sort.key, RoleColumn::Name);
}

// 5) Page count is ceil(n / 5) and an empty result has no pages
#[test]
fn pagination_counts_and_empty_results() {
    let mut screen = roles(11);
    assert_eq!(screen.view().page_count, 3);
    screen.goto_page(3);
    assert_eq!(screen.view().rows.len(), 1);

    screen.set_search_input("no such role", std::time::Instant::now());
    screen.commit_search();
    let view = screen.view();
    assert_eq!((view.page_count, view.total, view.rows.len()), (0, 0, 0));
    assert_eq!(view.page, 1);
}

// 6) Missing required field: no mutation, warning, validation error
#[test]
fn add_with_missing_field_is_rejected() {
    let mut users = EntityScreen::<User>::new(Vec::new());
    let mut n = Scripted::default();
    let draft = UserDraft { name: "Dana".into(), ..UserDraft::default() };
    let err = users.add(draft, &mut n).unwrap_err();
    assert!(err.is_validation());
    assert!(users.store().is_empty());
    assert_eq!(n.told, vec![("required field(s) missing: Email".to_string(), Severity::Warning)]);
}

// 7) Unconfirmed delete changes nothing
#[test]
fn unconfirmed_delete_keeps_size() {
    let mut screen = permissions();
    let mut n = Scripted::answering(&[false]);
    assert!(!screen.delete(1, &mut n));
    assert_eq!(screen.store().len(), 3);
    assert!(n.told.is_empty());
}

// 8) Bulk delete: empty selection errors without asking, two ids removed on confirm
#[test]
fn bulk_delete_empty_then_two() {
    let mut screen = permissions();
    let mut n = Scripted::answering(&[true]);

    let err = screen.bulk_delete(&mut n).unwrap_err();
    assert_eq!(err.to_string(), "no permissions selected for deletion");
    assert!(n.asked.is_empty());
    assert_eq!(n.told.last().map(|(_, s)| *s), Some(Severity::Error));
    assert_eq!(screen.store().len(), 3);

    screen.toggle_row(1);
    screen.toggle_row(3);
    assert_eq!(screen.bulk_delete(&mut n).unwrap(), 2);
    assert_eq!(screen.store().ids(), vec![2]);
    assert!(screen.selection().is_empty());
    assert_eq!(n.asked[0].confirm_label, "Yes, delete them!");
    assert_eq!(n.last_message(), Some("2 permission(s) deleted successfully"));
}

// 9) Select-all toggles between every id and none
#[test]
fn select_all_toggles() {
    let mut screen = permissions();
    screen.toggle_all();
    assert_eq!(screen.selection().ids(), &[1, 2, 3]);
    screen.toggle_all();
    assert!(screen.selection().is_empty());
}

// 10) Deleting the only row of the last page moves back a page
#[test]
fn page_clamps_after_delete() {
    let mut screen = roles(6);
    screen.goto_page(2);
    let mut n = Scripted::answering(&[true]);
    let last = screen.view().rows[0].id;
    assert!(screen.delete(last, &mut n));
    assert_eq!(screen.query().page, 1);
}

mod app_flows {
    use std::time::{Duration, Instant};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rbac_console::app::keymap::Keymap;
    use rbac_console::app::update::{Flow, handle_key, tick};
    use rbac_console::app::{AppState, InputMode, ModalState, Screen, Theme};
    use rbac_console::model::Permission;
    use rbac_console::seed::SeedData;

    fn app(screen: Screen) -> AppState {
        AppState::new(SeedData::builtin().unwrap(), Theme::mocha(), Keymap::default(), screen)
    }

    fn press(app: &mut AppState, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE), Instant::now())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn new_permission_through_form() {
        let mut app = app(Screen::Permissions);
        let before = app.permissions.store().len();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.input_mode, InputMode::Modal);
        type_text(&mut app, "Audit");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Read the audit log");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.permissions.store().len(), before + 1);
        let latest = app.notifier.toasts.latest().map(|t| t.message.clone());
        assert_eq!(latest.as_deref(), Some("Permission added successfully!"));
    }

    #[test]
    fn invalid_form_stays_open() {
        let mut app = app(Screen::Roles);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);
        match &app.modal {
            Some(ModalState::RoleForm(form)) => assert!(form.error.is_some()),
            other => panic!("expected role form, got {other:?}"),
        }
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
    }

    #[test]
    fn delete_asks_then_removes_on_yes() {
        let mut app = app(Screen::Users);
        let before = app.users.store().len();
        let first = app.users.highlighted().map(|u| u.id).unwrap();

        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.modal, Some(ModalState::Confirm { .. })));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.users.store().len(), before);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.users.store().len(), before - 1);
        assert!(!app.users.store().contains(first));
    }

    #[test]
    fn bulk_delete_without_selection_reports_error() {
        let mut app = app(Screen::Roles);
        press(&mut app, KeyCode::Char('D'));
        assert!(app.modal.is_none());
        let latest = app.notifier.toasts.latest().map(|t| t.message.clone());
        assert_eq!(latest.as_deref(), Some("no roles selected for deletion"));
    }

    #[test]
    fn search_is_debounced_until_tick() {
        let mut app = app(Screen::Users);
        let total = app.users.view().total;
        let t0 = Instant::now();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE), t0);
        for c in "alice".chars() {
            handle_key(&mut app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), t0);
        }
        tick(&mut app, t0 + Duration::from_millis(100));
        assert_eq!(app.users.view().total, total);
        tick(&mut app, t0 + Duration::from_millis(600));
        assert_eq!(app.users.view().total, 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.users.view().total, total);
    }

    #[test]
    fn edit_on_empty_page_explains_instead() {
        let mut app = app(Screen::Permissions);
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "zzz");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.permissions.view().total, 0);

        press(&mut app, KeyCode::Char('e'));
        match &app.modal {
            Some(ModalState::Info { message }) => assert!(message.starts_with("No permissions")),
            other => panic!("expected info, got {other:?}"),
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.modal.is_none());
    }

    #[test]
    fn category_named_all_stays_selectable() {
        let named = |id: u64, name: &str| Permission {
            id,
            name: name.to_string(),
            description: format!("{name} access"),
        };
        let seed = SeedData { permissions: vec![named(1, "All"), named(2, "Read")], ..SeedData::default() };
        let mut app = AppState::new(seed, Theme::mocha(), Keymap::default(), Screen::Permissions);

        press(&mut app, KeyCode::Char('f'));
        match &app.modal {
            Some(ModalState::FilterMenu { selected, options }) => {
                assert_eq!(*selected, 0);
                assert_eq!(options, &["All", "Read"]);
            }
            other => panic!("expected filter menu, got {other:?}"),
        }
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.permissions.query().filter.as_deref(), Some("All"));
        assert_eq!(app.permissions.view().total, 1);

        // reopening points at the chosen category, Enter keeps it
        press(&mut app, KeyCode::Char('f'));
        match &app.modal {
            Some(ModalState::FilterMenu { selected, .. }) => assert_eq!(*selected, 1),
            other => panic!("expected filter menu, got {other:?}"),
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.permissions.query().filter.as_deref(), Some("All"));
        assert_eq!(app.permissions.view().total, 1);

        // the first row clears the filter
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.permissions.query().filter, None);
        assert_eq!(app.permissions.view().total, 2);
    }

    #[test]
    fn reload_restores_seed() {
        let mut app = app(Screen::Permissions);
        let before = app.permissions.store().len();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.permissions.store().len(), before - 1);
        press(&mut app, KeyCode::Char('R'));
        assert_eq!(app.permissions.store().len(), before);
    }

    #[test]
    fn screen_keys_and_quit() {
        let mut app = app(Screen::Dashboard);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.screen, Screen::Roles);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, Screen::Permissions);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.screen, Screen::Roles);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }
}
