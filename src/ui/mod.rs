pub mod components;
pub mod dashboard;
pub mod forms;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Tabs};

use crate::app::{AppState, InputMode, ModalState, Screen};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    render_header(f, root[0], app);

    match app.active() {
        Some(list) => table::render_entity_table(f, root[1], app, list),
        None => dashboard::render_dashboard(f, root[1], app),
    }

    components::render_status_bar(f, root[2], app);

    if let Some(modal) = &app.modal {
        render_modal(f, f.area(), app, modal);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let titles: Vec<Line> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
        .collect();
    let selected = Screen::ALL.iter().position(|s| *s == app.screen).unwrap_or(0);

    let mut title = vec![Span::styled(
        " rbac-console ",
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    )];
    if let (InputMode::Search, Some(list)) = (app.input_mode, app.active()) {
        title.push(Span::raw(format!(" search: {}_ ", list.search_input())));
    }

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .title(Line::from(title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg))
        .highlight_style(Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, modal: &ModalState) {
    match modal {
        ModalState::UserForm(form) => forms::render_form(f, area, app, form),
        ModalState::RoleForm(form) => forms::render_form(f, area, app, form),
        ModalState::PermissionForm(form) => forms::render_form(f, area, app, form),
        ModalState::FilterMenu { .. } => components::render_filter_modal(f, area, app, modal),
        ModalState::Confirm { .. } => components::render_confirm_modal(f, area, app, modal),
        ModalState::Info { .. } => components::render_info_modal(f, area, app, modal),
        ModalState::Help => components::render_help_modal(f, area, app),
    }
}
