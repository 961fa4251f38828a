//! Shared UI components (status bar, modal helpers).
//!
//! Contains small building blocks reused by every screen.
//!
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};

/// How long a notification stays in the status bar.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Bottom status bar: the latest notification while fresh, else mode and hints.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    if let Some(toast) = app.notifier.toasts.visible(Instant::now(), TOAST_TTL) {
        let p = Paragraph::new(format!(" {}: {}", toast.severity.as_str(), toast.message)).style(
            Style::default()
                .fg(app.theme.status_bg)
                .bg(app.theme.severity(toast.severity))
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(p, area);
        return;
    }

    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let hints = match app.input_mode {
        InputMode::Search => "type to search · Enter apply · Esc clear".to_string(),
        _ => {
            let key = |a| app.keymap.keys_for(a).first().cloned().unwrap_or_default();
            format!(
                "{} search · {} filter · {} sort · {} new · {} edit · {} delete · {} help · {} quit",
                key(KeyAction::StartSearch),
                key(KeyAction::OpenFilterMenu),
                key(KeyAction::SortNextColumn),
                key(KeyAction::New),
                key(KeyAction::Edit),
                key(KeyAction::Delete),
                key(KeyAction::OpenHelp),
                key(KeyAction::Quit),
            )
        }
    };
    let t = app.totals();
    let msg = format!(
        " mode: {mode}  users:{} roles:{} permissions:{}  {hints}",
        t.users, t.roles, t.permissions
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 40u16.min(max_w);
        let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Yes/Cancel prompt in front of a deletion.
pub fn render_confirm_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let ModalState::Confirm { request, selected, .. } = state else {
        return;
    };
    let width = 56u16.min(area.width.saturating_sub(4)).max(36);
    let rect = centered_rect(width, 9, area);

    let button = |label: &str, active: bool| {
        let style = if active {
            Style::default().fg(app.theme.status_bg).bg(app.theme.severity(request.severity))
        } else {
            Style::default().fg(app.theme.text)
        };
        Span::styled(format!(" {label} "), style)
    };
    let lines = vec![
        Line::from(Span::styled(request.message.clone(), Style::default().fg(app.theme.text))),
        Line::raw(""),
        Line::from(vec![
            button(request.confirm_label.as_str(), *selected == 0),
            Span::raw("   "),
            button(request.cancel_label.as_str(), *selected == 1),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            "←/→ choose · Enter · y/n",
            Style::default().fg(app.theme.muted),
        )),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(request.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.severity(request.severity))),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Filter options of the active screen, "All" first.
pub fn render_filter_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::FilterMenu { selected, options } = state {
        let width = 44u16.min(area.width.saturating_sub(4)).max(30);
        let height = (options.len() as u16 + 3).min(area.height.saturating_sub(2)).max(4);
        let rect = centered_rect(width, height, area);
        let current = app.active().and_then(|l| l.filter());
        let rows = std::iter::once(None).chain(options.iter().map(|o| Some(o.as_str())));
        let mut text = String::new();
        for (idx, value) in rows.enumerate() {
            let marker = if idx == *selected { "▶" } else { " " };
            let check = if value == current { "(•)" } else { "( )" };
            text.push_str(&format!("{marker} {check} {}\n", value.unwrap_or("All")));
        }
        let title = match app.active() {
            Some(l) => format!("Filter {}", l.kind().plural()),
            None => "Filter".to_string(),
        };
        let p = Paragraph::new(text).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal listing the current key bindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 26u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let entries = [
        ("Switch screen", vec![KeyAction::NextScreen, KeyAction::PrevScreen]),
        (
            "Go to screen",
            vec![
                KeyAction::GotoDashboard,
                KeyAction::GotoUsers,
                KeyAction::GotoRoles,
                KeyAction::GotoPermissions,
            ],
        ),
        ("Search", vec![KeyAction::StartSearch]),
        ("Filter", vec![KeyAction::OpenFilterMenu]),
        ("Sort next column", vec![KeyAction::SortNextColumn]),
        ("Reverse sort", vec![KeyAction::ToggleSortDirection]),
        ("Move", vec![KeyAction::MoveUp, KeyAction::MoveDown]),
        ("Page", vec![KeyAction::PrevPage, KeyAction::NextPage]),
        ("Select row", vec![KeyAction::ToggleRow]),
        ("Select all", vec![KeyAction::ToggleAll]),
        ("New", vec![KeyAction::New]),
        ("Edit", vec![KeyAction::Edit]),
        ("Delete", vec![KeyAction::Delete]),
        ("Delete selected", vec![KeyAction::BulkDelete]),
        ("Reload seed data", vec![KeyAction::ReloadSeed]),
        ("Quit", vec![KeyAction::Quit]),
    ];

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for (label, actions) in entries {
        let keys: Vec<String> = actions.into_iter().flat_map(|a| app.keymap.keys_for(a)).collect();
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:>18} │ ")),
            Span::styled(keys.join(", "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Close help: "),
        Span::styled("Esc / Enter", Style::default().add_modifier(Modifier::ITALIC)),
    ]));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
