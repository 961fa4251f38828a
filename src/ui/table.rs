//! Entity table shared by the Users, Roles and Permissions screens.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::AppState;
use crate::screen::ScreenOps;

pub fn render_entity_table(f: &mut Frame, area: Rect, app: &AppState, list: &dyn ScreenOps) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let headers = list.headers();
    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(headers.iter().map(|h| Cell::from(h.clone())));
    let header = Row::new(header_cells)
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let rows = list.rows().into_iter().map(|r| {
        let mut cells = vec![Cell::from(if r.checked { "[x]" } else { "[ ]" })];
        cells.extend(r.cells.into_iter().map(Cell::from));
        Row::new(cells).style(Style::default().fg(app.theme.text))
    });

    // checkbox and id columns are narrow, the rest share the width
    let mut widths = vec![Constraint::Length(3), Constraint::Length(6)];
    let rest = headers.len().saturating_sub(1).max(1) as u32;
    widths.extend((1..headers.len()).map(|_| Constraint::Ratio(1, rest)));

    let kind = list.kind();
    let title = match list.filter() {
        Some(filter) => format!("{} (filter: {filter})", capitalize(kind.plural())),
        None => capitalize(kind.plural()),
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default().with_selected(Some(list.cursor()));
    f.render_stateful_widget(table, parts[0], &mut state);

    let (page, pages, total) = list.pager();
    let footer = format!(
        " Page {page} of {pages}  ·  {total} match(es)  ·  {} selected",
        list.selected()
    );
    f.render_widget(
        Paragraph::new(footer).style(Style::default().fg(app.theme.muted)),
        parts[1],
    );
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
