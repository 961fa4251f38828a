use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;

/// Four total cards side by side.
pub fn render_dashboard(f: &mut Frame, area: Rect, app: &AppState) {
    let outer = Block::default()
        .title("Dashboard Overview")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let cards = app.totals().cards();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(Rect { height: inner.height.min(5), ..inner });

    for ((label, value), rect) in cards.iter().zip(cols.iter()) {
        let body = vec![
            Line::from(Span::styled(*label, Style::default().fg(app.theme.muted))),
            Line::from(Span::styled(
                value.to_string(),
                Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
            )),
        ];
        let card = Paragraph::new(body).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(card, *rect);
    }
}
