//! Modal entity forms.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::form::{FieldKind, ModalForm};
use crate::model::Entity;
use crate::ui::components::centered_rect;

pub fn render_form<T: Entity>(f: &mut Frame, area: Rect, app: &AppState, form: &ModalForm<T>) {
    let layout = form.layout();
    let error_lines = if form.error.is_some() { 2 } else { 0 };
    let height = (layout.len() as u16 + 5 + error_lines).min(area.height);
    let width = 60u16.min(area.width.saturating_sub(4)).max(40);
    let rect = centered_rect(width, height, area);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, spec) in layout.iter().enumerate() {
        let focused = idx == form.focus;
        let marker = if focused { "▶ " } else { "  " };
        let value = match spec.kind {
            FieldKind::Text if focused => format!("{}_", form.value(spec)),
            FieldKind::Choice(_) => format!("< {} >", form.value(spec)),
            _ => form.value(spec),
        };
        let style = if focused {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<16}", spec.label), style),
            Span::raw(value),
        ]));
    }
    if let Some(err) = &form.error {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(app.theme.warning))));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Tab/↑↓ field · Space/←→ toggle · Enter save · Esc cancel",
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(form.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
