//! Overview strip of compressed steps, centred on the selected one

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use steplens_core::{ministrip_layout, render_lines};
use unicode_width::UnicodeWidthChar;

/// Cut `text` to at most `width` display columns
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = if ch == '\t' { 1 } else { ch.width().unwrap_or(0) };
        if used + w > width {
            break;
        }
        used += w;
        out.push(if ch == '\t' { ' ' } else { ch });
    }
    out
}

pub fn render_ministrip(frame: &mut Frame, app: &mut App, area: Rect) {
    app.ministep_areas.clear();
    let num_steps = app.nav.num_steps();
    if area.width == 0 || area.height == 0 || num_steps == 0 {
        return;
    }
    let selected = app.nav.step_index();
    let mini_width = app.view.mini_width;
    let inner_width = mini_width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    for (step_index, x) in ministrip_layout(selected, num_steps, mini_width, area.width) {
        // Clip ministeps hanging off either edge
        let left = x.max(0) as u16;
        let right = (x + i32::from(mini_width)).min(i32::from(area.width)) as u16;
        if right <= left {
            continue;
        }
        let rect = Rect::new(area.x + left, area.y, right - left, area.height);

        let border_style = if step_index == selected {
            Style::default()
                .fg(app.theme.selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text_muted)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!("{}", step_index + 1));

        let lines: Vec<Line> = app
            .store
            .steps()
            .steps
            .get(step_index)
            .map(|step| {
                render_lines(step)
                    .into_iter()
                    .take(inner_height)
                    .map(|l| Line::from(truncate_to_width(l.text.trim_start(), inner_width)))
                    .collect()
            })
            .unwrap_or_default();

        let text_style = Style::default().fg(app.theme.text_muted);
        frame.render_widget(Paragraph::new(lines).style(text_style).block(block), rect);
        app.ministep_areas.push((rect, step_index));
    }
}
