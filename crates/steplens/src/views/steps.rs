//! The main steps row: three panels with a connector gap between each pair

use super::connectors::render_gap;
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use steplens_core::{project_gap, render_lines, Gap, Step, PANEL_COUNT};

/// Render the previous/current/next panels and both gaps
pub fn render_steps(frame: &mut Frame, app: &mut App, area: Rect) {
    let gap_width = app.view.gap_width;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(gap_width),
            Constraint::Fill(1),
            Constraint::Length(gap_width),
            Constraint::Fill(1),
        ])
        .split(area);

    let window = app.nav.visible_window();
    let panel_columns = [columns[0], columns[2], columns[4]];
    for (panel, column) in panel_columns.iter().enumerate() {
        let body = render_panel(frame, app, panel, window[panel], *column);
        app.panel_areas[panel] = body;
    }

    for (gap, column) in [(Gap::Left, columns[1]), (Gap::Right, columns[3])] {
        let Some(left) = app.nav.gap_step(gap) else {
            continue;
        };
        let body = body_area(column);
        let geometry = project_gap(
            app.store.steps(),
            left,
            app.nav.gap_offsets(gap),
            &app.geometry,
        );
        render_gap(
            frame,
            body,
            &geometry,
            &app.geometry,
            &app.theme,
            app.view.show_guides,
        );
    }
}

/// Everything below the one-row header
fn body_area(column: Rect) -> Rect {
    Rect {
        y: column.y.saturating_add(1),
        height: column.height.saturating_sub(1),
        ..column
    }
}

/// Draw one panel; returns its scrollable body area (None for a blank panel)
fn render_panel(
    frame: &mut Frame,
    app: &App,
    panel: usize,
    step_index: Option<usize>,
    area: Rect,
) -> Option<Rect> {
    let step_index = step_index?;
    let step = app.store.steps().steps.get(step_index)?;
    let selected = panel == PANEL_COUNT / 2;

    let header_style = if selected {
        Style::default()
            .fg(app.theme.selected)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text_muted)
    };
    let header = Line::from(vec![
        Span::styled(format!("step {}", step_index + 1), header_style),
        Span::styled(
            format!(" / {}", app.nav.num_steps()),
            Style::default().fg(app.theme.text_muted),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(header),
        Rect {
            height: area.height.min(1),
            ..area
        },
    );

    let body = body_area(area);
    let scroll = app.panel_scroll_rows(panel).min(u16::MAX as usize) as u16;
    let paragraph = Paragraph::new(step_text(step, app, selected)).scroll((scroll, 0));
    frame.render_widget(paragraph, body);
    Some(body)
}

/// Panel lines, alternate blocks dimmed so block boundaries stay visible
fn step_text<'a>(step: &'a Step, app: &App, selected: bool) -> Vec<Line<'a>> {
    let base = if selected {
        Style::default().fg(app.theme.text)
    } else {
        Style::default().fg(app.theme.text).add_modifier(Modifier::DIM)
    };
    render_lines(step)
        .into_iter()
        .map(|line| {
            let style = if line.block % 2 == 1 {
                base.fg(app.theme.accent)
            } else {
                base
            };
            let marker = if line.starts_instruction { "" } else { "  " };
            Line::from(vec![Span::raw(marker), Span::styled(line.text, style)])
        })
        .collect()
}
