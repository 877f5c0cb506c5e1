//! UI rendering for the TUI

use crate::app::{App, Focus};
use crate::views::{render_ministrip, render_steps};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use steplens_core::{StoreStatus, PANEL_COUNT};

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let mini_height = app.view.mini_height;
    let chunks = if app.nav.mini_view_only() {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),              // Editor
                Constraint::Length(0),           // Main steps (folded away)
                Constraint::Length(mini_height), // Ministeps
                Constraint::Length(1),           // Status bar
            ])
            .split(frame.area())
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(app.view.editor_height),
                Constraint::Min(0),
                Constraint::Length(mini_height),
                Constraint::Length(1),
            ])
            .split(frame.area())
    };

    draw_editor(frame, app, chunks[0]);
    if app.nav.mini_view_only() {
        app.panel_areas = [None; PANEL_COUNT];
    } else {
        render_steps(frame, app, chunks[1]);
    }
    render_ministrip(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.show_help {
        draw_help_popover(frame, app);
    }
}

fn draw_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Editor;
    let border_style = if focused {
        Style::default().fg(app.theme.accent)
    } else {
        Style::default().fg(app.theme.text_muted)
    };
    let hints = Line::from(vec![
        Span::styled(" ^R", Style::default().fg(app.theme.accent)),
        Span::styled(" decompile  ", Style::default().fg(app.theme.text_muted)),
        Span::styled("?", Style::default().fg(app.theme.accent)),
        Span::styled(" help ", Style::default().fg(app.theme.text_muted)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" source ")
        .title_bottom(hints.right_aligned());
    app.editor.set_block(block);
    let cursor_style = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    app.editor.set_cursor_style(cursor_style);
    frame.render_widget(&app.editor, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let muted = Style::default().fg(app.theme.text_muted);

    let mode = match app.focus {
        Focus::Editor => " EDIT ",
        Focus::Steps => " STEPS ",
    };
    let mut left = vec![Span::styled(
        mode,
        Style::default()
            .fg(app.theme.accent)
            .add_modifier(Modifier::REVERSED),
    )];
    left.push(Span::raw(" "));

    if let Some(message) = &app.error_message {
        left.push(Span::styled(message.clone(), Style::default().fg(app.theme.error)));
    } else if app.loading_initial {
        left.push(Span::styled("loading source…", muted));
    } else {
        match app.store.status() {
            StoreStatus::Loading => left.push(Span::styled("decompiling…", muted)),
            StoreStatus::Empty => left.push(Span::styled("no steps", muted)),
            StoreStatus::Failed(message) => {
                left.push(Span::styled(message, Style::default().fg(app.theme.error)))
            }
            StoreStatus::Ready => {
                let set = app.store.steps();
                left.push(Span::styled("step ", muted));
                left.push(Span::styled(
                    format!("{}/{}", app.nav.step_index() + 1, set.step_count()),
                    Style::default().fg(app.theme.text),
                ));
                left.push(Span::styled(
                    format!("  {} changes", set.changes.len()),
                    muted,
                ));
            }
        }
    }

    let right = if app.nav.mini_view_only() {
        " ↓ expand  ←→ step "
    } else {
        " ↑ overview  ←→ step  Tab focus "
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right.chars().count() as u16)])
        .split(area);
    frame.render_widget(Paragraph::new(Line::from(left)), chunks[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(right, muted)).alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_help_popover(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let popup_width = 44u16.min(area.width.saturating_sub(4));
    let popup_height = 20u16.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(app.theme.accent);
    let label_style = Style::default().fg(app.theme.text);
    let section_style = Style::default().fg(app.theme.selected);

    let help_line = |key: &str, desc: &'static str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), key_style),
            Span::styled(desc, label_style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(" Steps", section_style)),
        help_line("h / l / ←→", "Previous/next step"),
        help_line("k / ↑", "Overview only"),
        help_line("j / ↓", "Show panels"),
        help_line("< / >", "First/last step"),
        help_line("J / K", "Scroll current panel"),
        help_line("wheel", "Scroll panel under cursor"),
        help_line("click", "Jump to ministep"),
        Line::from(""),
        Line::from(Span::styled(" Source", section_style)),
        help_line("e / Tab", "Edit source"),
        help_line("Esc", "Leave editor"),
        help_line("^R / F5", "Decompile"),
        Line::from(""),
        help_line("?", "Close help"),
        help_line("q / Esc", "Quit"),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(app.theme.accent));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
