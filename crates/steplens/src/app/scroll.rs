use super::App;
use ratatui::layout::Position;
use steplens_core::{step_line_count, NavInput, PANEL_COUNT};

/// Rows a mouse wheel notch scrolls
pub(crate) const WHEEL_ROWS: i64 = 3;

pub(crate) fn max_scroll(total_lines: usize, viewport_height: usize) -> usize {
    total_lines.saturating_sub(viewport_height)
}

impl App {
    /// Rendered line count of the step shown in `panel` (0 for a blank panel)
    pub fn panel_line_count(&self, panel: usize) -> usize {
        let window = self.nav.visible_window();
        window
            .get(panel)
            .copied()
            .flatten()
            .and_then(|idx| self.store.steps().steps.get(idx))
            .map(step_line_count)
            .unwrap_or(0)
    }

    /// Scroll position of `panel`, in rows
    pub fn panel_scroll_rows(&self, panel: usize) -> usize {
        let offset = self.nav.scroll_offsets()[panel];
        (offset / self.geometry.line_height).round().max(0.0) as usize
    }

    /// Scroll one panel by `delta` rows, clamped to its content, and report
    /// the resulting offsets of all panels to the navigator
    pub fn scroll_panel(&mut self, panel: usize, delta: i64) -> bool {
        if panel >= PANEL_COUNT || self.nav.mini_view_only() {
            return false;
        }
        let viewport = self.panel_areas[panel]
            .map(|area| area.height as usize)
            .unwrap_or(0);
        let max_rows = max_scroll(self.panel_line_count(panel), viewport) as i64;
        let rows = (self.panel_scroll_rows(panel) as i64 + delta).clamp(0, max_rows);

        let mut offsets = self.nav.scroll_offsets();
        offsets[panel] = rows as f64 * self.geometry.line_height;
        self.nav.observe_scroll(offsets)
    }

    /// Panel under a terminal cell, if any
    pub fn panel_at(&self, column: u16, row: u16) -> Option<usize> {
        let pos = Position::new(column, row);
        self.panel_areas
            .iter()
            .position(|area| area.is_some_and(|a| a.contains(pos)))
    }

    /// Jump straight to `target`, as if stepping there one panel at a time
    pub fn goto_step(&mut self, target: usize) -> bool {
        let current = self.nav.step_index();
        let delta = target as isize - current as isize;
        self.nav.move_step(delta)
    }

    pub fn navigate(&mut self, input: NavInput) -> bool {
        self.nav.apply(input)
    }
}
