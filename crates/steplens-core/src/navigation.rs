//! Step navigation: which three panels are visible, their scroll offsets,
//! and whether only the overview strip is shown

/// Number of visible panels (previous, current, next)
pub const PANEL_COUNT: usize = 3;

/// Directional input, already stripped of any key binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInput {
    Left,
    Right,
    Up,
    Down,
}

/// One of the two gaps between the visible panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    /// Between the previous and current panels
    Left,
    /// Between the current and next panels
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    pub step_index: usize,
    /// Pixel offsets of the previous, current and next panels
    pub scroll_offsets: [f64; PANEL_COUNT],
    pub mini_view_only: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            step_index: 0,
            scroll_offsets: [0.0; PANEL_COUNT],
            mini_view_only: false,
        }
    }
}

/// Navigator for paging through the steps of one result
#[derive(Debug, Clone, Default)]
pub struct StepNavigator {
    state: NavState,
    num_steps: usize,
}

impl StepNavigator {
    pub fn new(num_steps: usize) -> Self {
        let mut nav = Self::default();
        nav.on_new_result(num_steps);
        nav
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn step_index(&self) -> usize {
        self.state.step_index
    }

    pub fn mini_view_only(&self) -> bool {
        self.state.mini_view_only
    }

    pub fn scroll_offsets(&self) -> [f64; PANEL_COUNT] {
        self.state.scroll_offsets
    }

    /// Move by `delta` steps. Returns false (state untouched) when the target
    /// is out of range.
    ///
    /// Offsets follow their panels: moving forward drops the previous
    /// panel's offset and a fresh next panel enters at zero; moving back
    /// does the mirror image.
    pub fn move_step(&mut self, delta: isize) -> bool {
        let Some(target) = self.state.step_index.checked_add_signed(delta) else {
            return false;
        };
        if target >= self.num_steps || delta == 0 {
            return false;
        }

        let shift = delta.unsigned_abs().min(PANEL_COUNT);
        let offsets = &mut self.state.scroll_offsets;
        if delta > 0 {
            offsets.rotate_left(shift);
            offsets[PANEL_COUNT - shift..].fill(0.0);
        } else {
            offsets.rotate_right(shift);
            offsets[..shift].fill(0.0);
        }
        self.state.step_index = target;
        tracing::debug!(step = target, "moved step");
        true
    }

    pub fn set_mini_view(&mut self, mini_only: bool) -> bool {
        if self.state.mini_view_only == mini_only {
            return false;
        }
        self.state.mini_view_only = mini_only;
        true
    }

    /// Adopt externally reported panel offsets if they differ from ours
    pub fn observe_scroll(&mut self, offsets: [f64; PANEL_COUNT]) -> bool {
        if offsets == self.state.scroll_offsets {
            return false;
        }
        self.state.scroll_offsets = offsets;
        true
    }

    /// Reset for a freshly loaded result, showing the most recent pair of steps
    pub fn on_new_result(&mut self, num_steps: usize) {
        self.num_steps = num_steps;
        self.state = NavState {
            step_index: num_steps.saturating_sub(2),
            ..NavState::default()
        };
        tracing::debug!(num_steps, step = self.state.step_index, "navigation reset");
    }

    /// Apply a directional input. Returns true if the state changed.
    pub fn apply(&mut self, input: NavInput) -> bool {
        match input {
            NavInput::Left => self.move_step(-1),
            NavInput::Right => self.move_step(1),
            NavInput::Up => self.set_mini_view(true),
            NavInput::Down => self.set_mini_view(false),
        }
    }

    /// Step indices shown in the previous, current and next panels
    pub fn visible_window(&self) -> [Option<usize>; PANEL_COUNT] {
        if self.num_steps == 0 {
            return [None; PANEL_COUNT];
        }
        let idx = self.state.step_index;
        let next = idx + 1;
        [
            idx.checked_sub(1),
            Some(idx),
            (next < self.num_steps).then_some(next),
        ]
    }

    /// Index of the step on the left side of `gap`, if that gap has two panels
    pub fn gap_step(&self, gap: Gap) -> Option<usize> {
        let [prev, current, next] = self.visible_window();
        match gap {
            Gap::Left => prev,
            Gap::Right => next.and(current),
        }
    }

    /// Scroll offsets of the two panels bordering `gap`
    pub fn gap_offsets(&self, gap: Gap) -> [f64; 2] {
        let o = self.state.scroll_offsets;
        match gap {
            Gap::Left => [o[0], o[1]],
            Gap::Right => [o[1], o[2]],
        }
    }
}

/// Horizontal placement of the overview strip.
///
/// The selected ministep is centred in `area_width`; returns `(step, x)` for
/// every ministep that at least partially intersects `[0, area_width)`.
/// `x` may be negative for a ministep cut off at the left edge.
pub fn ministrip_layout(
    step_index: usize,
    num_steps: usize,
    mini_width: u16,
    area_width: u16,
) -> Vec<(usize, i32)> {
    let w = i32::from(mini_width.max(1));
    let area = i32::from(area_width);
    let origin = area / 2 - (step_index as i32 * w + w / 2);
    (0..num_steps)
        .filter_map(|step| {
            let x = origin + step as i32 * w;
            (x + w > 0 && x < area).then_some((step, x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav_at(num_steps: usize, step: usize, offsets: [f64; 3]) -> StepNavigator {
        let mut nav = StepNavigator::new(num_steps);
        nav.state.step_index = step;
        nav.state.scroll_offsets = offsets;
        nav
    }

    #[test]
    fn test_initial_state() {
        let nav = StepNavigator::default();
        assert_eq!(nav.state(), &NavState::default());
        assert_eq!(nav.step_index(), 0);
        assert_eq!(nav.scroll_offsets(), [0.0, 0.0, 0.0]);
        assert!(!nav.mini_view_only());
    }

    #[test]
    fn test_move_forward_shifts_offsets() {
        let mut nav = nav_at(5, 1, [10.0, 20.0, 30.0]);
        assert!(nav.move_step(1));
        assert_eq!(nav.step_index(), 2);
        assert_eq!(nav.scroll_offsets(), [20.0, 30.0, 0.0]);
    }

    #[test]
    fn test_move_backward_shifts_offsets() {
        let mut nav = nav_at(5, 3, [10.0, 20.0, 30.0]);
        assert!(nav.move_step(-1));
        assert_eq!(nav.step_index(), 2);
        assert_eq!(nav.scroll_offsets(), [0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_move_clamps_at_ends() {
        let mut nav = nav_at(4, 3, [1.0, 2.0, 3.0]);
        assert!(!nav.move_step(1));
        assert_eq!(nav.step_index(), 3);
        assert_eq!(nav.scroll_offsets(), [1.0, 2.0, 3.0]);

        let mut nav = nav_at(4, 0, [1.0, 2.0, 3.0]);
        assert!(!nav.move_step(-1));
        assert_eq!(nav.step_index(), 0);
        assert_eq!(nav.scroll_offsets(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_repeated_forward_never_leaves_range() {
        for n in 1..6 {
            for start in 0..n {
                let mut nav = nav_at(n, start, [0.0; 3]);
                for _ in 0..10 {
                    nav.move_step(1);
                    assert!(nav.step_index() < n);
                }
                assert_eq!(nav.step_index(), n - 1);
            }
        }
    }

    #[test]
    fn test_move_with_no_steps_is_noop() {
        let mut nav = StepNavigator::new(0);
        assert!(!nav.move_step(1));
        assert!(!nav.move_step(-1));
        assert_eq!(nav.step_index(), 0);
        assert_eq!(nav.visible_window(), [None, None, None]);
    }

    #[test]
    fn test_mini_view_leaves_position_alone() {
        let mut nav = nav_at(5, 2, [4.0, 5.0, 6.0]);
        assert!(nav.apply(NavInput::Up));
        assert!(nav.mini_view_only());
        assert!(!nav.apply(NavInput::Up));
        assert_eq!(nav.step_index(), 2);
        assert_eq!(nav.scroll_offsets(), [4.0, 5.0, 6.0]);
        assert!(nav.apply(NavInput::Down));
        assert!(!nav.mini_view_only());
    }

    #[test]
    fn test_directional_inputs() {
        let mut nav = nav_at(5, 2, [0.0; 3]);
        assert!(nav.apply(NavInput::Right));
        assert_eq!(nav.step_index(), 3);
        assert!(nav.apply(NavInput::Left));
        assert!(nav.apply(NavInput::Left));
        assert_eq!(nav.step_index(), 1);
    }

    #[test]
    fn test_observe_scroll_short_circuits() {
        let mut nav = nav_at(3, 1, [0.0, 15.0, 0.0]);
        assert!(!nav.observe_scroll([0.0, 15.0, 0.0]));
        assert!(nav.observe_scroll([0.0, 30.0, 45.0]));
        assert_eq!(nav.scroll_offsets(), [0.0, 30.0, 45.0]);
    }

    #[test]
    fn test_reset_on_new_result() {
        let mut nav = nav_at(9, 7, [3.0, 2.0, 1.0]);
        nav.set_mini_view(true);
        nav.on_new_result(6);
        assert_eq!(nav.step_index(), 4);
        assert_eq!(nav.scroll_offsets(), [0.0; 3]);
        assert!(!nav.mini_view_only());

        nav.on_new_result(1);
        assert_eq!(nav.step_index(), 0);
        nav.on_new_result(0);
        assert_eq!(nav.state(), &NavState::default());
    }

    #[test]
    fn test_visible_window_edges() {
        let nav = nav_at(4, 0, [0.0; 3]);
        assert_eq!(nav.visible_window(), [None, Some(0), Some(1)]);
        assert_eq!(nav.gap_step(Gap::Left), None);
        assert_eq!(nav.gap_step(Gap::Right), Some(0));

        let nav = nav_at(4, 3, [0.0; 3]);
        assert_eq!(nav.visible_window(), [Some(2), Some(3), None]);
        assert_eq!(nav.gap_step(Gap::Left), Some(2));
        assert_eq!(nav.gap_step(Gap::Right), None);

        let nav = nav_at(1, 0, [0.0; 3]);
        assert_eq!(nav.visible_window(), [None, Some(0), None]);
    }

    #[test]
    fn test_gap_offsets() {
        let nav = nav_at(4, 1, [1.0, 2.0, 3.0]);
        assert_eq!(nav.gap_offsets(Gap::Left), [1.0, 2.0]);
        assert_eq!(nav.gap_offsets(Gap::Right), [2.0, 3.0]);
    }

    #[test]
    fn test_ministrip_centres_selected() {
        let layout = ministrip_layout(2, 5, 10, 50);
        // selected step 2 spans [20, 30), centred on 25
        assert!(layout.contains(&(2, 20)));
        assert_eq!(layout.first(), Some(&(0, 0)));
        assert_eq!(layout.last(), Some(&(4, 40)));

        let layout = ministrip_layout(0, 5, 10, 30);
        assert_eq!(layout, vec![(0, 10), (1, 20)]);
    }
}
