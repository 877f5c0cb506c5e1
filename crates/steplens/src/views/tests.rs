use crate::app::{App, ViewSettings};
use crate::config::ResolvedTheme;
use crate::ui;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use steplens_core::{Change, Geometry, Span, StepSet};

fn make_app(set: StepSet) -> App {
    let mut app = App::new(
        Geometry::default(),
        ViewSettings::default(),
        ResolvedTheme::default(),
    );
    let id = app.store.begin_request();
    let steps = set.step_count();
    app.store.complete::<String>(id, Ok(set));
    app.nav.on_new_result(steps);
    app
}

fn sample_set() -> StepSet {
    StepSet::new(
        vec![
            vec![vec!["push1 0".into(), "push1 1".into()], vec!["invokeStk1 2".into()]],
            vec![vec!["[puts a]".into()], vec!["pop".into()]],
            vec![vec!["puts a".into()]],
        ],
        vec![
            Change::Move {
                step: 0,
                from: Span::new(0, 0, 2),
                to: Span::new(0, 0, 1),
            },
            Change::BlockRm { step: 1 },
        ],
    )
}

fn render_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| ui::draw(frame, app)).expect("draw");
    terminal.backend().buffer().clone()
}

fn buffer_text(buf: &Buffer) -> Vec<String> {
    let mut lines = Vec::new();
    for y in 0..buf.area.height {
        let mut line = String::new();
        for x in 0..buf.area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line);
    }
    lines
}

#[test]
fn test_three_panels_render_window() {
    let mut app = make_app(sample_set());
    app.nav.move_step(-1);
    assert_eq!(app.nav.step_index(), 0);

    let text = buffer_text(&render_buffer(&mut app, 120, 30)).join("\n");
    assert!(text.contains("step 1 / 3"));
    assert!(text.contains("step 2 / 3"));
    assert!(!text.contains("step 3 / 3"));
    assert!(text.contains("push1 0"));
    assert!(text.contains("[puts a]"));
    assert!(app.panel_areas[0].is_none(), "previous panel is blank at step 0");
    assert!(app.panel_areas[1].is_some());
    assert!(app.panel_areas[2].is_some());
}

#[test]
fn test_annotation_rendered_in_gap() {
    let mut app = make_app(sample_set());
    // latest pair: steps 2 and 3 visible, gap after step 2 holds the block_rm
    assert_eq!(app.nav.step_index(), 1);
    let text = buffer_text(&render_buffer(&mut app, 160, 30)).join("\n");
    assert!(text.contains("block"));
}

#[test]
fn test_mini_view_hides_panels() {
    let mut app = make_app(sample_set());
    app.nav.set_mini_view(true);
    let text = buffer_text(&render_buffer(&mut app, 120, 30)).join("\n");
    assert!(!text.contains("step 2 / 3"));
    assert!(app.panel_areas.iter().all(|a| a.is_none()));
    assert_eq!(app.ministep_areas.len(), 3);
}

#[test]
fn test_ministrip_centres_selected_step() {
    let mut app = make_app(sample_set());
    render_buffer(&mut app, 120, 30);
    let selected = app
        .ministep_areas
        .iter()
        .find(|(_, step)| *step == 1)
        .map(|(area, _)| *area)
        .expect("selected ministep drawn");
    let centre = selected.x + selected.width / 2;
    assert!((59..=61).contains(&centre), "centre at {centre}");
}

#[test]
fn test_status_bar_shows_failure() {
    let mut app = make_app(sample_set());
    let id = app.store.begin_request();
    app.store.complete(id, Err("unbalanced braces"));
    app.nav.on_new_result(0);
    let text = buffer_text(&render_buffer(&mut app, 100, 24)).join("\n");
    assert!(text.contains("unbalanced braces"));
    assert!(app.ministep_areas.is_empty());
}

#[test]
fn test_empty_store_renders() {
    let mut app = make_app(StepSet::default());
    let text = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(text.contains("no steps"));
}

fn is_braille_dot(symbol: &str) -> bool {
    symbol
        .chars()
        .next()
        .is_some_and(|c| ('\u{2801}'..='\u{28FF}').contains(&c))
}

/// Body rows (relative to the gap's top) holding Braille in `columns`
fn braille_rows(buf: &Buffer, columns: std::ops::Range<u16>, top: u16) -> Vec<u16> {
    (top..buf.area.height)
        .filter(|&y| columns.clone().any(|x| is_braille_dot(buf[(x, y)].symbol())))
        .map(|y| y - top)
        .collect()
}

#[test]
fn test_move_connector_drawn_in_gap() {
    let block = |prefix: &str| (0..12).map(|i| format!("{prefix}{i}")).collect::<Vec<_>>();
    let set = StepSet::new(
        vec![vec![block("a")], vec![block("b")], vec![block("c")]],
        vec![Change::Move {
            step: 0,
            from: Span::new(0, 8, 10),
            to: Span::new(0, 2, 3),
        }],
    );
    let mut app = make_app(set);
    assert_eq!(app.nav.step_index(), 1);

    // 120 columns: panels of 32, gaps of 12; the left gap starts at x = 32.
    // Steps row starts below the 8-row editor, panel bodies one row lower.
    let body_top = 9;
    let buf = render_buffer(&mut app, 120, 30);
    // Guides leaving the left panel sit at lines 8 and 10 (pixels 120 and 150)
    assert_eq!(braille_rows(&buf, 32..36, body_top), vec![7, 9]);
    // Bridges cross the middle of the gap
    assert!(!braille_rows(&buf, 36..39, body_top).is_empty());

    // Scrolling the left panel by four lines moves its end of the connector up
    assert!(app.nav.observe_scroll([60.0, 0.0, 0.0]));
    let buf = render_buffer(&mut app, 120, 30);
    assert_eq!(braille_rows(&buf, 32..36, body_top), vec![3, 5]);
}
