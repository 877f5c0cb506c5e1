//! Connector lines in the gap between two panels

use crate::config::ResolvedTheme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Line as CanvasLine},
    Frame,
};
use steplens_core::{GapGeometry, Geometry, Segment, SegmentKind};

/// Clip a segment to the vertical band `[0, height]` (y grows downwards).
/// Returns None when nothing of it is visible.
pub(crate) fn clip_segment(seg: &Segment, height: f64) -> Option<Segment> {
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let dy = seg.y2 - seg.y1;
    for (p, q) in [(-dy, seg.y1), (dy, height - seg.y1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    let dx = seg.x2 - seg.x1;
    Some(Segment {
        x1: seg.x1 + t0 * dx,
        y1: seg.y1 + t0 * dy,
        x2: seg.x1 + t1 * dx,
        y2: seg.y1 + t1 * dy,
        kind: seg.kind,
    })
}

/// Draw one gap's connectors and annotations into `area`
pub fn render_gap(
    frame: &mut Frame,
    area: Rect,
    gap: &GapGeometry,
    geometry: &Geometry,
    theme: &ResolvedTheme,
    show_guides: bool,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let height = f64::from(area.height) * geometry.line_height;
    let segments: Vec<Segment> = gap
        .connectors()
        .flat_map(|c| c.segments.iter())
        .filter(|s| show_guides || s.kind == SegmentKind::Bridge)
        .filter_map(|s| clip_segment(s, height))
        .collect();
    let annotations: Vec<&'static str> = gap.annotations().collect();
    let bridge = theme.bridge;
    let guide = theme.guide;
    let annotation_style = Style::default()
        .fg(theme.annotation)
        .add_modifier(Modifier::ITALIC);
    let line_height = geometry.line_height;

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, geometry.width()])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            // Canvas y grows upwards
            for s in &segments {
                let color = match s.kind {
                    SegmentKind::Bridge => bridge,
                    SegmentKind::Guide => guide,
                };
                ctx.draw(&CanvasLine::new(s.x1, height - s.y1, s.x2, height - s.y2, color));
            }
            for (i, label) in annotations.iter().enumerate() {
                let y = height - (i as f64 + 1.0) * line_height;
                if y < 0.0 {
                    break;
                }
                ctx.print(0.0, y, Line::from(Span::styled(*label, annotation_style)));
            }
        });
    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(y1: f64, y2: f64) -> Segment {
        Segment {
            x1: 0.0,
            y1,
            x2: 10.0,
            y2,
            kind: SegmentKind::Bridge,
        }
    }

    #[test]
    fn test_clip_inside_unchanged() {
        let s = seg(2.0, 8.0);
        assert_eq!(clip_segment(&s, 10.0), Some(s));
    }

    #[test]
    fn test_clip_fully_outside() {
        assert_eq!(clip_segment(&seg(-5.0, -1.0), 10.0), None);
        assert_eq!(clip_segment(&seg(11.0, 20.0), 10.0), None);
        assert_eq!(clip_segment(&seg(-1.0, -1.0), 10.0), None);
    }

    #[test]
    fn test_clip_partial() {
        let clipped = clip_segment(&seg(-10.0, 10.0), 10.0).expect("visible");
        assert_eq!(clipped.y1, 0.0);
        assert_eq!(clipped.x1, 5.0);
        assert_eq!(clipped.y2, 10.0);
        assert_eq!(clipped.x2, 10.0);
    }

    #[test]
    fn test_clip_horizontal_guide() {
        let guide = Segment {
            x1: 0.0,
            y1: 4.0,
            x2: 10.0,
            y2: 4.0,
            kind: SegmentKind::Guide,
        };
        assert_eq!(clip_segment(&guide, 10.0), Some(guide));
        let above = Segment {
            y1: -1.0,
            y2: -1.0,
            ..guide
        };
        assert_eq!(clip_segment(&above, 10.0), None);
    }
}
