//! Connector geometry between two adjacent step panels
//!
//! Coordinates are in pixels relative to the gap between two panels: x runs
//! from the left panel's text edge (`0`) to the right panel's text edge
//! (`5 * pad_width`), y runs downwards from the top of the visible area.

use crate::model::{Change, Span, Step, StepSet};
use crate::offset::{line_offset, OffsetError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("invalid location: {0}")]
    Offset(#[from] OffsetError),
    #[error("span ends before it starts (block {block}, {start}..{end})")]
    ReversedSpan {
        block: usize,
        start: usize,
        end: usize,
    },
    #[error("change refers to missing step {0}")]
    MissingStep(usize),
}

/// Fixed drawing constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub pad_width: f64,
    pub line_height: f64,
}

impl Geometry {
    pub fn new(pad_width: f64, font_size: f64, line_spacing: f64) -> Self {
        Self {
            pad_width,
            line_height: font_size * line_spacing,
        }
    }

    /// Total gap width
    pub fn width(&self) -> f64 {
        5.0 * self.pad_width
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(50.0, 12.0, 1.25)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Diagonal line crossing the gap
    Bridge,
    /// Horizontal line from a panel edge to a bridge anchor
    Guide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub kind: SegmentKind,
}

impl Segment {
    fn bridge(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            kind: SegmentKind::Bridge,
        }
    }

    fn guide(x1: f64, x2: f64, y: f64) -> Self {
        Self {
            x1,
            y1: y,
            x2,
            y2: y,
            kind: SegmentKind::Guide,
        }
    }
}

/// Lines drawn for one `move` change: two bridges then four guides
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub segments: [Segment; 6],
}

impl Connector {
    pub fn bridges(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.kind == SegmentKind::Bridge)
    }

    pub fn guides(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.kind == SegmentKind::Guide)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Connector(Connector),
    /// Internal rearrangement with no spatial mapping
    Annotation { label: &'static str },
}

impl Projection {
    pub fn line_count(&self) -> usize {
        match self {
            Projection::Connector(c) => c.segments.len(),
            Projection::Annotation { .. } => 0,
        }
    }
}

/// A projection keyed by its position in the result's change list
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedChange {
    pub change_index: usize,
    pub projection: Projection,
}

/// Everything drawn in one gap, in change-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapGeometry {
    pub items: Vec<ProjectedChange>,
    /// Changes that belonged to this gap but could not be projected
    pub dropped: usize,
}

impl GapGeometry {
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.items.iter().filter_map(|item| match &item.projection {
            Projection::Connector(c) => Some(c),
            Projection::Annotation { .. } => None,
        })
    }

    pub fn annotations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.items.iter().filter_map(|item| match item.projection {
            Projection::Annotation { label } => Some(label),
            Projection::Connector(_) => None,
        })
    }
}

/// Offsets of a span's start and end, in lines
fn span_lines(step: &Step, span: &Span) -> Result<(usize, usize), ProjectError> {
    let start = line_offset(step, span.start())?;
    let end = line_offset(step, span.end())?;
    if span.start > span.end {
        return Err(ProjectError::ReversedSpan {
            block: span.block,
            start: span.start,
            end: span.end,
        });
    }
    Ok((start, end))
}

/// Project one change onto the gap between `left` (step `change.step()`) and
/// `right` (the step after it). `offsets` are the two panels' scroll offsets.
pub fn project_change(
    change: &Change,
    left: &Step,
    right: &Step,
    offsets: [f64; 2],
    geometry: &Geometry,
) -> Result<Projection, ProjectError> {
    let (from, to) = match change {
        Change::Move { from, to, .. } => (from, to),
        Change::BlockJoin { .. } | Change::BlockRm { .. } => {
            return Ok(Projection::Annotation {
                label: change.label(),
            });
        }
    };

    let (from_start, from_end) = span_lines(left, from)?;
    let (to_start, to_end) = span_lines(right, to)?;

    let lh = geometry.line_height;
    let start_y1 = from_start as f64 * lh - offsets[0];
    let start_y2 = from_end as f64 * lh - offsets[0];
    let end_y1 = to_start as f64 * lh - offsets[1];
    let end_y2 = to_end as f64 * lh - offsets[1];

    let p = geometry.pad_width;
    Ok(Projection::Connector(Connector {
        segments: [
            Segment::bridge(2.0 * p, start_y1, 3.0 * p, end_y1),
            Segment::bridge(2.0 * p, start_y2, 3.0 * p, end_y2),
            Segment::guide(0.0, 2.0 * p, start_y1),
            Segment::guide(0.0, 2.0 * p, start_y2),
            Segment::guide(3.0 * p, 5.0 * p, end_y1),
            Segment::guide(3.0 * p, 5.0 * p, end_y2),
        ],
    }))
}

/// Check that a change can be projected against the steps it refers to
pub(crate) fn check_change(change: &Change, steps: &[Step]) -> Result<(), ProjectError> {
    if let Change::Move { step, from, to } = change {
        let left = steps.get(*step).ok_or(ProjectError::MissingStep(*step))?;
        let right = steps
            .get(step + 1)
            .ok_or(ProjectError::MissingStep(step + 1))?;
        span_lines(left, from)?;
        span_lines(right, to)?;
    }
    Ok(())
}

/// Project every change of step `left_index` onto the gap after it.
///
/// A change that cannot be projected is dropped on its own; the rest of the
/// gap still renders.
pub fn project_gap(
    set: &StepSet,
    left_index: usize,
    offsets: [f64; 2],
    geometry: &Geometry,
) -> GapGeometry {
    let mut gap = GapGeometry::default();
    let relevant = set
        .changes
        .iter()
        .enumerate()
        .filter(|(_, change)| change.step() == left_index);

    for (change_index, change) in relevant {
        let result = match (set.steps.get(left_index), set.steps.get(left_index + 1)) {
            (Some(left), Some(right)) => project_change(change, left, right, offsets, geometry),
            (None, _) => Err(ProjectError::MissingStep(left_index)),
            (_, None) => Err(ProjectError::MissingStep(left_index + 1)),
        };
        match result {
            Ok(projection) => gap.items.push(ProjectedChange {
                change_index,
                projection,
            }),
            Err(err) => {
                tracing::warn!(change_index, step = left_index, %err, "dropping connector");
                gap.dropped += 1;
            }
        }
    }
    gap
}
