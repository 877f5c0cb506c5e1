//! steplens core - geometry and navigation for stepping through code transformations
//!
//! A transformation pipeline produces a sequence of steps (the program's code
//! after each pass) plus change records linking spans of one step to the next.
//! This crate turns those records into connector geometry and keeps the
//! three-panel navigation state consistent.

pub mod backend;
pub mod model;
pub mod navigation;
pub mod offset;
pub mod projector;
pub mod store;

pub use backend::{BackendError, CommandDecompiler, Decompiler, FixtureDecompiler};
pub use model::{count_lines, Block, Change, Instruction, Location, Span, Step, StepSet};
pub use navigation::{ministrip_layout, Gap, NavInput, NavState, StepNavigator, PANEL_COUNT};
pub use offset::{line_offset, render_lines, step_line_count, OffsetError, RenderLine};
pub use projector::{
    project_change, project_gap, Connector, GapGeometry, Geometry, ProjectError, ProjectedChange,
    Projection, Segment, SegmentKind,
};
pub use store::{RequestId, StepStore, StoreStatus, StoreUpdate};
