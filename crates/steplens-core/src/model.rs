//! Steps, blocks, and the change records that link adjacent steps

use crate::projector::{self, ProjectError};
use serde::{Deserialize, Serialize};

/// One unit of displayed text. May contain embedded line breaks.
pub type Instruction = String;

/// An ordered group of instructions (e.g. a basic block)
pub type Block = Vec<Instruction>;

/// The full code after one transformation pass
pub type Step = Vec<Block>;

/// Number of rendered lines an instruction occupies
pub fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}

/// A point inside one step's block structure.
///
/// Ordering is block-major: blocks in index order, then instructions within
/// a block in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub block: usize,
    pub instruction: usize,
}

impl Location {
    pub fn new(block: usize, instruction: usize) -> Self {
        Self { block, instruction }
    }
}

/// A contiguous instruction range within one block (`end` exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub block: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(block: usize, start: usize, end: usize) -> Self {
        Self { block, start, end }
    }

    pub fn start(&self) -> Location {
        Location::new(self.block, self.start)
    }

    /// End sentinel; `end == block.len()` points just past the last instruction
    pub fn end(&self) -> Location {
        Location::new(self.block, self.end)
    }
}

/// How step `step` was transformed into step `step + 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Change {
    /// A span of `step` became a span of `step + 1`
    Move { step: usize, from: Span, to: Span },
    /// Two blocks merged
    BlockJoin { step: usize },
    /// A block was eliminated
    BlockRm { step: usize },
}

impl Change {
    /// Index of the step this change transforms
    pub fn step(&self) -> usize {
        match self {
            Change::Move { step, .. } | Change::BlockJoin { step } | Change::BlockRm { step } => {
                *step
            }
        }
    }

    /// Display label for the change kind
    pub fn label(&self) -> &'static str {
        match self {
            Change::Move { .. } => "move",
            Change::BlockJoin { .. } => "block join",
            Change::BlockRm { .. } => "block removed",
        }
    }
}

/// One decompilation result: the ordered steps and the changes between them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSet {
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

impl StepSet {
    pub fn new(steps: Vec<Step>, changes: Vec<Change>) -> Self {
        Self { steps, changes }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Changes whose connector geometry cannot be computed, with the reason.
    ///
    /// Rendering drops these individually; this is for diagnostics when a
    /// result is loaded.
    pub fn malformed_changes(&self) -> Vec<(usize, ProjectError)> {
        self.changes
            .iter()
            .enumerate()
            .filter_map(|(idx, change)| {
                projector::check_change(change, &self.steps)
                    .err()
                    .map(|err| (idx, err))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines("a"), 1);
        assert_eq!(count_lines("b\nc"), 2);
        assert_eq!(count_lines("a\n"), 2);
        assert_eq!(count_lines(""), 1);
    }

    #[test]
    fn test_location_block_major_order() {
        assert!(Location::new(0, 5) < Location::new(1, 0));
        assert!(Location::new(1, 0) < Location::new(1, 1));
        assert_eq!(Location::new(2, 3), Location::new(2, 3));
    }

    #[test]
    fn test_parse_wire_result() {
        let json = r#"{
            "steps": [
                [["push1 0", "push1 1"], ["invokeStk1 2"]],
                [["[puts a]"]]
            ],
            "changes": [
                {"step": 0, "tag": "move",
                 "from": {"block": 0, "start": 0, "end": 2},
                 "to": {"block": 0, "start": 0, "end": 1}},
                {"step": 0, "tag": "block_join"},
                {"step": 0, "tag": "block_rm"}
            ]
        }"#;
        let set = StepSet::from_json(json).expect("parse");
        assert_eq!(set.step_count(), 2);
        assert_eq!(set.steps[0][1], vec!["invokeStk1 2".to_string()]);
        assert_eq!(
            set.changes[0],
            Change::Move {
                step: 0,
                from: Span::new(0, 0, 2),
                to: Span::new(0, 0, 1),
            }
        );
        assert_eq!(set.changes[1], Change::BlockJoin { step: 0 });
        assert_eq!(set.changes[2], Change::BlockRm { step: 0 });
    }

    #[test]
    fn test_parse_rejects_move_without_spans() {
        let json = r#"{"steps": [], "changes": [{"step": 0, "tag": "move"}]}"#;
        assert!(StepSet::from_json(json).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_tag() {
        let json = r#"{"steps": [], "changes": [{"step": 0, "tag": "teleport"}]}"#;
        assert!(StepSet::from_json(json).is_err());
    }

    #[test]
    fn test_change_labels() {
        assert_eq!(Change::BlockJoin { step: 3 }.label(), "block join");
        assert_eq!(Change::BlockRm { step: 3 }.label(), "block removed");
        assert_eq!(Change::BlockRm { step: 3 }.step(), 3);
    }

    #[test]
    fn test_malformed_changes_reported() {
        let set = StepSet::new(
            vec![vec![vec!["a".into()]], vec![vec!["b".into()]]],
            vec![
                Change::Move {
                    step: 0,
                    from: Span::new(0, 0, 1),
                    to: Span::new(0, 0, 1),
                },
                Change::Move {
                    step: 0,
                    from: Span::new(4, 0, 1),
                    to: Span::new(0, 0, 1),
                },
                Change::BlockRm { step: 0 },
            ],
        );
        let bad = set.malformed_changes();
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].0, 1);
    }
}
