//! Rendered-line offsets inside a step's block structure

use crate::model::{count_lines, Location, Step};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OffsetError {
    #[error("block {block} out of bounds (step has {blocks} blocks)")]
    BlockOutOfBounds { block: usize, blocks: usize },
    #[error("instruction {instruction} out of bounds in block {block} (block has {len})")]
    InstructionOutOfBounds {
        block: usize,
        instruction: usize,
        len: usize,
    },
}

/// Number of rendered lines preceding `location` in block-major order.
///
/// `location.instruction == block.len()` is the end sentinel of that block.
pub fn line_offset(step: &Step, location: Location) -> Result<usize, OffsetError> {
    let block = step
        .get(location.block)
        .ok_or(OffsetError::BlockOutOfBounds {
            block: location.block,
            blocks: step.len(),
        })?;
    if location.instruction > block.len() {
        return Err(OffsetError::InstructionOutOfBounds {
            block: location.block,
            instruction: location.instruction,
            len: block.len(),
        });
    }

    let before: usize = step[..location.block]
        .iter()
        .flatten()
        .map(|inst| count_lines(inst))
        .sum();
    let within: usize = block[..location.instruction]
        .iter()
        .map(|inst| count_lines(inst))
        .sum();
    Ok(before + within)
}

/// Total rendered lines of a step
pub fn step_line_count(step: &Step) -> usize {
    step.iter().flatten().map(|inst| count_lines(inst)).sum()
}

/// One display line of a flattened step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLine<'a> {
    pub text: &'a str,
    pub block: usize,
    /// True for the first line of an instruction
    pub starts_instruction: bool,
}

/// Flatten a step into display lines, split the same way offsets are counted
pub fn render_lines(step: &Step) -> Vec<RenderLine<'_>> {
    let mut lines = Vec::with_capacity(step_line_count(step));
    for (block_idx, block) in step.iter().enumerate() {
        for inst in block {
            for (i, text) in inst.split('\n').enumerate() {
                lines.push(RenderLine {
                    text,
                    block: block_idx,
                    starts_instruction: i == 0,
                });
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(blocks: &[&[&str]]) -> Step {
        blocks
            .iter()
            .map(|b| b.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_offset_counts_embedded_lines() {
        let s = step(&[&["a", "b\nc"]]);
        assert_eq!(line_offset(&s, Location::new(0, 0)), Ok(0));
        assert_eq!(line_offset(&s, Location::new(0, 1)), Ok(1));
        assert_eq!(line_offset(&s, Location::new(0, 2)), Ok(3));
    }

    #[test]
    fn test_offset_across_blocks() {
        let s = step(&[&["a", "b"], &["c\nd\ne"], &[], &["f"]]);
        assert_eq!(line_offset(&s, Location::new(1, 0)), Ok(2));
        assert_eq!(line_offset(&s, Location::new(1, 1)), Ok(5));
        assert_eq!(line_offset(&s, Location::new(2, 0)), Ok(5));
        assert_eq!(line_offset(&s, Location::new(3, 0)), Ok(5));
        assert_eq!(line_offset(&s, Location::new(3, 1)), Ok(6));
    }

    #[test]
    fn test_offset_is_monotone() {
        let s = step(&[&["a\nb", "c"], &[], &["d", "e\n\nf", "g"], &["h"]]);
        let mut locations = Vec::new();
        for (b, block) in s.iter().enumerate() {
            for i in 0..=block.len() {
                locations.push(Location::new(b, i));
            }
        }
        locations.sort();
        let offsets: Vec<usize> = locations
            .iter()
            .map(|loc| line_offset(&s, *loc).expect("in bounds"))
            .collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*offsets.last().unwrap(), step_line_count(&s));
    }

    #[test]
    fn test_offset_out_of_bounds() {
        let s = step(&[&["a"], &["b", "c"]]);
        assert_eq!(
            line_offset(&s, Location::new(2, 0)),
            Err(OffsetError::BlockOutOfBounds {
                block: 2,
                blocks: 2
            })
        );
        assert_eq!(
            line_offset(&s, Location::new(1, 3)),
            Err(OffsetError::InstructionOutOfBounds {
                block: 1,
                instruction: 3,
                len: 2
            })
        );
        assert!(line_offset(&Step::new(), Location::new(0, 0)).is_err());
    }

    #[test]
    fn test_render_lines_match_offsets() {
        let s = step(&[&["a", "b\nc"], &["d"]]);
        let lines = render_lines(&s);
        let texts: Vec<&str> = lines.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
        assert_eq!(lines.len(), step_line_count(&s));
        assert_eq!(lines[3].block, 1);
        assert!(lines[1].starts_instruction);
        assert!(!lines[2].starts_instruction);
        let d = line_offset(&s, Location::new(1, 0)).unwrap();
        assert_eq!(lines[d].text, "d");
    }
}
