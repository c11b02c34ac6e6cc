use crate::compile::{Compilation, utf16_len};
use crate::error::InvariantViolation;
use crate::ops::EditOperation;

/// Verifies the offset bookkeeping of a finished compilation.
///
/// - the cursor advanced by exactly the length of all inserted text
/// - no range addresses text that has not been inserted yet
/// - every range stays inside the offsets of the block that emitted it
pub fn check(compilation: &Compilation) -> Result<(), InvariantViolation> {
    let advanced = compilation
        .final_offset
        .saturating_sub(compilation.initial_offset);
    let inserted = compilation.inserted_len();
    if advanced != inserted {
        return Err(InvariantViolation::OffsetDrift { advanced, inserted });
    }

    let mut inserted_end = compilation.initial_offset;
    for (op_index, op) in compilation.operations.iter().enumerate() {
        if let EditOperation::InsertText { text } = op {
            inserted_end += utf16_len(text);
            continue;
        }
        let Some(range) = op.range() else {
            continue;
        };
        if range.start > range.end {
            return Err(InvariantViolation::InvertedRange { op_index, range });
        }
        if range.end > inserted_end {
            return Err(InvariantViolation::RangeAheadOfInsertion {
                op_index,
                range,
                inserted_end,
            });
        }
    }

    for block in &compilation.blocks {
        for op_index in block.ops.clone() {
            let Some(op) = compilation.operations.get(op_index) else {
                return Err(InvariantViolation::MissingOperation {
                    op_index,
                    operations: compilation.operations.len(),
                });
            };
            let Some(range) = op.range() else {
                continue;
            };
            if range.start < block.offsets.start || range.end > block.offsets.end {
                return Err(InvariantViolation::RangeOutsideBlock {
                    op_index,
                    range,
                    block: block.offsets,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::BlockRecord;
    use crate::ops::{TextRange, TextStyle};

    fn compilation(operations: Vec<EditOperation>, blocks: Vec<BlockRecord>, end: usize) -> Compilation {
        Compilation {
            operations,
            blocks,
            initial_offset: 1,
            final_offset: end,
        }
    }

    fn bold(start: usize, end: usize) -> EditOperation {
        EditOperation::SetTextStyle {
            style: TextStyle::Bold,
            range: TextRange::new(start, end),
        }
    }

    #[test]
    fn consistent_compilation_passes() {
        let c = compilation(
            vec![EditOperation::insert_text("ab\n"), bold(1, 3)],
            vec![BlockRecord {
                ops: 0..2,
                offsets: TextRange::new(1, 4),
            }],
            4,
        );
        assert_eq!(check(&c), Ok(()));
    }

    #[test]
    fn detects_offset_drift() {
        let c = compilation(vec![EditOperation::insert_text("ab\n")], vec![], 5);
        assert_eq!(
            check(&c),
            Err(InvariantViolation::OffsetDrift {
                advanced: 4,
                inserted: 3
            })
        );
    }

    #[test]
    fn detects_style_before_insert() {
        let c = compilation(
            vec![bold(1, 3), EditOperation::insert_text("ab\n")],
            vec![],
            4,
        );
        assert!(matches!(
            check(&c),
            Err(InvariantViolation::RangeAheadOfInsertion { op_index: 0, .. })
        ));
    }

    #[test]
    fn detects_range_spilling_into_previous_block() {
        let c = compilation(
            vec![
                EditOperation::insert_text("a\n"),
                EditOperation::insert_text("b\n"),
                bold(2, 5),
            ],
            vec![
                BlockRecord {
                    ops: 0..1,
                    offsets: TextRange::new(1, 3),
                },
                BlockRecord {
                    ops: 1..3,
                    offsets: TextRange::new(3, 5),
                },
            ],
            5,
        );
        assert!(matches!(
            check(&c),
            Err(InvariantViolation::RangeOutsideBlock { op_index: 2, .. })
        ));
    }

    #[test]
    fn block_pointing_past_operations_is_reported() {
        let c = compilation(
            vec![EditOperation::insert_text("ab\n")],
            vec![BlockRecord {
                ops: 0..3,
                offsets: TextRange::new(1, 4),
            }],
            4,
        );
        assert_eq!(
            check(&c),
            Err(InvariantViolation::MissingOperation {
                op_index: 1,
                operations: 1
            })
        );
    }

    #[test]
    fn detects_inverted_range() {
        let c = compilation(
            vec![EditOperation::insert_text("ab\n"), bold(3, 2)],
            vec![],
            4,
        );
        assert!(matches!(
            check(&c),
            Err(InvariantViolation::InvertedRange { op_index: 1, .. })
        ));
    }
}
