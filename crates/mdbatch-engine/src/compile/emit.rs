use std::ops::Range;

use crate::ops::{EditOperation, TextRange};

/// Operations and document offsets produced by one block token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    /// Indices into the emitted operation list.
    pub ops: Range<usize>,
    /// Cursor before and after the block.
    pub offsets: TextRange,
}

/// Append-only accumulator of operations in document order.
#[derive(Debug, Default)]
pub struct Emitter {
    ops: Vec<EditOperation>,
    blocks: Vec<BlockRecord>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: impl Into<String>) {
        self.ops.push(EditOperation::insert_text(text));
    }

    pub fn push(&mut self, op: EditOperation) {
        self.ops.push(op);
    }

    /// Number of operations emitted so far.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Marks everything emitted since `first_op` as belonging to one block.
    pub fn close_block(&mut self, first_op: usize, offsets: TextRange) {
        self.blocks.push(BlockRecord {
            ops: first_op..self.ops.len(),
            offsets,
        });
    }

    pub fn finish(self) -> (Vec<EditOperation>, Vec<BlockRecord>) {
        (self.ops, self.blocks)
    }
}
