use thiserror::Error;

use crate::ops::TextRange;

/// The compiler produced offsets that disagree with the text it inserted.
///
/// This is a defect in the compiler rather than a property of the input; a
/// batch that trips it is never handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("cursor advanced by {advanced} but {inserted} units were inserted")]
    OffsetDrift { advanced: usize, inserted: usize },

    #[error("operation {op_index} styles {range:?} outside its block {block:?}")]
    RangeOutsideBlock {
        op_index: usize,
        range: TextRange,
        block: TextRange,
    },

    #[error("operation {op_index} styles {range:?} before text up to {inserted_end} exists")]
    RangeAheadOfInsertion {
        op_index: usize,
        range: TextRange,
        inserted_end: usize,
    },

    #[error("block refers to operation {op_index} but only {operations} exist")]
    MissingOperation { op_index: usize, operations: usize },

    #[error("operation {op_index} has inverted range {range:?}")]
    InvertedRange { op_index: usize, range: TextRange },
}

/// Markdown payload could not be turned into text to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no markdown content in request body")]
    Empty,

    #[error("JSON body has no string `markdown` field")]
    MissingMarkdown,

    #[error("payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("decoded payload is not UTF-8")]
    NotUtf8,

    #[error("batch body has no `requests` list")]
    MissingRequests,

    #[error("range {start}..{end} is empty")]
    EmptyRange { start: usize, end: usize },
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("compiler invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}
