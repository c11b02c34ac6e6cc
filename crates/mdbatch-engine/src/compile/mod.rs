//! # Markdown to edit-operation compiler
//!
//! Drives block tokens through the dispatcher with a single advancing
//! [`Cursor`], collecting operations in document order:
//!
//! ```text
//! markdown ─► lexer ─► [BlockToken] ─► dispatch (+ inline, table) ─► Emitter ─► BatchUpdate
//!                                          ▲
//!                                       Cursor
//! ```
//!
//! Every block inserts its text before styling it, and every offset delta is
//! measured from the text actually inserted. The finished list is checked
//! against those rules before it is returned.

pub mod cursor;
pub mod dispatch;
pub mod emit;
pub mod inline;
pub mod table;

use crate::batch::BatchUpdate;
use crate::error::CompileError;
use crate::invariants;
use crate::lexer::lex;
use crate::ops::{EditOperation, TextRange};
use crate::tokens::BlockToken;

pub use cursor::{Cursor, utf16_len};
pub use emit::{BlockRecord, Emitter};
pub use inline::{ComposedInline, StyleSpan, compose};

pub const DEFAULT_INITIAL_OFFSET: usize = 1;
pub const DEFAULT_MONOSPACE_FONT: &str = "Consolas";
pub const DEFAULT_ORDERED_PRESET: &str = "NUMBERED_DECIMAL_ALPHA_ROMAN";
pub const DEFAULT_UNORDERED_PRESET: &str = "BULLET_DISC_CIRCLE_SQUARE";

/// Knobs for one compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Offset at which the first inserted character lands.
    pub initial_offset: usize,
    /// Font family applied to flattened tables.
    pub monospace_font: String,
    pub ordered_preset: String,
    pub unordered_preset: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            initial_offset: DEFAULT_INITIAL_OFFSET,
            monospace_font: DEFAULT_MONOSPACE_FONT.to_string(),
            ordered_preset: DEFAULT_ORDERED_PRESET.to_string(),
            unordered_preset: DEFAULT_UNORDERED_PRESET.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn with_initial_offset(mut self, initial_offset: usize) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn bullet_preset(&self, ordered: bool) -> &str {
        if ordered {
            &self.ordered_preset
        } else {
            &self.unordered_preset
        }
    }
}

/// Result of compiling one Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    pub operations: Vec<EditOperation>,
    /// Per-block bookkeeping, in input order.
    pub blocks: Vec<BlockRecord>,
    pub initial_offset: usize,
    pub final_offset: usize,
}

impl Compilation {
    /// Total length of all inserted text, in document units.
    pub fn inserted_len(&self) -> usize {
        self.operations
            .iter()
            .filter_map(EditOperation::inserted_text)
            .map(utf16_len)
            .sum()
    }

    pub fn into_batch(self) -> BatchUpdate {
        BatchUpdate::new(self.operations)
    }
}

/// Compiles an already-lexed token sequence.
pub fn compile(tokens: &[BlockToken], options: &CompileOptions) -> Result<Compilation, CompileError> {
    let mut cursor = Cursor::new(options.initial_offset);
    let mut out = Emitter::new();

    for token in tokens {
        let first_op = out.len();
        let start = cursor.pos();
        dispatch::dispatch(token, &mut cursor, options, &mut out);
        log::debug!(
            "{} block: offsets {}..{}, {} operation(s)",
            token.kind_name(),
            start,
            cursor.pos(),
            out.len() - first_op
        );
        out.close_block(first_op, TextRange::new(start, cursor.pos()));
    }

    let (operations, blocks) = out.finish();
    let compilation = Compilation {
        operations,
        blocks,
        initial_offset: options.initial_offset,
        final_offset: cursor.pos(),
    };
    invariants::check(&compilation)?;

    log::info!(
        "compiled {} block(s) into {} request(s), offsets {}..{}",
        tokens.len(),
        compilation.operations.len(),
        compilation.initial_offset,
        compilation.final_offset
    );
    Ok(compilation)
}

/// Lexes and compiles Markdown source.
pub fn compile_markdown(markdown: &str, options: &CompileOptions) -> Result<Compilation, CompileError> {
    compile(&lex(markdown), options)
}
