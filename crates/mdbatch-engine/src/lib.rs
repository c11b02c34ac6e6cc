pub mod batch;
pub mod compile;
pub mod error;
pub mod invariants;
pub mod lexer;
pub mod ops;
pub mod payload;
pub mod tokens;

// Re-export key types for easier usage
pub use batch::{BatchUpdate, batch_update_path, document_path};
pub use compile::{Compilation, CompileOptions, compile, compile_markdown};
pub use error::{CompileError, InputError, InvariantViolation};
pub use lexer::lex;
pub use ops::{EditOperation, TextRange, TextStyle};
pub use payload::extract_markdown;
pub use tokens::{BlockToken, InlineToken, ListItem};
