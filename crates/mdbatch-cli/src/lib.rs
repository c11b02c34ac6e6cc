//! mdbatch command-line client
//!
//! Compiles Markdown into batch update requests and submits them to a
//! Google Docs style document service:
//!
//! ```bash
//! # Print the requests for a document without sending anything
//! mdbatch compile notes.md
//!
//! # Append the compiled content to a document
//! MDBATCH_ACCESS_TOKEN=... mdbatch insert 1AbC notes.md
//!
//! # Delete everything in the document body
//! mdbatch clear 1AbC
//! ```

pub mod app;
pub mod service;
pub mod submit;

pub use app::run_cli;
pub use service::{DocsClient, DocumentService, ServiceError};
pub use submit::{SubmitError, SubmitOutcome, apply_batch, clear_document, insert_markdown};
