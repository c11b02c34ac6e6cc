//! Compile-and-submit flows shared by the CLI commands.
//!
//! Each flow builds one batch and sends it in one call. Compilation failures
//! stop before anything is sent; service failures are returned unchanged.

use mdbatch_engine::{BatchUpdate, CompileError, CompileOptions, InputError, compile_markdown};
use serde_json::Value;
use thiserror::Error;

use crate::service::{DocumentService, ServiceError};

/// First index of a document body; index 0 holds the section break.
pub const BODY_START_INDEX: usize = 1;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// What a successful submission sent and what the service replied.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub requests: usize,
    pub reply: Value,
}

/// Compiles `markdown` and submits the result as one batch.
pub fn insert_markdown<S: DocumentService + ?Sized>(
    service: &S,
    document_id: &str,
    markdown: &str,
    options: &CompileOptions,
) -> Result<SubmitOutcome, SubmitError> {
    let compilation = compile_markdown(markdown, options)?;
    let batch = compilation.into_batch();
    if batch.is_empty() {
        return Err(InputError::Empty.into());
    }

    let reply = service.batch_update(document_id, &batch)?;
    log::info!("inserted {} request(s) into document {document_id}", batch.len());
    Ok(SubmitOutcome {
        requests: batch.len(),
        reply,
    })
}

/// The range [`clear_document`] would delete.
///
/// `start` defaults to the start of the body and `end` to just before the
/// body's final newline, which the service refuses to delete.
pub fn clear_range<S: DocumentService + ?Sized>(
    service: &S,
    document_id: &str,
    start: Option<usize>,
    end: Option<usize>,
) -> Result<BatchUpdate, SubmitError> {
    let start = start.unwrap_or(BODY_START_INDEX);
    let end = match end {
        Some(end) => end,
        None => service.end_index(document_id)?.saturating_sub(1),
    };
    Ok(BatchUpdate::clear(start, end)?)
}

/// Deletes document content in one batch.
pub fn clear_document<S: DocumentService + ?Sized>(
    service: &S,
    document_id: &str,
    start: Option<usize>,
    end: Option<usize>,
) -> Result<SubmitOutcome, SubmitError> {
    let batch = clear_range(service, document_id, start, end)?;
    let reply = service.batch_update(document_id, &batch)?;
    log::info!("cleared content of document {document_id}");
    Ok(SubmitOutcome {
        requests: batch.len(),
        reply,
    })
}

/// Submits an already-built `{"requests": [...]}` body as is.
pub fn apply_batch<S: DocumentService + ?Sized>(
    service: &S,
    document_id: &str,
    body: &Value,
) -> Result<SubmitOutcome, SubmitError> {
    let requests = body
        .get("requests")
        .and_then(Value::as_array)
        .map(Vec::len)
        .ok_or(InputError::MissingRequests)?;

    let reply = service.submit(document_id, body)?;
    log::info!("applied {requests} request(s) to document {document_id}");
    Ok(SubmitOutcome { requests, reply })
}
