//! Packaging of operations into a single `batchUpdate` request.

use serde::Serialize;

use crate::error::InputError;
use crate::ops::{EditOperation, TextRange};

/// Request body submitted to the Document Update Service in one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchUpdate {
    pub requests: Vec<EditOperation>,
}

impl BatchUpdate {
    pub fn new(requests: Vec<EditOperation>) -> Self {
        Self { requests }
    }

    /// Batch deleting the body content between `start` and `end`.
    ///
    /// The service keeps a final newline it will not delete, so callers usually
    /// pass the document's end index minus one as `end`.
    pub fn clear(start: usize, end: usize) -> Result<Self, InputError> {
        if end <= start {
            return Err(InputError::EmptyRange { start, end });
        }
        Ok(Self::new(vec![EditOperation::DeleteContentRange {
            range: TextRange::new(start, end),
        }]))
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Service path of the batch update endpoint for `document_id`.
pub fn batch_update_path(document_id: &str) -> String {
    format!("/v1/documents/{document_id}:batchUpdate")
}

/// Service path of the document resource for `document_id`.
pub fn document_path(document_id: &str) -> String {
    format!("/v1/documents/{document_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wraps_operations_under_requests() {
        let batch = BatchUpdate::new(vec![EditOperation::insert_text("\n")]);
        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({"requests": [{"insertText": {"text": "\n", "endOfSegmentLocation": {}}}]})
        );
    }

    #[test]
    fn empty_batch_serializes_to_empty_list() {
        let batch = BatchUpdate::new(vec![]);
        assert!(batch.is_empty());
        assert_eq!(serde_json::to_value(&batch).unwrap(), json!({"requests": []}));
    }

    #[test]
    fn clear_builds_single_delete() {
        let batch = BatchUpdate::clear(1, 42).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.requests[0],
            EditOperation::DeleteContentRange {
                range: TextRange::new(1, 42)
            }
        );
    }

    #[test]
    fn clear_rejects_empty_range() {
        assert_eq!(
            BatchUpdate::clear(1, 1),
            Err(InputError::EmptyRange { start: 1, end: 1 })
        );
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(batch_update_path("abc"), "/v1/documents/abc:batchUpdate");
        assert_eq!(document_path("abc"), "/v1/documents/abc");
    }
}
