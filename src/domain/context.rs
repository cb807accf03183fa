//! Operation Context
//!
//! Contains metadata about the current operation for tracing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for an operation, carried from the HTTP layer into the handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Authenticated employee performing the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Uuid>,

    /// Request ID for log correlation (x-request-id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            employee_id: None,
            request_id: None,
        }
    }

    /// Create context with the authenticated employee
    pub fn with_employee(mut self, employee_id: Uuid) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    /// Create context with request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Generate a new request ID if not present
    pub fn ensure_request_id(&mut self) -> &str {
        self.request_id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .as_str()
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}
