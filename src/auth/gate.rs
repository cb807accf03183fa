//! Authentication Gate
//!
//! Turns a bearer credential into an employee id. A valid token for an
//! employee that no longer exists is still refused.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::ledger::LedgerStore;

use super::AuthService;

#[derive(Clone)]
pub struct AuthGate {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn LedgerStore>,
}

impl AuthGate {
    pub fn new(auth: Arc<dyn AuthService>, store: Arc<dyn LedgerStore>) -> Self {
        Self { auth, store }
    }

    /// Validate the credential and confirm the employee exists
    pub async fn authenticate(&self, credential: &str) -> Result<Uuid, AppError> {
        let employee_id = self.auth.verify(credential)?;

        match self.store.find_employee_by_id(employee_id).await? {
            Some(employee) => Ok(employee.id),
            None => {
                tracing::warn!(%employee_id, "Token for unknown employee");
                Err(AppError::Unauthorized("employee not found".to_string()))
            }
        }
    }
}
