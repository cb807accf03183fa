//! Login Handler
//!
//! Issues a token for a returning employee, or registers a new one with
//! the starting balance on first login.

use std::sync::Arc;

use crate::auth::{password, AuthService};
use crate::domain::{Employee, STARTING_BALANCE};
use crate::error::AppError;
use crate::ledger::{LedgerStore, StoreError};

use super::{LoginCommand, LoginResult};

const MAX_USERNAME_LEN: usize = 64;
const MIN_PASSWORD_LEN: usize = 6;

/// Handler for `POST /api/auth`
#[derive(Clone)]
pub struct LoginHandler {
    store: Arc<dyn LedgerStore>,
    auth: Arc<dyn AuthService>,
}

impl LoginHandler {
    pub fn new(store: Arc<dyn LedgerStore>, auth: Arc<dyn AuthService>) -> Self {
        Self { store, auth }
    }

    /// Execute the login command
    pub async fn execute(&self, command: LoginCommand) -> Result<LoginResult, AppError> {
        let username = normalize_username(&command.username)?;
        if command.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidRequest(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if let Some(employee) = self.store.find_employee_by_username(&username).await? {
            return self.login_existing(employee, command.password).await;
        }

        let password_hash = run_blocking({
            let password = command.password.clone();
            move || password::hash_password(&password)
        })
        .await??;

        match self
            .store
            .create_employee(&username, &password_hash, STARTING_BALANCE)
            .await
        {
            Ok(employee) => {
                tracing::info!(employee_id = %employee.id, %username, "Employee registered");
                let token = self.auth.issue(employee.id)?;
                Ok(LoginResult {
                    employee_id: employee.id,
                    token,
                    registered: true,
                })
            }
            // Lost a race with a concurrent first login of the same name
            Err(StoreError::UsernameTaken(_)) => {
                let employee = self
                    .store
                    .find_employee_by_username(&username)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!("employee {} vanished after insert", username))
                    })?;
                self.login_existing(employee, command.password).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn login_existing(
        &self,
        employee: Employee,
        password: String,
    ) -> Result<LoginResult, AppError> {
        let stored_hash = employee.password_hash.clone();
        let matches =
            run_blocking(move || password::verify_password(&password, &stored_hash)).await??;

        if !matches {
            tracing::warn!(employee_id = %employee.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.auth.issue(employee.id)?;
        Ok(LoginResult {
            employee_id: employee.id,
            token,
            registered: false,
        })
    }
}

/// Lowercase and validate a username
pub fn normalize_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim().to_lowercase();

    if username.is_empty() {
        return Err(AppError::InvalidRequest("username is required".to_string()));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(AppError::InvalidRequest(format!(
            "username must be at most {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::InvalidRequest(
            "username must contain only latin letters and digits".to_string(),
        ));
    }

    Ok(username)
}

async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))
}
