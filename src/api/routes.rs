//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::{OperationContext, WalletView};
use crate::error::AppError;
use crate::handlers::{LoginCommand, PurchaseCommand, TransferCommand};

use super::middleware::AuthenticatedEmployee;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub coins: i64,
    pub inventory: Vec<InventoryEntry>,
    pub coin_history: CoinHistoryResponse,
}

#[derive(Debug, Serialize)]
pub struct InventoryEntry {
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct CoinHistoryResponse {
    pub received: Vec<ReceivedEntry>,
    pub sent: Vec<SentEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedEntry {
    pub from_user: String,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentEntry {
    pub to_user: String,
    pub amount: i64,
}

impl From<WalletView> for InfoResponse {
    fn from(view: WalletView) -> Self {
        Self {
            coins: view.coins,
            inventory: view
                .inventory
                .into_iter()
                .map(|item| InventoryEntry {
                    item_type: item.name,
                    quantity: item.quantity,
                })
                .collect(),
            coin_history: CoinHistoryResponse {
                received: view
                    .coin_history
                    .received
                    .into_iter()
                    .map(|t| ReceivedEntry {
                        from_user: t.username,
                        amount: t.amount,
                    })
                    .collect(),
                sent: view
                    .coin_history
                    .sent
                    .into_iter()
                    .map(|t| SentEntry {
                        to_user: t.username,
                        amount: t.amount,
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinRequest {
    pub to_user: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct BuyQuery {
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

// =========================================================================
// API Router
// =========================================================================

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth", post(authenticate))
}

/// Routes behind the authentication gate
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/info", get(info))
        .route("/sendCoin", post(send_coin))
        .route("/buy/:item", get(buy))
}

// =========================================================================
// POST /api/auth
// =========================================================================

/// Log in, registering on first use
async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let result = state
        .login
        .execute(LoginCommand::new(request.username, request.password))
        .await?;

    Ok(Json(AuthResponse {
        token: result.token,
    }))
}

// =========================================================================
// GET /api/info
// =========================================================================

/// Wallet balance, inventory and coin history
async fn info(
    State(state): State<AppState>,
    Extension(employee): Extension<AuthenticatedEmployee>,
) -> Result<Json<InfoResponse>, AppError> {
    let view = state.wallet.get_wallet_view(employee.employee_id).await?;

    Ok(Json(view.into()))
}

// =========================================================================
// POST /api/sendCoin
// =========================================================================

/// Send coins to another employee
async fn send_coin(
    State(state): State<AppState>,
    Extension(employee): Extension<AuthenticatedEmployee>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<SendCoinRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    if request.to_user.trim().is_empty() {
        return Err(AppError::InvalidRequest("toUser is required".to_string()));
    }

    let command = TransferCommand::new(employee.employee_id, request.to_user, request.amount);
    state.transfer.execute(command, &context).await?;

    Ok(StatusCode::OK)
}

// =========================================================================
// GET /api/buy/:item
// =========================================================================

/// Buy merch from the catalog
async fn buy(
    State(state): State<AppState>,
    Extension(employee): Extension<AuthenticatedEmployee>,
    Extension(context): Extension<OperationContext>,
    Path(item): Path<String>,
    query: Result<Query<BuyQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Query(query) = query.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let command = PurchaseCommand::new(employee.employee_id, item).with_quantity(query.quantity);
    state.purchase.execute(command, &context).await?;

    Ok(StatusCode::OK)
}
