//! Shared application state

use std::sync::Arc;

use crate::auth::{AuthGate, AuthService};
use crate::domain::WalletPolicy;
use crate::handlers::{LoginHandler, PurchaseHandler, TransferHandler};
use crate::ledger::LedgerStore;
use crate::wallet_view::WalletViewService;

/// Handlers wired to one ledger store and one token service
#[derive(Clone)]
pub struct AppState {
    pub gate: AuthGate,
    pub login: LoginHandler,
    pub transfer: TransferHandler,
    pub purchase: PurchaseHandler,
    pub wallet: WalletViewService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        auth: Arc<dyn AuthService>,
        policy: WalletPolicy,
    ) -> Self {
        Self {
            gate: AuthGate::new(auth.clone(), store.clone()),
            login: LoginHandler::new(store.clone(), auth),
            transfer: TransferHandler::new(store.clone(), policy),
            purchase: PurchaseHandler::new(store.clone(), policy),
            wallet: WalletViewService::new(store),
        }
    }
}
