//! Common test utilities
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use coin_wallet::api::{self, AppState};
use coin_wallet::auth::JwtAuthService;
use coin_wallet::domain::WalletPolicy;
use coin_wallet::MemoryLedgerStore;

/// Connect and migrate the test database, or `None` when DATABASE_URL is unset
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Username that will not collide with earlier runs
pub fn unique_username(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Router backed by an in-memory ledger
pub fn memory_app(store: Arc<MemoryLedgerStore>, policy: WalletPolicy) -> Router {
    let auth = Arc::new(JwtAuthService::new("integration-secret", Duration::hours(1)));
    api::build_router(AppState::new(store, auth, policy))
}
