//! Load Testing Tool
//!
//! Fires concurrent random transfers at PostgreSQL and checks that no coins
//! were created or destroyed.
//!
//! Run with: cargo run --bin load_test --release -- --employees 20 --transfers 2000

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use tokio::task::JoinSet;

use coin_wallet::domain::{DomainError, OperationContext, WalletPolicy, STARTING_BALANCE};
use coin_wallet::handlers::{TransferCommand, TransferHandler};
use coin_wallet::{db, AppError, Config, LedgerStore, PgLedgerStore, StoreError};

fn arg<T: std::str::FromStr>(args: &[String], name: &str, default: T) -> T {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let employee_count: usize = arg(&args, "--employees", 20);
    let transfer_count: usize = arg(&args, "--transfers", 2000);
    let retries: u32 = arg(&args, "--retries", 0);
    anyhow::ensure!(employee_count >= 2, "--employees must be at least 2");

    let config = Config::from_env()?;

    println!(
        "Load Test - {} concurrent transfers between {} employees",
        transfer_count, employee_count
    );
    println!("Connecting to database...");

    let pool = db::connect(&config).await?;
    let store: Arc<dyn LedgerStore> = Arc::new(PgLedgerStore::new(pool.clone()));

    // Fresh employees so repeated runs don't interfere
    let run_tag: u32 = rand::thread_rng().gen();
    let mut employees = Vec::with_capacity(employee_count);
    for i in 0..employee_count {
        let username = format!("load{}x{}", run_tag, i);
        let employee = store
            .create_employee(&username, "load-test", STARTING_BALANCE)
            .await?;
        employees.push(employee);
    }

    let handler = TransferHandler::new(
        store.clone(),
        WalletPolicy::default().with_serialization_retries(retries),
    );

    let plan: Vec<(usize, usize, i64)> = {
        let mut rng = rand::thread_rng();
        (0..transfer_count)
            .map(|_| {
                let from = rng.gen_range(0..employee_count);
                let to = (from + rng.gen_range(1..employee_count)) % employee_count;
                (from, to, rng.gen_range(1..=STARTING_BALANCE / 2))
            })
            .collect()
    };

    let start = Instant::now();
    let mut tasks = JoinSet::new();
    for (from, to, amount) in plan {
        let handler = handler.clone();
        let sender = employees[from].id;
        let recipient = employees[to].username.clone();

        tasks.spawn(async move {
            handler
                .execute(
                    TransferCommand::new(sender, recipient, amount),
                    &OperationContext::new().with_employee(sender),
                )
                .await
        });
    }

    let (mut committed, mut insufficient, mut conflicts, mut failed) = (0u64, 0u64, 0u64, 0u64);
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(_) => committed += 1,
            Err(AppError::Domain(DomainError::InsufficientFunds)) => insufficient += 1,
            Err(AppError::Store(StoreError::SerializationFailure)) => conflicts += 1,
            Err(e) => {
                failed += 1;
                eprintln!("Transfer failed: {}", e);
            }
        }
    }
    let elapsed = start.elapsed();

    let mut total = 0i64;
    let mut negative = 0usize;
    for employee in &employees {
        let balance = store.balance(employee.id).await?.unwrap_or_default();
        if balance < 0 {
            negative += 1;
        }
        total += balance;
    }
    let expected = STARTING_BALANCE * employee_count as i64;

    println!("\n=== Load Test Results ===");
    println!("Transfers: {}", transfer_count);
    println!("Committed: {}", committed);
    println!("Insufficient funds: {}", insufficient);
    println!("Serialization conflicts: {}", conflicts);
    println!("Other failures: {}", failed);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!(
        "Rate: {:.0} transfers/sec",
        transfer_count as f64 / elapsed.as_secs_f64()
    );
    println!("Coins: {} (expected {})", total, expected);

    pool.close().await;

    if total != expected || negative > 0 {
        anyhow::bail!(
            "ledger invariant broken: total {} != {} or {} negative wallets",
            total,
            expected,
            negative
        );
    }

    println!("Invariant holds: coins conserved, no negative balances");
    Ok(())
}
