//! # Cashdesk: Cashier Session Management
//!
//! Opens and closes cashier sessions, records the sales and cash movements
//! made while a session is open, and keeps every session in SQLite.
//!
//! ## Module Structure
//! ```text
//! src/
//! ├── lib.rs           ◄─── You are here (wiring, tracing, CLI dispatch)
//! ├── main.rs          ◄─── Binary entry point
//! ├── cli.rs           ◄─── clap command definitions
//! ├── config.rs        ◄─── TOML + environment configuration
//! ├── error.rs         ◄─── API error type
//! ├── outcome.rs       ◄─── Lifecycle outcomes and their publisher
//! ├── commands/
//! │   ├── mod.rs
//! │   └── cashier.rs   ◄─── CashierService (the lifecycle controller)
//! └── state/
//!     ├── mod.rs
//!     └── session.rs   ◄─── Current/past sessions and the acting user
//! ```
//!
//! ## Startup Sequence
//! ```text
//! 1. Parse CLI, initialize tracing
//! 2. Load AppConfig (defaults → cashdesk.toml → CASHDESK_* env)
//! 3. Open the SQLite database, run migrations
//! 4. Build CashierService over the repository
//! 5. get_all_cashiers → current/past sessions
//! 6. Run the requested command, print the result as JSON
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod outcome;
pub mod state;

use std::sync::Arc;

use cashdesk_core::{CashMovement, CashierPayload, MovementKind, SaleRecord};
use cashdesk_db::Database;
use serde_json::{json, Value};
use tracing::{debug, info, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::CashierService;
use crate::config::AppConfig;
use crate::error::ApiResult;
use crate::outcome::CashierOutcome;
use crate::state::SessionStore;

/// Default log filter; `--verbose` swaps in [`VERBOSE_FILTER`].
pub const DEFAULT_FILTER: &str = "info,cashdesk=debug,sqlx=warn";
pub const VERBOSE_FILTER: &str = "debug,sqlx=warn";

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout carries only command output.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    log_subscriber(filter).init();
}

/// Formatting subscriber writing to stderr, gated only by `filter`.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Runs one CLI invocation. Returns whether the command succeeded.
pub async fn run(cli: Cli) -> ApiResult<bool> {
    info!("Starting cashdesk");

    let config = AppConfig::load(cli.config)?;
    let user = cli.user.unwrap_or_else(|| config.user().to_string());

    let database = Database::new(config.db_config()?).await?;
    let service = CashierService::new(
        Arc::new(database.cashiers()),
        SessionStore::with_user(user),
        Arc::new(config.formatter()),
    );

    let result = execute(&service, cli.command).await;
    database.close().await;

    let (output, success) = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(success)
}

/// Loads every session, then runs `command` against the loaded state.
///
/// Returns the JSON to print and whether the command succeeded.
pub async fn execute(service: &CashierService, command: Command) -> ApiResult<(Value, bool)> {
    let loaded = service.get_all_cashiers().await?;
    if !loaded.is_success() {
        return rendered(&loaded);
    }

    debug!(?command, "Dispatching command");

    let outcome = match command {
        Command::List => {
            let snapshot = service.state().snapshot();
            return Ok((
                json!({ "current": snapshot.current, "past": snapshot.past }),
                true,
            ));
        }

        Command::Status => {
            let snapshot = service.state().snapshot();
            return Ok((
                json!({
                    "user": snapshot.user,
                    "current": snapshot.current,
                    "lastError": snapshot.last_error,
                }),
                true,
            ));
        }

        Command::Open { amount } => service.create_cashier(amount).await?,

        Command::Close => service.close_cashier().await?,

        Command::Sale { json } => {
            let sale: SaleRecord = serde_json::from_str(&json)?;
            service.on_add_sale(&sale).await?
        }

        Command::EditSale { json } => {
            let sale: SaleRecord = serde_json::from_str(&json)?;
            service.on_edit_sale(&sale).await?
        }

        Command::AddMoney { amount, reason } => {
            let movement = CashMovement::new(MovementKind::AddMoney, amount, reason);
            service.record_cash_movement(&movement).await?
        }

        Command::TakeMoney { amount, reason } => {
            let movement = CashMovement::new(MovementKind::TakeMoney, amount, reason);
            service.record_cash_movement(&movement).await?
        }

        Command::Edit { json } => {
            let payload: CashierPayload = serde_json::from_str(&json)?;
            service.edit_cashier(payload).await?
        }
    };

    rendered(&outcome)
}

fn rendered(outcome: &CashierOutcome) -> ApiResult<(Value, bool)> {
    Ok((serde_json::to_value(outcome)?, outcome.is_success()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cashdesk_core::{LocalizedFormatter, Money};
    use cashdesk_db::DbConfig;
    use chrono::{FixedOffset, Locale};

    async fn service() -> CashierService {
        let database = Database::new(DbConfig::in_memory()).await.unwrap();
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        CashierService::new(
            Arc::new(database.cashiers()),
            SessionStore::with_user("alice"),
            Arc::new(LocalizedFormatter::new(Locale::pt_BR, offset)),
        )
    }

    #[tokio::test]
    async fn test_open_sale_and_close() {
        let service = service().await;

        let (output, success) = execute(&service, Command::Open { amount: Money::from_cents(10000) })
            .await
            .unwrap();
        assert!(success);
        assert_eq!(output["type"], "CREATE_SUCCESS");
        assert_eq!(output["payload"]["openBy"], "alice");
        assert_eq!(output["payload"]["closedBy"], "-");

        let sale = r#"{"id":"s1","profit":25.5,"total":80}"#.to_string();
        let (output, _) = execute(&service, Command::Sale { json: sale }).await.unwrap();
        assert_eq!(output["type"], "EDIT_SUCCESS");
        assert_eq!(output["payload"]["totalProfit"], 25.5);
        assert_eq!(output["payload"]["operations"][0]["type"], "SALE");

        let (output, _) = execute(&service, Command::Close).await.unwrap();
        assert_eq!(output["payload"]["closedBy"], "alice");

        let (output, _) = execute(&service, Command::Status).await.unwrap();
        assert!(output["current"].is_null());
    }

    #[tokio::test]
    async fn test_list_reloads_from_storage() {
        let service = service().await;
        execute(&service, Command::Open { amount: Money::from_cents(500) }).await.unwrap();
        execute(&service, Command::Close).await.unwrap();
        execute(&service, Command::Open { amount: Money::from_cents(700) }).await.unwrap();

        let (output, success) = execute(&service, Command::List).await.unwrap();
        assert!(success);
        assert_eq!(output["current"]["initialMoneyCashier"], 7.0);
        assert_eq!(output["past"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_cash_movements_through_commands() {
        let service = service().await;
        execute(&service, Command::Open { amount: Money::from_cents(0) }).await.unwrap();

        let add = Command::AddMoney { amount: Money::from_cents(5000), reason: Some("troco".into()) };
        execute(&service, add).await.unwrap();
        let take = Command::TakeMoney { amount: Money::from_cents(1200), reason: None };
        let (output, _) = execute(&service, take).await.unwrap();

        assert_eq!(output["payload"]["totalIncome"], 50.0);
        assert_eq!(output["payload"]["totalOutcome"], 12.0);
    }

    #[tokio::test]
    async fn test_bad_sale_json_is_rejected() {
        let service = service().await;
        execute(&service, Command::Open { amount: Money::from_cents(100) }).await.unwrap();

        let err = execute(&service, Command::Sale { json: "{not json".into() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_out_of_range_sale_is_rejected() {
        let service = service().await;
        execute(&service, Command::Open { amount: Money::from_cents(100) }).await.unwrap();

        let sale = r#"{"id":"s1","profit":1e17}"#.to_string();
        let err = execute(&service, Command::Sale { json: sale }).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let (output, _) = execute(&service, Command::Status).await.unwrap();
        assert_eq!(output["current"]["operations"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_close_without_session() {
        let service = service().await;
        let err = execute(&service, Command::Close).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NoOpenSession);
    }

    #[test]
    fn test_log_filter_is_honoured() {
        use tracing::Level;

        let subscriber = log_subscriber(EnvFilter::new(DEFAULT_FILTER));
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(target: "sqlx::query", Level::TRACE));
            assert!(!tracing::enabled!(target: "sqlx::query", Level::INFO));
            assert!(tracing::enabled!(target: "sqlx::query", Level::WARN));
            assert!(tracing::enabled!(target: "cashdesk_db::store", Level::DEBUG));
            assert!(!tracing::enabled!(target: "cashdesk_db::store", Level::TRACE));
        });

        let subscriber = log_subscriber(EnvFilter::new(VERBOSE_FILTER));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "hyper", Level::DEBUG));
            assert!(!tracing::enabled!(target: "sqlx::query", Level::DEBUG));
        });
    }
}
