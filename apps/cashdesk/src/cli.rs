//! # Command-Line Interface
//!
//! ```text
//! cashdesk open 100            # open a session with 100.00 in the drawer
//! cashdesk sale '{"id":"s1","profit":25.5,"total":80}'
//! cashdesk edit-sale '{"id":"s1","profit":30}'
//! cashdesk add-money 50 "change fund"
//! cashdesk take-money 20
//! cashdesk close
//! cashdesk status | list
//! ```

use cashdesk_core::{Money, MoneyInput};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cashdesk")]
#[command(about = "Cashier sessions for a point-of-sale counter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a new cashier session
    Open {
        /// Cash in the drawer, in major units (e.g. 100 or 99.90)
        #[arg(value_parser = parse_money)]
        amount: Money,
    },

    /// Close the current session
    Close,

    /// Print the current and past sessions
    List,

    /// Print the current session
    Status,

    /// Record a sale in the current session
    Sale {
        /// Sale record as JSON
        json: String,
    },

    /// Apply an edited sale to the session that owns it
    EditSale {
        /// Sale record as JSON
        json: String,
    },

    /// Put money into the drawer
    AddMoney {
        #[arg(value_parser = parse_money)]
        amount: Money,

        /// Why the money was added
        reason: Option<String>,
    },

    /// Take money out of the drawer
    TakeMoney {
        #[arg(value_parser = parse_money)]
        amount: Money,

        /// Why the money was taken
        reason: Option<String>,
    },

    /// Overwrite a stored session with the given JSON
    Edit {
        /// Session as JSON (operations may be a JSON string)
        json: String,
    },
}

fn parse_money(raw: &str) -> Result<Money, String> {
    MoneyInput::Text(raw.replace(',', ".")).to_money("amount").map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        let cli = Cli::try_parse_from(["cashdesk", "open", "100"]).unwrap();
        assert!(matches!(cli.command, Command::Open { amount } if amount.cents() == 10000));
    }

    #[test]
    fn test_parse_decimal_comma() {
        let cli = Cli::try_parse_from(["cashdesk", "add-money", "12,5", "troco"]).unwrap();
        match cli.command {
            Command::AddMoney { amount, reason } => {
                assert_eq!(amount.cents(), 1250);
                assert_eq!(reason.as_deref(), Some("troco"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["cashdesk", "close", "--user", "bob", "-v"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("bob"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Close));
    }

    #[test]
    fn test_rejects_bad_amount() {
        assert!(Cli::try_parse_from(["cashdesk", "open", "lots"]).is_err());
    }
}
