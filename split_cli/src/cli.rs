use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use split_core::config::{DATA_FILE_ENV, USER_ENV};

#[derive(Parser, Debug)]
#[command(name = "evenly", version, about = "Split shared expenses and settle up")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger data file. Defaults to the config file setting, then `data.json`.
    #[arg(long, global = true, value_name = "FILE", env = DATA_FILE_ENV)]
    pub data: Option<PathBuf>,

    /// Name recorded in the lock file while editing.
    #[arg(long, global = true, env = USER_ENV)]
    pub user: Option<String>,

    /// Read settings from this TOML file instead of the user config dir.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List groups with overall totals.
    Groups,

    /// Create a group.
    CreateGroup {
        /// Group name.
        #[arg(long)]
        name: String,

        /// Comma-separated member names, e.g. "Ana, Ben, Cy".
        #[arg(long)]
        members: String,
    },

    /// Show a group's members and expenses.
    Show {
        group: u64,
    },

    /// Record an expense.
    AddExpense(AddExpenseArgs),

    /// Show balances and the payments that settle them.
    Settle {
        group: u64,
    },

    /// Delete a group and all of its expenses.
    DeleteGroup {
        group: u64,
    },

    /// Remove every group and expense.
    Clear {
        /// Required; clearing cannot be undone.
        #[arg(long)]
        yes: bool,
    },

    /// Show what each share field would hold for an amount.
    Preview {
        /// Amount text exactly as typed; anything unparseable counts as 0.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// Number of share fields.
        #[arg(long)]
        shares: Option<usize>,

        /// Use the member count of this group instead of --shares.
        #[arg(long, conflicts_with = "shares")]
        group: Option<u64>,
    },
}

#[derive(Debug, Args)]
pub struct AddExpenseArgs {
    pub group: u64,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub amount: f64,

    /// Member who paid.
    #[arg(long)]
    pub paid_by: String,

    /// Custom share as NAME=AMOUNT; repeat per member. Omit for an equal split.
    #[arg(long = "share", value_name = "NAME=AMOUNT", value_parser = parse_share)]
    pub shares: Vec<(String, f64)>,
}

fn parse_share(raw: &str) -> Result<(String, f64), String> {
    let (name, amount) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing member name in '{}'", raw));
    }
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a valid amount", amount.trim()))?;
    Ok((name.to_string(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_share() {
        assert_eq!(parse_share("Ana=12.5"), Ok(("Ana".to_string(), 12.5)));
        assert_eq!(parse_share(" Mary Jo = 3 "), Ok(("Mary Jo".to_string(), 3.0)));
        assert!(parse_share("Ana").is_err());
        assert!(parse_share("=4").is_err());
        assert!(parse_share("Ana=lots").is_err());
    }

    #[test]
    fn test_add_expense_with_custom_shares() {
        let cli = Cli::try_parse_from([
            "evenly",
            "add-expense",
            "2",
            "--description",
            "Taxi",
            "--amount",
            "30",
            "--paid-by",
            "Ben",
            "--share",
            "Ana=10",
            "--share",
            "Ben=20",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::AddExpense(args) => {
                assert_eq!(args.group, 2);
                assert_eq!(args.shares.len(), 2);
                assert_eq!(args.shares[1], ("Ben".to_string(), 20.0));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_preview_accepts_any_amount_text() {
        let cli = Cli::try_parse_from(["evenly", "preview", "--amount", "abc", "--shares", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Preview { ref amount, shares: Some(3), group: None } if amount == "abc"
        ));
    }
}
