//! # Evenly CLI Application
//!
//! Terminal front end for the shared-expense ledger. Every subcommand maps
//! to one ledger operation; `--json` switches output to serde JSON for
//! scripts.

mod cli;

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use split_core::config::Settings;
use split_core::equal_split::{EqualSplitUpdater, SplitOutcome};
use split_core::file_io::{load_or_init, save_ledger, FileLock};
use split_core::ledger::{parse_members, Group, Ledger, LedgerStats, NewExpense, Split};
use split_core::money::Money;
use split_core::settlement::settle_up;

use crate::cli::{AddExpenseArgs, Cli, Command};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Output context shared by all commands
struct Ctx {
    settings: Settings,
    json: bool,
}

impl Ctx {
    fn money(&self, amount: Money) -> String {
        amount.format_with(&self.settings.currency_symbol)
    }

    fn load(&self) -> Result<Ledger> {
        let path = &self.settings.data_file;
        load_or_init(path).with_context(|| format!("loading {}", path.display()))
    }

    /// Lock the data file, apply `edit`, and save.
    fn edit<T>(&self, edit: impl FnOnce(&mut Ledger) -> split_core::SplitResult<T>) -> Result<T> {
        let path = &self.settings.data_file;
        let _lock = FileLock::acquire(path, self.settings.user_id.clone())?;
        let mut ledger = self.load()?;
        let value = edit(&mut ledger)?;
        save_ledger(&ledger, path).with_context(|| format!("saving {}", path.display()))?;
        Ok(value)
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    }
    .with_overrides(cli.data.clone(), cli.user.clone());
    debug!(data_file = %settings.data_file.display(), user = %settings.user_id, "settings resolved");

    let ctx = Ctx {
        settings,
        json: cli.json,
    };

    match cli.command {
        Command::Groups => list_groups(&ctx),
        Command::CreateGroup { name, members } => create_group(&ctx, &name, &members),
        Command::Show { group } => show_group(&ctx, group),
        Command::AddExpense(args) => add_expense(&ctx, args),
        Command::Settle { group } => settle(&ctx, group),
        Command::DeleteGroup { group } => delete_group(&ctx, group),
        Command::Clear { yes } => clear(&ctx, yes),
        Command::Preview { amount, shares, group } => preview(&ctx, &amount, shares, group),
    }
}

#[derive(Serialize)]
struct GroupsView<'a> {
    stats: LedgerStats,
    groups: Vec<&'a Group>,
}

fn list_groups(ctx: &Ctx) -> Result<()> {
    let ledger = ctx.load()?;
    let view = GroupsView {
        stats: ledger.stats(),
        groups: ledger.groups_newest_first(),
    };
    if ctx.json {
        return ctx.emit(&view);
    }

    println!(
        "{} groups, {} expenses, {} spent",
        view.stats.total_groups,
        view.stats.total_expenses,
        ctx.money(view.stats.total_spent)
    );
    if view.groups.is_empty() {
        println!("No groups yet. Create one with `evenly create-group`.");
        return Ok(());
    }
    println!();
    for group in &view.groups {
        println!(
            "  #{:<4} {:<24} {} members, {} expenses",
            group.id,
            group.name,
            group.members.len(),
            group.expenses.len()
        );
    }
    Ok(())
}

fn create_group(ctx: &Ctx, name: &str, members: &str) -> Result<()> {
    let members = parse_members(members);
    let (id, group) = ctx.edit(|ledger| {
        let id = ledger.create_group(name, &members)?;
        Ok((id, ledger.group(id)?.clone()))
    })?;

    if ctx.json {
        return ctx.emit(&group);
    }
    println!("Group \"{}\" created (#{}).", group.name, id);
    Ok(())
}

fn show_group(ctx: &Ctx, group_id: u64) -> Result<()> {
    let ledger = ctx.load()?;
    let group = ledger.group(group_id)?;
    let expenses = ledger.group_expenses(group_id)?;
    let total: Money = expenses.iter().map(|e| e.amount).sum();

    if ctx.json {
        #[derive(Serialize)]
        struct GroupView<'a> {
            group: &'a Group,
            expenses: &'a [&'a split_core::Expense],
            total_spent: Money,
        }
        return ctx.emit(&GroupView {
            group,
            expenses: &expenses,
            total_spent: total,
        });
    }

    println!("{} (#{})", group.name, group.id);
    println!("Members: {}", group.members.join(", "));
    println!("Total spent: {}", ctx.money(total));
    println!();
    if expenses.is_empty() {
        println!("No expenses yet.");
    }
    for expense in &expenses {
        println!(
            "  {}  {:<24} {:>10}  paid by {} ({})",
            expense.date_display(),
            expense.description,
            ctx.money(expense.amount),
            expense.paid_by,
            expense.split_type
        );
    }
    Ok(())
}

fn add_expense(ctx: &Ctx, args: AddExpenseArgs) -> Result<()> {
    let split = if args.shares.is_empty() {
        Split::Equal
    } else {
        let mut shares = BTreeMap::new();
        for (name, amount) in args.shares {
            if shares.insert(name.clone(), amount).is_some() {
                bail!("share for '{}' given more than once", name);
            }
        }
        Split::Custom(shares)
    };

    let new = NewExpense::new(args.description, args.amount, args.paid_by, split);
    let expense = ctx.edit(|ledger| {
        let id = ledger.add_expense(args.group, new)?;
        ledger
            .expense(id)
            .cloned()
            .ok_or_else(|| split_core::SplitError::Internal {
                message: format!("expense {} missing after insert", id),
            })
    })?;

    if ctx.json {
        return ctx.emit(&expense);
    }
    println!(
        "Added \"{}\" ({}) paid by {}.",
        expense.description,
        ctx.money(expense.amount),
        expense.paid_by
    );
    for (member, share) in &expense.shares {
        println!("  {:<16} {}", member, ctx.money(*share));
    }
    Ok(())
}

fn settle(ctx: &Ctx, group_id: u64) -> Result<()> {
    let ledger = ctx.load()?;
    let group = ledger.group(group_id)?;
    let summary = settle_up(&ledger, group_id)?;

    if ctx.json {
        return ctx.emit(&summary);
    }

    println!("Settle up: {} ({} expenses)", group.name, summary.total_expenses);
    println!();
    println!("Balances:");
    for entry in &summary.balances {
        let note = if entry.balance.is_negligible() {
            "settled"
        } else if entry.balance.value() > 0.0 {
            "is owed"
        } else {
            "owes"
        };
        println!("  {:<16} {:>10}  {}", entry.member, ctx.money(entry.balance), note);
    }
    println!();
    if summary.settlements.is_empty() {
        println!("Everyone is settled up.");
    } else {
        println!("Payments:");
        for payment in &summary.settlements {
            println!("  {} pays {} {}", payment.from, payment.to, ctx.money(payment.amount));
        }
    }
    Ok(())
}

fn delete_group(ctx: &Ctx, group_id: u64) -> Result<()> {
    let group = ctx.edit(|ledger| ledger.delete_group(group_id))?;
    if ctx.json {
        return ctx.emit(&group);
    }
    println!("Group \"{}\" deleted.", group.name);
    Ok(())
}

fn clear(ctx: &Ctx, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to clear {} without --yes", ctx.settings.data_file.display());
    }
    ctx.edit(|ledger| {
        ledger.clear();
        Ok(())
    })?;
    if ctx.json {
        return ctx.emit(&serde_json::json!({ "cleared": true }));
    }
    println!("All data cleared!");
    Ok(())
}

#[derive(Serialize)]
struct PreviewView {
    amount: String,
    outcome: SplitOutcome,
    fields: Vec<String>,
}

fn preview(ctx: &Ctx, amount: &str, shares: Option<usize>, group: Option<u64>) -> Result<()> {
    let (labels, count): (Vec<String>, usize) = match (group, shares) {
        (Some(id), _) => {
            let ledger = ctx.load()?;
            let members = ledger.group(id)?.members.clone();
            let count = members.len();
            (members, count)
        }
        (None, Some(n)) => ((1..=n).map(|i| format!("share {}", i)).collect(), n),
        (None, None) => bail!("pass --shares or --group"),
    };

    let mut fields = vec![String::new(); count];
    let outcome = match EqualSplitUpdater::attach(Some(amount)) {
        Some(updater) => updater.on_amount_changed(&mut fields),
        None => SplitOutcome::NoShareFields,
    };

    if ctx.json {
        return ctx.emit(&PreviewView {
            amount: amount.to_string(),
            outcome,
            fields,
        });
    }

    match outcome {
        SplitOutcome::NoShareFields => println!("No share fields; nothing to update."),
        SplitOutcome::Updated { .. } => {
            for (label, value) in labels.iter().zip(&fields) {
                println!("  {:<16} {}", label, value);
            }
        }
    }
    Ok(())
}
