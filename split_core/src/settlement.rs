//! # Settling Up
//!
//! Turns a group's expenses into net balances and a short list of payments
//! that clears them.
//!
//! A member's balance is what they paid minus what they owe: positive means
//! the group owes them, negative means they owe the group. Debts are then
//! simplified greedily: the largest creditor is paid by the largest debtor
//! until one side is exhausted, and so on.
//!
//! ## Example
//!
//! ```rust
//! use split_core::ledger::{Ledger, NewExpense, Split};
//! use split_core::settlement::settle_up;
//!
//! let mut ledger = Ledger::new();
//! let flat = ledger.create_group("Flat", ["Ana", "Ben"]).unwrap();
//! ledger.add_expense(flat, NewExpense::new("Rent", 1000.0, "Ana", Split::Equal)).unwrap();
//!
//! let summary = settle_up(&ledger, flat).unwrap();
//! assert_eq!(summary.settlements.len(), 1);
//! assert_eq!(summary.settlements[0].from, "Ben");
//! assert_eq!(summary.settlements[0].amount.value(), 500.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::SplitResult;
use crate::ledger::Ledger;
use crate::money::{Money, CENT_EPSILON};

/// Leftovers smaller than this after a payment are treated as settled.
const RESIDUE: f64 = 0.005;

/// A member's net position in a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: String,
    /// Positive: owed money. Negative: owes money.
    pub balance: Money,
}

/// One payment that moves money from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

/// Everything the settle-up view shows for a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleUp {
    pub group_id: u64,
    pub balances: Vec<MemberBalance>,
    pub settlements: Vec<Settlement>,
    pub total_expenses: usize,
}

/// Net balance of every member, in member order, rounded to cents.
///
/// Only expenses listed on the group (and still pointing back at it) count.
/// Shares held by names outside the member list are ignored.
pub fn member_balances(ledger: &Ledger, group_id: u64) -> SplitResult<Vec<MemberBalance>> {
    let (balances, _) = collect_balances(ledger, group_id)?;
    Ok(balances)
}

fn collect_balances(ledger: &Ledger, group_id: u64) -> SplitResult<(Vec<MemberBalance>, usize)> {
    let group = ledger.group(group_id)?;
    let mut balances: Vec<MemberBalance> = group
        .members
        .iter()
        .map(|m| MemberBalance {
            member: m.clone(),
            balance: Money::ZERO,
        })
        .collect();

    let expenses: Vec<_> = group
        .expenses
        .iter()
        .filter_map(|id| ledger.expense(*id))
        .filter(|e| e.group_id == group_id)
        .collect();

    for expense in &expenses {
        if let Some(payer) = balances.iter_mut().find(|b| b.member == expense.paid_by) {
            payer.balance += expense.amount;
        }
        for (member, share) in &expense.shares {
            if let Some(entry) = balances.iter_mut().find(|b| &b.member == member) {
                entry.balance -= *share;
            }
        }
    }

    for entry in &mut balances {
        entry.balance = entry.balance.round_cents();
    }

    Ok((balances, expenses.len()))
}

/// Reduce balances to a short list of payments.
///
/// Members within a cent of zero are left out. Creditors and debtors are
/// each ordered largest first; ties keep their input order.
pub fn simplify_debts(balances: &[MemberBalance]) -> Vec<Settlement> {
    let mut creditors: Vec<(&str, f64)> = Vec::new();
    let mut debtors: Vec<(&str, f64)> = Vec::new();

    for entry in balances {
        let amount = entry.balance.value();
        if amount > CENT_EPSILON {
            creditors.push((entry.member.as_str(), amount));
        } else if amount < -CENT_EPSILON {
            debtors.push((entry.member.as_str(), -amount));
        }
    }

    creditors.sort_by(|a, b| b.1.total_cmp(&a.1));
    debtors.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut settlements = Vec::new();
    let (mut ci, mut di) = (0, 0);

    while ci < creditors.len() && di < debtors.len() {
        let (creditor, credit) = creditors[ci];
        let (debtor, debt) = debtors[di];
        let paid = credit.min(debt);

        settlements.push(Settlement {
            from: debtor.to_string(),
            to: creditor.to_string(),
            amount: Money::new(paid).round_cents(),
        });

        let credit_left = credit - paid;
        let debt_left = debt - paid;
        creditors[ci].1 = credit_left;
        debtors[di].1 = debt_left;

        if credit_left < RESIDUE {
            ci += 1;
        }
        if debt_left < RESIDUE {
            di += 1;
        }
    }

    settlements
}

/// Balances, simplified payments and expense count for a group.
pub fn settle_up(ledger: &Ledger, group_id: u64) -> SplitResult<SettleUp> {
    let (balances, total_expenses) = collect_balances(ledger, group_id)?;
    let settlements = simplify_debts(&balances);

    debug!(
        group_id,
        total_expenses,
        payments = settlements.len(),
        "settle-up computed"
    );

    Ok(SettleUp {
        group_id,
        balances,
        settlements,
        total_expenses,
    })
}
