//! # Ledger Data Structures
//!
//! The `Ledger` is the root container for all groups and expenses. It
//! serializes to a human-readable JSON data file.
//!
//! ## Structure
//!
//! ```text
//! Ledger
//! ├── meta: LedgerMetadata (schema version, timestamps)
//! ├── groups: BTreeMap<u64, Group> (name, members, expense ids)
//! ├── expenses: BTreeMap<u64, Expense> (amount, payer, per-member shares)
//! ├── next_group_id
//! └── next_expense_id
//! ```
//!
//! Ids are sequential and never reused, so `/group/3` always means the same
//! group for the lifetime of a data file.
//!
//! ## Example
//!
//! ```rust
//! use split_core::ledger::{Ledger, NewExpense, Split};
//!
//! let mut ledger = Ledger::new();
//! let trip = ledger.create_group("Ski trip", ["Ana", "Ben", "Cy"]).unwrap();
//!
//! let expense = ledger
//!     .add_expense(trip, NewExpense::new("Cabin", 300.0, "Ana", Split::Equal))
//!     .unwrap();
//!
//! assert_eq!(ledger.expense(expense).unwrap().shares["Ben"].value(), 100.0);
//! ```

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::equal_split::equal_share;
use crate::errors::{SplitError, SplitResult};
use crate::money::{Money, CENT_EPSILON};

/// Current schema version for ledger data files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Minimum number of members a group needs.
pub const MIN_GROUP_MEMBERS: usize = 2;

/// Root ledger container.
///
/// Every collection defaults when absent, so partially written or older
/// data files still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub meta: LedgerMetadata,

    #[serde(default)]
    pub groups: BTreeMap<u64, Group>,

    #[serde(default)]
    pub expenses: BTreeMap<u64, Expense>,

    #[serde(default = "first_id")]
    pub next_group_id: u64,

    #[serde(default = "first_id")]
    pub next_expense_id: u64,
}

fn first_id() -> u64 {
    1
}

/// Ledger metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// When the ledger was created
    pub created: DateTime<Utc>,

    /// When the ledger was last modified
    pub modified: DateTime<Utc>,
}

impl Default for LedgerMetadata {
    fn default() -> Self {
        let now = Utc::now();
        LedgerMetadata {
            version: SCHEMA_VERSION.to_string(),
            created: now,
            modified: now,
        }
    }
}

/// A named set of people sharing expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    /// Member names in the order they were entered
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Ids of expenses recorded against this group, oldest first
    #[serde(default)]
    pub expenses: Vec<u64>,
}

impl Group {
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// How an expense is divided between the group's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Custom,
}

impl SplitType {
    pub const ALL: [SplitType; 2] = [SplitType::Equal, SplitType::Custom];

    pub fn display_name(&self) -> &'static str {
        match self {
            SplitType::Equal => "Split equally",
            SplitType::Custom => "Custom amounts",
        }
    }
}

impl std::fmt::Display for SplitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One recorded payment and who owes what for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: u64,
    pub description: String,
    pub amount: Money,
    pub paid_by: String,
    pub group_id: u64,
    pub split_type: SplitType,
    pub date: DateTime<Utc>,
    /// Amount each member owes for this expense
    #[serde(default)]
    pub shares: BTreeMap<String, Money>,
}

impl Expense {
    /// Date formatted for listings (`2025-03-14 18:30`).
    pub fn date_display(&self) -> String {
        self.date.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// How to divide a new expense.
#[derive(Debug, Clone, PartialEq)]
pub enum Split {
    /// Everyone owes `amount / members`, rounded to cents.
    Equal,
    /// Explicit per-member amounts; members not listed owe nothing.
    Custom(BTreeMap<String, f64>),
}

impl Split {
    pub fn split_type(&self) -> SplitType {
        match self {
            Split::Equal => SplitType::Equal,
            Split::Custom(_) => SplitType::Custom,
        }
    }
}

/// Input for [`Ledger::add_expense`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub split: Split,
}

impl NewExpense {
    pub fn new(description: impl Into<String>, amount: f64, paid_by: impl Into<String>, split: Split) -> Self {
        NewExpense {
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            split,
        }
    }
}

/// Summary figures for the ledger's home view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_groups: usize,
    pub total_expenses: usize,
    pub total_spent: Money,
}

impl Ledger {
    /// Create a new, empty ledger.
    pub fn new() -> Self {
        Ledger {
            meta: LedgerMetadata::default(),
            groups: BTreeMap::new(),
            expenses: BTreeMap::new(),
            next_group_id: 1,
            next_expense_id: 1,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Create a group and return its id.
    ///
    /// Names are trimmed and blank member names dropped. The group needs a
    /// non-empty name and at least two distinct members.
    pub fn create_group<I, S>(&mut self, name: &str, members: I) -> SplitResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(SplitError::invalid_input("group_name", "", "Please enter a group name"));
        }

        let members: Vec<String> = members
            .into_iter()
            .map(|m| m.as_ref().trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        if members.len() < MIN_GROUP_MEMBERS {
            return Err(SplitError::invalid_input(
                "members",
                members.join(", "),
                format!("Please add at least {} members", MIN_GROUP_MEMBERS),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = members.iter().find(|m| !seen.insert(m.as_str())) {
            return Err(SplitError::invalid_input("members", dup.clone(), "Member names must be unique"));
        }

        let id = self.next_group_id;
        self.next_group_id += 1;

        info!(group_id = id, name, members = members.len(), "group created");
        self.groups.insert(
            id,
            Group {
                id,
                name: name.to_string(),
                members,
                created_at: Utc::now(),
                expenses: Vec::new(),
            },
        );
        self.touch();
        Ok(id)
    }

    /// Get a group by id.
    pub fn group(&self, id: u64) -> SplitResult<&Group> {
        self.groups.get(&id).ok_or_else(|| SplitError::group_not_found(id))
    }

    /// Get an expense by id.
    pub fn expense(&self, id: u64) -> Option<&Expense> {
        self.expenses.get(&id)
    }

    /// All groups, most recently created first.
    pub fn groups_newest_first(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        groups
    }

    /// Counts and total spend across the whole ledger.
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            total_groups: self.groups.len(),
            total_expenses: self.expenses.len(),
            total_spent: self.expenses.values().map(|e| e.amount).sum(),
        }
    }

    /// Expenses recorded for a group, most recent first.
    pub fn group_expenses(&self, group_id: u64) -> SplitResult<Vec<&Expense>> {
        self.group(group_id)?;
        let mut expenses: Vec<&Expense> = self
            .expenses
            .values()
            .filter(|e| e.group_id == group_id)
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(expenses)
    }

    /// Total amount spent by a group.
    pub fn group_total(&self, group_id: u64) -> SplitResult<Money> {
        Ok(self.group_expenses(group_id)?.iter().map(|e| e.amount).sum())
    }

    /// Record an expense against a group and return its id.
    ///
    /// # Errors
    ///
    /// * `GroupNotFound` - no such group
    /// * `InvalidInput` - blank description, non-positive amount, bad share
    /// * `MemberNotFound` - payer or custom-share name outside the group
    /// * `ShareMismatch` - custom shares differ from the amount by more than a cent
    pub fn add_expense(&mut self, group_id: u64, new: NewExpense) -> SplitResult<u64> {
        let group = self.group(group_id)?;

        let description = new.description.trim();
        if description.is_empty() {
            return Err(SplitError::invalid_input("description", "", "Please enter a description"));
        }

        if !new.amount.is_finite() {
            return Err(SplitError::invalid_input(
                "amount",
                new.amount.to_string(),
                "Please enter a valid amount",
            ));
        }
        if new.amount <= 0.0 {
            return Err(SplitError::invalid_input(
                "amount",
                new.amount.to_string(),
                "Amount must be greater than 0",
            ));
        }

        if !group.has_member(&new.paid_by) {
            return Err(SplitError::member_not_found(group_id, new.paid_by.clone()));
        }

        let shares = compute_shares(group, new.amount, &new.split)?;

        let id = self.next_expense_id;
        self.next_expense_id += 1;

        let expense = Expense {
            id,
            description: description.to_string(),
            amount: Money::new(new.amount),
            paid_by: new.paid_by,
            group_id,
            split_type: new.split.split_type(),
            date: Utc::now(),
            shares,
        };

        info!(
            expense_id = id,
            group_id,
            amount = new.amount,
            split = ?expense.split_type,
            "expense added"
        );
        self.expenses.insert(id, expense);
        if let Some(group) = self.groups.get_mut(&group_id) {
            group.expenses.push(id);
        }
        self.touch();
        Ok(id)
    }

    /// Remove a group together with all of its expenses.
    ///
    /// Returns the removed group.
    pub fn delete_group(&mut self, group_id: u64) -> SplitResult<Group> {
        let group = self
            .groups
            .remove(&group_id)
            .ok_or_else(|| SplitError::group_not_found(group_id))?;

        let before = self.expenses.len();
        self.expenses.retain(|_, e| e.group_id != group_id);

        info!(
            group_id,
            name = %group.name,
            expenses_removed = before - self.expenses.len(),
            "group deleted"
        );
        self.touch();
        Ok(group)
    }

    /// Drop every group and expense and restart ids at 1.
    pub fn clear(&mut self) {
        info!(
            groups = self.groups.len(),
            expenses = self.expenses.len(),
            "ledger cleared"
        );
        self.groups.clear();
        self.expenses.clear();
        self.next_group_id = 1;
        self.next_expense_id = 1;
        self.touch();
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new()
    }
}

/// Split a comma-separated list of member names.
///
/// ```rust
/// use split_core::ledger::parse_members;
///
/// assert_eq!(parse_members(" Ana, Ben ,, Cy"), vec!["Ana", "Ben", "Cy"]);
/// ```
pub fn parse_members(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

fn compute_shares(group: &Group, amount: f64, split: &Split) -> SplitResult<BTreeMap<String, Money>> {
    match split {
        Split::Equal => {
            let share = equal_share(amount, group.members.len())
                .map(|s| Money::new(s).round_cents())
                .ok_or_else(|| SplitError::invalid_input("members", "", "Group has no members"))?;
            Ok(group.members.iter().map(|m| (m.clone(), share)).collect())
        }
        Split::Custom(requested) => {
            if let Some(stranger) = requested.keys().find(|name| !group.has_member(name)) {
                return Err(SplitError::member_not_found(group.id, stranger.clone()));
            }

            let mut shares = BTreeMap::new();
            for member in &group.members {
                let share = requested.get(member).copied().unwrap_or(0.0);
                if !share.is_finite() || share < 0.0 {
                    return Err(SplitError::invalid_input(
                        format!("share_{}", member),
                        share.to_string(),
                        "Shares must be zero or more",
                    ));
                }
                shares.insert(member.clone(), Money::new(share));
            }

            let total: Money = shares.values().sum();
            if (total.value() - amount).abs() > CENT_EPSILON {
                return Err(SplitError::ShareMismatch {
                    shares_total: total.value(),
                    amount,
                });
            }
            Ok(shares)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_trip() -> (Ledger, u64) {
        let mut ledger = Ledger::new();
        let id = ledger.create_group("Trip", ["Ana", "Ben", "Cy"]).unwrap();
        (ledger, id)
    }

    fn custom(pairs: &[(&str, f64)]) -> Split {
        Split::Custom(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn test_create_group_trims_and_assigns_ids() {
        let mut ledger = Ledger::new();
        let first = ledger.create_group("  Flat 4B ", [" Ana", "Ben ", "  "]).unwrap();
        let second = ledger.create_group("Trip", ["Cy", "Dee"]).unwrap();

        assert_eq!((first, second), (1, 2));
        let group = ledger.group(first).unwrap();
        assert_eq!(group.name, "Flat 4B");
        assert_eq!(group.members, vec!["Ana", "Ben"]);
        assert_eq!(ledger.next_group_id, 3);
    }

    #[test]
    fn test_create_group_validation() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.create_group("   ", ["Ana", "Ben"]),
            Err(SplitError::InvalidInput { field, .. }) if field == "group_name"
        ));
        assert!(matches!(
            ledger.create_group("Solo", ["Ana", " "]),
            Err(SplitError::InvalidInput { field, .. }) if field == "members"
        ));
        assert!(matches!(
            ledger.create_group("Twins", ["Ana", "Ana"]),
            Err(SplitError::InvalidInput { reason, .. }) if reason.contains("unique")
        ));
        // Failed attempts do not burn ids.
        assert_eq!(ledger.next_group_id, 1);
    }

    #[test]
    fn test_equal_split_rounds_each_share() {
        let (mut ledger, trip) = ledger_with_trip();
        let id = ledger
            .add_expense(trip, NewExpense::new("Dinner", 100.0, "Ana", Split::Equal))
            .unwrap();

        let expense = ledger.expense(id).unwrap();
        assert_eq!(expense.split_type, SplitType::Equal);
        assert_eq!(expense.shares.len(), 3);
        assert!(expense.shares.values().all(|s| *s == Money::new(33.33)));
        assert_eq!(ledger.group(trip).unwrap().expenses, vec![id]);
    }

    #[test]
    fn test_equal_split_stores_what_the_form_shows() {
        let mut ledger = Ledger::new();
        let flat = ledger.create_group("Flat", ["Ana", "Ben", "Cy", "Dee"]).unwrap();

        let mut fields = vec![String::new(); 4];
        crate::equal_split::EqualSplitUpdater::attach(Some("4.50"))
            .unwrap()
            .on_amount_changed(&mut fields);

        let id = ledger
            .add_expense(flat, NewExpense::new("Coffee", 4.5, "Ana", Split::Equal))
            .unwrap();
        let stored = ledger.expense(id).unwrap().shares["Ben"];
        assert_eq!(stored, Money::new(1.12));
        assert_eq!(stored.to_string(), fields[0]);
    }

    #[test]
    fn test_custom_split_missing_member_owes_nothing() {
        let (mut ledger, trip) = ledger_with_trip();
        let id = ledger
            .add_expense(
                trip,
                NewExpense::new("Taxi", 30.0, "Ben", custom(&[("Ana", 10.0), ("Ben", 20.0)])),
            )
            .unwrap();

        let shares = &ledger.expense(id).unwrap().shares;
        assert_eq!(shares["Cy"], Money::ZERO);
        assert_eq!(shares["Ben"], Money::new(20.0));
    }

    #[test]
    fn test_custom_split_must_match_amount() {
        let (mut ledger, trip) = ledger_with_trip();
        let err = ledger
            .add_expense(trip, NewExpense::new("Taxi", 30.0, "Ben", custom(&[("Ana", 10.0)])))
            .unwrap_err();
        assert_eq!(
            err,
            SplitError::ShareMismatch {
                shares_total: 10.0,
                amount: 30.0
            }
        );

        // Within a cent is accepted.
        ledger
            .add_expense(
                trip,
                NewExpense::new("Pizza", 10.0, "Ana", custom(&[("Ana", 3.33), ("Ben", 3.33), ("Cy", 3.33)])),
            )
            .unwrap();
    }

    #[test]
    fn test_custom_split_rejects_strangers_and_negatives() {
        let (mut ledger, trip) = ledger_with_trip();
        assert!(matches!(
            ledger.add_expense(trip, NewExpense::new("X", 5.0, "Ana", custom(&[("Zed", 5.0)]))),
            Err(SplitError::MemberNotFound { .. })
        ));
        assert!(matches!(
            ledger.add_expense(trip, NewExpense::new("X", 5.0, "Ana", custom(&[("Ana", 10.0), ("Ben", -5.0)]))),
            Err(SplitError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_add_expense_validation() {
        let (mut ledger, trip) = ledger_with_trip();
        let cases = [
            NewExpense::new("  ", 10.0, "Ana", Split::Equal),
            NewExpense::new("Bread", 0.0, "Ana", Split::Equal),
            NewExpense::new("Bread", -4.0, "Ana", Split::Equal),
            NewExpense::new("Bread", f64::NAN, "Ana", Split::Equal),
        ];
        for case in cases {
            assert!(matches!(
                ledger.add_expense(trip, case),
                Err(SplitError::InvalidInput { .. })
            ));
        }

        assert!(matches!(
            ledger.add_expense(trip, NewExpense::new("Bread", 4.0, "Zed", Split::Equal)),
            Err(SplitError::MemberNotFound { .. })
        ));
        assert!(matches!(
            ledger.add_expense(99, NewExpense::new("Bread", 4.0, "Ana", Split::Equal)),
            Err(SplitError::GroupNotFound { group_id: 99 })
        ));
        assert!(ledger.expenses.is_empty());
        assert_eq!(ledger.next_expense_id, 1);
    }

    #[test]
    fn test_stats_and_group_total() {
        let (mut ledger, trip) = ledger_with_trip();
        let other = ledger.create_group("Flat", ["Dee", "Eve"]).unwrap();
        ledger.add_expense(trip, NewExpense::new("A", 12.0, "Ana", Split::Equal)).unwrap();
        ledger.add_expense(trip, NewExpense::new("B", 8.5, "Cy", Split::Equal)).unwrap();
        ledger.add_expense(other, NewExpense::new("C", 40.0, "Eve", Split::Equal)).unwrap();

        let stats = ledger.stats();
        assert_eq!(stats.total_groups, 2);
        assert_eq!(stats.total_expenses, 3);
        assert_eq!(stats.total_spent, Money::new(60.5));
        assert_eq!(ledger.group_total(trip).unwrap(), Money::new(20.5));
        assert_eq!(ledger.group_expenses(other).unwrap().len(), 1);
    }

    #[test]
    fn test_listings_are_newest_first() {
        let (mut ledger, trip) = ledger_with_trip();
        let newer = ledger.create_group("Later", ["X", "Y"]).unwrap();
        let groups: Vec<u64> = ledger.groups_newest_first().iter().map(|g| g.id).collect();
        assert_eq!(groups, vec![newer, trip]);

        let a = ledger.add_expense(trip, NewExpense::new("A", 1.0, "Ana", Split::Equal)).unwrap();
        let b = ledger.add_expense(trip, NewExpense::new("B", 1.0, "Ana", Split::Equal)).unwrap();
        let ids: Vec<u64> = ledger.group_expenses(trip).unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_delete_group_removes_its_expenses() {
        let (mut ledger, trip) = ledger_with_trip();
        let other = ledger.create_group("Flat", ["Dee", "Eve"]).unwrap();
        ledger.add_expense(trip, NewExpense::new("A", 9.0, "Ana", Split::Equal)).unwrap();
        let kept = ledger.add_expense(other, NewExpense::new("B", 4.0, "Dee", Split::Equal)).unwrap();

        let removed = ledger.delete_group(trip).unwrap();
        assert_eq!(removed.name, "Trip");
        assert!(ledger.group(trip).is_err());
        assert_eq!(ledger.expenses.keys().copied().collect::<Vec<_>>(), vec![kept]);
        assert!(matches!(ledger.delete_group(trip), Err(SplitError::GroupNotFound { .. })));
    }

    #[test]
    fn test_clear_resets_ids() {
        let (mut ledger, trip) = ledger_with_trip();
        ledger.add_expense(trip, NewExpense::new("A", 9.0, "Ana", Split::Equal)).unwrap();
        ledger.clear();

        assert!(ledger.groups.is_empty() && ledger.expenses.is_empty());
        assert_eq!(ledger.create_group("Again", ["A", "B"]).unwrap(), 1);
    }

    #[test]
    fn test_loads_file_with_missing_keys() {
        let ledger: Ledger = serde_json::from_str(r#"{"groups": {}}"#).unwrap();
        assert_eq!(ledger.next_group_id, 1);
        assert_eq!(ledger.next_expense_id, 1);
        assert_eq!(ledger.meta.version, SCHEMA_VERSION);
        assert!(ledger.expenses.is_empty());
    }

    #[test]
    fn test_serialization_uses_string_keys_and_lowercase_split() {
        let (mut ledger, trip) = ledger_with_trip();
        ledger.add_expense(trip, NewExpense::new("A", 9.0, "Ana", Split::Equal)).unwrap();
        let json = serde_json::to_string_pretty(&ledger).unwrap();

        assert!(json.contains("\"1\": {"));
        assert!(json.contains("\"split_type\": \"equal\""));

        let roundtrip: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.expenses, ledger.expenses);
        assert_eq!(roundtrip.groups, ledger.groups);
    }
}
