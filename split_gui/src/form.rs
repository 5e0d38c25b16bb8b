//! Form state for the GUI, kept free of widget code so it can be tested.
//!
//! The expense form is where the equal-split updater lives: every edit of
//! the amount input rewrites the per-member share inputs.

use std::collections::BTreeMap;

use split_core::equal_split::{parse_amount, EqualSplitUpdater, ShareField, SplitOutcome};
use split_core::ledger::{parse_members, Group, NewExpense, Split, SplitType};

/// One member's share input.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareInput {
    pub member: String,
    pub value: String,
}

impl ShareField for ShareInput {
    fn set_share_text(&mut self, text: String) {
        self.value = text;
    }
}

/// The "Add expense" form for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub paid_by: Option<String>,
    pub split_type: SplitType,
    pub shares: Vec<ShareInput>,
}

impl ExpenseForm {
    /// Empty form with one share input per member.
    pub fn for_group(group: &Group) -> Self {
        ExpenseForm {
            description: String::new(),
            amount: String::new(),
            paid_by: group.members.first().cloned(),
            split_type: SplitType::Equal,
            shares: group
                .members
                .iter()
                .map(|m| ShareInput {
                    member: m.clone(),
                    value: String::new(),
                })
                .collect(),
        }
    }

    /// Amount field changed: store the text and recompute every share.
    pub fn on_amount_changed(&mut self, text: String) -> SplitOutcome {
        self.amount = text;
        match EqualSplitUpdater::attach(Some(&self.amount)) {
            Some(updater) => updater.on_amount_changed(&mut self.shares),
            None => SplitOutcome::NoShareFields,
        }
    }

    pub fn on_share_changed(&mut self, index: usize, text: String) {
        if let Some(share) = self.shares.get_mut(index) {
            share.value = text;
        }
    }

    /// Sum of the share inputs as currently typed.
    pub fn shares_total(&self) -> f64 {
        self.shares.iter().map(|s| parse_amount(&s.value)).sum()
    }

    /// Validate the raw inputs and build the ledger request.
    ///
    /// Only checks what the ledger cannot: that the amount is a number and
    /// a payer was picked. Everything else is left to `Ledger::add_expense`.
    pub fn to_new_expense(&self) -> Result<NewExpense, String> {
        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| "Please enter a valid amount".to_string())?;
        let paid_by = self
            .paid_by
            .clone()
            .ok_or_else(|| "Please choose who paid".to_string())?;

        let split = match self.split_type {
            SplitType::Equal => Split::Equal,
            SplitType::Custom => Split::Custom(
                self.shares
                    .iter()
                    .map(|s| (s.member.clone(), parse_amount(&s.value)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        };

        Ok(NewExpense::new(self.description.clone(), amount, paid_by, split))
    }
}

/// The "New group" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupForm {
    pub name: String,
    pub members: String,
}

impl GroupForm {
    pub fn member_list(&self) -> Vec<String> {
        parse_members(&self.members)
    }
}
