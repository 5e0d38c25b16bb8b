//! UI module for the Evenly GUI
//!
//! # Panel Structure
//! - `toolbar` - Ledger file operations (New, Open, Save As)
//! - `groups_panel` - Left sidebar: group list and the new-group form
//! - `group_panel` - Center: tabs for the selected group
//! - `status_bar` - Bottom status messages
//!
//! # Group Panel Children
//! - `expense_list` - Expenses, total spent, delete group
//! - `expense_form` - Add-expense form with live equal-split preview
//! - `settle_panel` - Balances and suggested payments

pub mod toolbar;
pub mod groups_panel;
pub mod group_panel;
pub mod status_bar;

pub mod expense_list;
pub mod expense_form;
pub mod settle_panel;
