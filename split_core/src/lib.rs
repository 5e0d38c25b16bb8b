//! # split_core - Shared Expense Engine
//!
//! `split_core` is the computational heart of Evenly. It divides amounts
//! between people, keeps the ledger of groups and expenses, and works out
//! who should pay whom. All inputs and outputs are JSON-serializable so the
//! CLI can emit them directly for scripts.
//!
//! ## Design Philosophy
//!
//! - **UI-agnostic**: the equal-split updater talks to fields through traits
//! - **JSON-First**: ledger types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Safe files**: atomic saves and advisory locks on the data file
//!
//! ## Quick Start
//!
//! ```rust
//! use split_core::equal_split::EqualSplitUpdater;
//! use split_core::ledger::{Ledger, NewExpense, Split};
//! use split_core::settlement::settle_up;
//!
//! // Live preview while typing an amount
//! let amount = String::from("100");
//! let mut shares = vec![String::new(); 4];
//! EqualSplitUpdater::attach(Some(&amount)).unwrap().on_amount_changed(&mut shares);
//! assert_eq!(shares[0], "25.00");
//!
//! // Record it and settle
//! let mut ledger = Ledger::new();
//! let g = ledger.create_group("Climbing", ["Ana", "Ben", "Cy", "Dee"]).unwrap();
//! ledger.add_expense(g, NewExpense::new("Gym day passes", 100.0, "Ana", Split::Equal)).unwrap();
//! assert_eq!(settle_up(&ledger, g).unwrap().settlements.len(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`equal_split`] - Equal-split updater binding an amount field to share fields
//! - [`money`] - Monetary amount newtype
//! - [`ledger`] - Groups, expenses, and their validation rules
//! - [`settlement`] - Balances and debt simplification
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`config`] - Layered settings (defaults, config file, environment)
//! - [`errors`] - Structured error types

pub mod config;
pub mod equal_split;
pub mod errors;
pub mod file_io;
pub mod ledger;
pub mod money;
pub mod settlement;

// Re-export commonly used types at crate root for convenience
pub use config::Settings;
pub use equal_split::{EqualSplitUpdater, SplitOutcome};
pub use errors::{SplitError, SplitResult};
pub use file_io::{load_ledger, load_or_init, save_ledger, FileLock};
pub use ledger::{Expense, Group, Ledger, NewExpense, Split, SplitType};
pub use money::Money;
pub use settlement::{settle_up, SettleUp, Settlement};
