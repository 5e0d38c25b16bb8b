//! # Equal Split
//!
//! Keeps a set of share fields in sync with one amount field: whenever the
//! amount changes, every share field is overwritten with `amount / count`,
//! formatted to two decimal places.
//!
//! The updater never owns the fields. It is attached to a reference to the
//! amount field and is handed the share fields on every change event, so the
//! share count is always the one present at the moment of the event.
//!
//! ## Rules
//!
//! - Amount text that does not parse (or parses to NaN/infinity) counts as `0`.
//! - With no share fields the update is a no-op and reports
//!   [`SplitOutcome::NoShareFields`]; nothing is written.
//! - Re-running the update without changing the amount writes the same values.
//!
//! ## Example
//!
//! ```rust
//! use split_core::equal_split::{EqualSplitUpdater, SplitOutcome};
//!
//! let amount = String::from("10");
//! let mut shares = vec![String::new(); 3];
//!
//! let updater = EqualSplitUpdater::attach(Some(&amount)).unwrap();
//! let outcome = updater.on_amount_changed(&mut shares);
//!
//! assert_eq!(shares, vec!["3.33", "3.33", "3.33"]);
//! assert_eq!(outcome, SplitOutcome::Updated { share: 10.0 / 3.0, count: 3 });
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Source of the total amount to split.
pub trait AmountField {
    /// Current raw text of the field, exactly as the user typed it.
    fn amount_text(&self) -> &str;
}

/// One participant's share, written by the updater.
pub trait ShareField {
    /// Overwrite the displayed value of this field.
    fn set_share_text(&mut self, text: String);
}

impl AmountField for str {
    fn amount_text(&self) -> &str {
        self
    }
}

impl AmountField for String {
    fn amount_text(&self) -> &str {
        self.as_str()
    }
}

impl ShareField for String {
    fn set_share_text(&mut self, text: String) {
        *self = text;
    }
}

/// What a single update did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SplitOutcome {
    /// Every share field was overwritten with `share` (unrounded).
    Updated { share: f64, count: usize },
    /// There were no share fields, so nothing was written.
    NoShareFields,
}

/// Recomputes equal shares whenever its amount field changes.
#[derive(Debug)]
pub struct EqualSplitUpdater<'a, A: AmountField + ?Sized> {
    amount: &'a A,
}

impl<'a, A: AmountField + ?Sized> EqualSplitUpdater<'a, A> {
    /// Bind an updater to the host's amount field.
    ///
    /// Returns `None` when the host has no amount field; the updater simply
    /// does not activate in that case.
    pub fn attach(amount: Option<&'a A>) -> Option<Self> {
        amount.map(|amount| EqualSplitUpdater { amount })
    }

    /// The amount currently shown in the bound field, parsed.
    pub fn amount(&self) -> f64 {
        parse_amount(self.amount.amount_text())
    }

    /// Handle a "value changed" event on the amount field.
    ///
    /// `shares` is the collection present right now. Each field receives
    /// the equal share formatted to two decimals.
    pub fn on_amount_changed<S: ShareField>(&self, shares: &mut [S]) -> SplitOutcome {
        let amount = self.amount();
        let Some(share) = equal_share(amount, shares.len()) else {
            trace!(amount, "no share fields to update");
            return SplitOutcome::NoShareFields;
        };

        let text = format_share(share);
        for field in shares.iter_mut() {
            field.set_share_text(text.clone());
        }

        trace!(amount, count = shares.len(), share = %text, "share fields updated");
        SplitOutcome::Updated {
            share,
            count: shares.len(),
        }
    }
}

/// Parse amount text, treating anything unusable as zero.
///
/// Surrounding whitespace is ignored. NaN and infinities count as unusable.
///
/// ```rust
/// use split_core::equal_split::parse_amount;
///
/// assert_eq!(parse_amount(" 42.5 "), 42.5);
/// assert_eq!(parse_amount("abc"), 0.0);
/// assert_eq!(parse_amount(""), 0.0);
/// ```
pub fn parse_amount(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Divide `amount` evenly across `count` shares.
///
/// Returns `None` when `count` is zero.
pub fn equal_share(amount: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(amount / count as f64)
    }
}

/// Format a share for display with exactly two decimal places.
///
/// Values that round to zero never show a sign: `-0.001` is `"0.00"`.
pub fn format_share(share: f64) -> String {
    format!("{:.2}", round_to_cents(share))
}

/// Round a monetary value to whole cents.
///
/// Decimal rounding of the exact stored value, with exact half-cent ties
/// going to the even cent, so `4.50 / 4` is `1.12` both on screen and in
/// the ledger.
pub fn round_to_cents(value: f64) -> f64 {
    match format!("{:.2}", value).parse::<f64>() {
        // `+ 0.0` turns -0.0 into 0.0
        Ok(rounded) => rounded + 0.0,
        Err(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(amount: &str, count: usize) -> (Vec<String>, SplitOutcome) {
        let mut shares = vec![String::from("untouched"); count];
        let updater = EqualSplitUpdater::attach(Some(amount)).unwrap();
        let outcome = updater.on_amount_changed(&mut shares);
        (shares, outcome)
    }

    #[test]
    fn test_hundred_across_four() {
        let (shares, outcome) = run("100", 4);
        assert_eq!(shares, vec!["25.00"; 4]);
        assert_eq!(outcome, SplitOutcome::Updated { share: 25.0, count: 4 });
    }

    #[test]
    fn test_ten_across_three_rounds_to_cents() {
        let (shares, _) = run("10", 3);
        assert_eq!(shares, vec!["3.33"; 3]);
    }

    #[test]
    fn test_non_numeric_amount_becomes_zero() {
        let (shares, outcome) = run("abc", 5);
        assert_eq!(shares, vec!["0.00"; 5]);
        assert_eq!(outcome, SplitOutcome::Updated { share: 0.0, count: 5 });
    }

    #[test]
    fn test_non_finite_amount_becomes_zero() {
        assert_eq!(run("NaN", 2).0, vec!["0.00"; 2]);
        assert_eq!(run("inf", 2).0, vec!["0.00"; 2]);
        assert_eq!(run("1e400", 2).0, vec!["0.00"; 2]);
    }

    #[test]
    fn test_no_share_fields_is_a_no_op() {
        let (shares, outcome) = run("100", 0);
        assert!(shares.is_empty());
        assert_eq!(outcome, SplitOutcome::NoShareFields);
    }

    #[test]
    fn test_missing_amount_field_does_not_activate() {
        let updater = EqualSplitUpdater::<str>::attach(None);
        assert!(updater.is_none());
    }

    #[test]
    fn test_retrigger_is_idempotent() {
        let amount = String::from("77.77");
        let mut shares = vec![String::new(); 6];
        let updater = EqualSplitUpdater::attach(Some(&amount)).unwrap();

        updater.on_amount_changed(&mut shares);
        let first = shares.clone();
        updater.on_amount_changed(&mut shares);
        assert_eq!(shares, first);
    }

    #[test]
    fn test_share_count_is_read_per_event() {
        let amount = String::from("60");
        let updater = EqualSplitUpdater::attach(Some(&amount)).unwrap();

        let mut shares = vec![String::new(); 2];
        updater.on_amount_changed(&mut shares);
        assert_eq!(shares, vec!["30.00"; 2]);

        shares.push(String::new());
        updater.on_amount_changed(&mut shares);
        assert_eq!(shares, vec!["20.00"; 3]);
    }

    #[test]
    fn test_custom_share_field() {
        #[derive(Default)]
        struct Input {
            value: String,
            writes: usize,
        }

        impl ShareField for Input {
            fn set_share_text(&mut self, text: String) {
                self.value = text;
                self.writes += 1;
            }
        }

        let mut inputs = vec![Input::default(), Input::default()];
        let updater = EqualSplitUpdater::attach(Some("12.5")).unwrap();
        updater.on_amount_changed(&mut inputs);

        assert!(inputs.iter().all(|i| i.value == "6.25" && i.writes == 1));
    }

    #[test]
    fn test_parse_amount_edge_cases() {
        assert_eq!(parse_amount("  19.99\n"), 19.99);
        assert_eq!(parse_amount("-8"), -8.0);
        assert_eq!(parse_amount("1,000"), 0.0);
        assert_eq!(parse_amount("12abc"), 0.0);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(10.0 / 3.0), 3.33);
        assert_eq!(round_to_cents(20.0 / 3.0), 6.67);
        assert_eq!(round_to_cents(-3.333), -3.33);
        assert_eq!(round_to_cents(1.125), 1.12);
        assert_eq!(round_to_cents(1.375), 1.38);
        assert!(round_to_cents(-0.001).is_sign_positive());
    }

    #[test]
    fn test_half_cent_tie_matches_ledger_rounding() {
        let (shares, outcome) = run("4.50", 4);
        assert_eq!(shares, vec!["1.12"; 4]);
        match outcome {
            SplitOutcome::Updated { share, .. } => assert_eq!(format_share(round_to_cents(share)), shares[0]),
            other => panic!("expected an update, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_zero_amount_shows_unsigned_zero() {
        for amount in ["-0", "-0.0", "-0.001"] {
            let (shares, _) = run(amount, 3);
            assert_eq!(shares, vec!["0.00"; 3], "amount {:?}", amount);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_share_shows_the_rounded_quotient(
                cents in -10_000_000i64..10_000_000i64,
                count in 1usize..40,
            ) {
                let amount = cents as f64 / 100.0;
                let text = amount.to_string();
                let mut shares = vec![String::new(); count];
                EqualSplitUpdater::attach(Some(text.as_str()))
                    .unwrap()
                    .on_amount_changed(&mut shares);

                // Whole-cent quotient, rounded half up; exact ties are left
                // to the dedicated tie test
                let n = count as i64;
                let (q, r) = (cents.div_euclid(n), cents.rem_euclid(n));
                prop_assume!(2 * r != n);
                let rounded = if 2 * r > n { q + 1 } else { q };
                let sign = if rounded < 0 { "-" } else { "" };
                let expected = format!("{}{}.{:02}", sign, rounded.abs() / 100, rounded.abs() % 100);
                prop_assert!(shares.iter().all(|s| *s == expected), "{:?} != {}", shares, expected);
            }
        }
    }
}
