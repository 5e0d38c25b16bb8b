//! End-to-end: form preview, recording expenses, persisting, settling up.

use std::collections::BTreeMap;

use split_core::equal_split::{parse_amount, EqualSplitUpdater, SplitOutcome};
use split_core::file_io::{load_ledger, load_or_init, save_ledger, FileLock};
use split_core::ledger::{parse_members, NewExpense, Split, SplitType};
use split_core::money::Money;
use split_core::settlement::settle_up;
use split_core::SplitError;

#[test]
fn weekend_trip_from_form_to_settlement() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    let _lock = FileLock::acquire(&path, "ana").unwrap();

    let mut ledger = load_or_init(&path).unwrap();
    let trip = ledger
        .create_group("Weekend trip", parse_members("Ana, Ben, Cy"))
        .unwrap();

    // The form previews shares as the amount is typed.
    let members = ledger.group(trip).unwrap().members.clone();
    let mut share_inputs = vec![String::new(); members.len()];
    let amount_input = String::from("120");
    let outcome = EqualSplitUpdater::attach(Some(&amount_input))
        .unwrap()
        .on_amount_changed(&mut share_inputs);
    assert_eq!(outcome, SplitOutcome::Updated { share: 40.0, count: 3 });
    assert_eq!(share_inputs, vec!["40.00"; 3]);

    ledger
        .add_expense(
            trip,
            NewExpense::new("Cabin", parse_amount(&amount_input), "Ana", Split::Equal),
        )
        .unwrap();

    // The user then edits the previewed shares into a custom split.
    share_inputs[0] = "10.00".to_string();
    share_inputs[1] = "20.00".to_string();
    share_inputs[2] = "0".to_string();
    let custom: BTreeMap<String, f64> = members
        .iter()
        .cloned()
        .zip(share_inputs.iter().map(|s| parse_amount(s)))
        .collect();
    ledger
        .add_expense(trip, NewExpense::new("Fuel", 30.0, "Cy", Split::Custom(custom)))
        .unwrap();

    save_ledger(&ledger, &path).unwrap();
    let reloaded = load_ledger(&path).unwrap();

    let expenses = reloaded.group_expenses(trip).unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].split_type, SplitType::Custom);
    assert_eq!(reloaded.group_total(trip).unwrap(), Money::new(150.0));

    // Ana: +120 -40 -10 = 70; Ben: -40 -20 = -60; Cy: +30 -40 = -10
    let summary = settle_up(&reloaded, trip).unwrap();
    let balances: Vec<f64> = summary.balances.iter().map(|b| b.balance.value()).collect();
    assert_eq!(balances, vec![70.0, -60.0, -10.0]);
    assert_eq!(summary.settlements.len(), 2);
    assert_eq!(summary.settlements[0].from, "Ben");
    assert_eq!(summary.settlements[0].amount, Money::new(60.0));
    assert_eq!(summary.settlements[1].from, "Cy");
    assert_eq!(summary.settlements[1].amount, Money::new(10.0));
}

#[test]
fn deleting_a_group_survives_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");

    let mut ledger = load_or_init(&path).unwrap();
    let keep = ledger.create_group("Flat", ["Ana", "Ben"]).unwrap();
    let party = ledger.create_group("Party", ["Cy", "Dee"]).unwrap();
    ledger.add_expense(party, NewExpense::new("Cake", 20.0, "Cy", Split::Equal)).unwrap();
    ledger.delete_group(party).unwrap();
    save_ledger(&ledger, &path).unwrap();

    let reloaded = load_ledger(&path).unwrap();
    assert!(reloaded.group(keep).is_ok());
    assert_eq!(reloaded.group(party).unwrap_err(), SplitError::group_not_found(party));
    assert!(reloaded.expenses.is_empty());
    assert_eq!(reloaded.next_group_id, 3);
}

#[test]
fn legacy_data_file_without_metadata_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(
        &path,
        r#"{
  "groups": {
    "1": {
      "id": 1,
      "name": "Flat",
      "members": ["Ana", "Ben"],
      "created_at": "2024-05-01T10:00:00Z",
      "expenses": [1]
    }
  },
  "expenses": {
    "1": {
      "id": 1,
      "description": "Internet",
      "amount": 50.0,
      "paid_by": "Ben",
      "group_id": 1,
      "split_type": "equal",
      "date": "2024-05-02T09:30:00Z",
      "shares": {"Ana": 25.0, "Ben": 25.0}
    }
  },
  "next_group_id": 2,
  "next_expense_id": 2
}"#,
    )
    .unwrap();

    let ledger = load_ledger(&path).unwrap();
    assert_eq!(ledger.expense(1).unwrap().date_display(), "2024-05-02 09:30");

    let summary = settle_up(&ledger, 1).unwrap();
    assert_eq!(summary.settlements[0].from, "Ana");
    assert_eq!(summary.settlements[0].to, "Ben");
    assert_eq!(summary.settlements[0].amount, Money::new(25.0));
}
