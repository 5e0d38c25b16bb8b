//! Expense list tab: every expense of the group, newest first.

use iced::widget::{button, column, container, row, text, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use split_core::ledger::{Expense, Group, SplitType};

use crate::{App, Message};

pub fn view_expense_list<'a>(app: &'a App, group: &'a Group) -> Element<'a, Message> {
    let symbol = app.settings.currency_symbol.as_str();
    let expenses = app.ledger.group_expenses(group.id).unwrap_or_default();
    let total = app.ledger.group_total(group.id).unwrap_or_default();

    let mut list: Column<'_, Message> = column![].spacing(4);
    if expenses.is_empty() {
        list = list.push(
            text("No expenses yet. Use 'Add Expense' to record one.")
                .size(11)
                .color([0.5, 0.5, 0.5]),
        );
    }
    for expense in expenses {
        list = list.push(view_expense_row(expense, symbol));
    }

    let delete = button(text("Delete Group").size(11))
        .padding(Padding::from([4, 8]))
        .style(button::danger);
    let delete = if app.is_read_only() {
        delete
    } else {
        delete.on_press(Message::DeleteGroup)
    };

    column![
        row![
            text(format!("Total spent: {}", total.format_with(symbol))).size(13),
            Space::new().width(Length::Fill),
            delete,
        ]
        .align_y(Alignment::Center),
        list,
    ]
    .spacing(10)
    .into()
}

fn view_expense_row<'a>(expense: &'a Expense, symbol: &str) -> Element<'a, Message> {
    let split_note = match expense.split_type {
        SplitType::Equal => String::new(),
        SplitType::Custom => {
            let parts: Vec<String> = expense
                .shares
                .iter()
                .map(|(member, share)| format!("{} {}", member, share.format_with(symbol)))
                .collect();
            format!(" ({})", parts.join(", "))
        }
    };

    container(
        row![
            column![
                text(&expense.description).size(12),
                text(format!(
                    "Paid by {} on {} - {}{}",
                    expense.paid_by,
                    expense.date_display(),
                    expense.split_type.display_name(),
                    split_note
                ))
                .size(9)
                .color([0.5, 0.5, 0.5]),
            ]
            .spacing(2),
            Space::new().width(Length::Fill),
            text(expense.amount.format_with(symbol)).size(12),
        ]
        .align_y(Alignment::Center),
    )
    .padding(Padding::from([6, 8]))
    .width(Length::Fill)
    .style(container::bordered_box)
    .into()
}
