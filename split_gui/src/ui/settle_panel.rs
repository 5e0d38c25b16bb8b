//! Settle Up tab: per-member balances and the payments that clear them.

use iced::widget::{column, container, row, text, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use split_core::ledger::Group;
use split_core::settlement::settle_up;

use crate::{App, Message};

pub fn view_settle_panel<'a>(app: &'a App, group: &'a Group) -> Element<'a, Message> {
    let symbol = app.settings.currency_symbol.as_str();

    let summary = match settle_up(&app.ledger, group.id) {
        Ok(summary) => summary,
        Err(e) => return text(e.to_string()).size(11).color([0.8, 0.2, 0.2]).into(),
    };

    // ===== Balances =====
    let mut balances: Column<'_, Message> = column![text("Balances").size(12)].spacing(4);
    for entry in &summary.balances {
        let (note, color) = if entry.balance.is_negligible() {
            ("settled".to_string(), [0.5, 0.5, 0.5])
        } else if entry.balance.value() > 0.0 {
            (format!("gets back {}", entry.balance.format_with(symbol)), [0.1, 0.55, 0.2])
        } else {
            (format!("owes {}", entry.balance.abs().format_with(symbol)), [0.8, 0.2, 0.2])
        };
        balances = balances.push(
            row![
                text(entry.member.clone()).size(11).width(Length::Fixed(120.0)),
                text(note).size(11).color(color),
            ]
            .align_y(Alignment::Center),
        );
    }

    // ===== Payments =====
    let mut payments: Column<'_, Message> = column![text("Suggested payments").size(12)].spacing(4);
    if summary.settlements.is_empty() {
        let message = if summary.total_expenses == 0 {
            "No expenses yet."
        } else {
            "Everyone is settled up!"
        };
        payments = payments.push(text(message).size(11).color([0.5, 0.5, 0.5]));
    }
    for payment in &summary.settlements {
        payments = payments.push(
            container(
                row![
                    text(format!("{} pays {}", payment.from, payment.to)).size(11),
                    Space::new().width(Length::Fill),
                    text(payment.amount.format_with(symbol)).size(11),
                ]
                .align_y(Alignment::Center),
            )
            .padding(Padding::from([4, 8]))
            .style(container::bordered_box),
        );
    }

    column![balances, payments].spacing(16).max_width(420).into()
}
