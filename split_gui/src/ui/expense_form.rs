//! Add Expense tab
//!
//! Typing in the amount field rewrites every member's share input with the
//! equal share. With "Custom amounts" the share inputs can then be edited
//! by hand before submitting.

use iced::widget::{button, column, pick_list, row, text, text_input, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use split_core::equal_split::parse_amount;
use split_core::ledger::{Group, SplitType};
use split_core::money::{Money, CENT_EPSILON};

use crate::{App, Message};

pub fn view_expense_form<'a>(app: &'a App, group: &'a Group) -> Element<'a, Message> {
    let Some(form) = app.expense_form.as_ref() else {
        return text("Select the group again to start a new expense.")
            .size(11)
            .color([0.5, 0.5, 0.5])
            .into();
    };
    let symbol = app.settings.currency_symbol.as_str();
    let custom = form.split_type == SplitType::Custom;

    let details = column![
        labeled_input("Description:", "Dinner", &form.description, Message::DescriptionChanged),
        labeled_input("Amount:", "0.00", &form.amount, Message::AmountChanged),
        row![
            text("Paid by:").size(11).width(Length::Fixed(90.0)),
            pick_list(group.members.as_slice(), form.paid_by.clone(), Message::PaidBySelected)
                .width(Length::Fixed(160.0))
                .text_size(11),
        ]
        .align_y(Alignment::Center),
        row![
            text("Split:").size(11).width(Length::Fixed(90.0)),
            pick_list(&SplitType::ALL[..], Some(form.split_type), Message::SplitTypeSelected)
                .width(Length::Fixed(160.0))
                .text_size(11),
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(6);

    // ===== Shares =====
    let mut shares: Column<'_, Message> = column![text("Shares").size(12)].spacing(4);
    for (index, share) in form.shares.iter().enumerate() {
        let input = text_input("0.00", &share.value).padding(4).size(11).width(Length::Fixed(120.0));
        // Equal shares follow the amount; only custom shares are typed in
        let input = if custom {
            input.on_input(move |value| Message::ShareChanged(index, value))
        } else {
            input
        };
        shares = shares.push(
            row![
                text(&share.member).size(11).width(Length::Fixed(90.0)),
                text(symbol).size(11),
                Space::new().width(4),
                input,
            ]
            .align_y(Alignment::Center),
        );
    }

    let shares_total = Money::new(form.shares_total());
    let amount = Money::new(parse_amount(&form.amount));
    let balanced = (shares_total - amount).abs().value() <= CENT_EPSILON;
    let total_color = if !custom || balanced {
        [0.5, 0.5, 0.5]
    } else {
        [0.8, 0.2, 0.2]
    };
    shares = shares.push(
        text(format!(
            "Shares total {} of {}",
            shares_total.format_with(symbol),
            amount.format_with(symbol)
        ))
        .size(10)
        .color(total_color),
    );

    let submit = button(text("Add Expense").size(11))
        .padding(Padding::from([4, 10]))
        .style(button::primary);
    let submit = if app.is_read_only() {
        submit
    } else {
        submit.on_press(Message::SubmitExpense)
    };

    column![details, shares, row![Space::new().width(Length::Fill), submit]]
        .spacing(14)
        .max_width(480)
        .into()
}

/// Helper to create a labeled text input
fn labeled_input<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).size(11).width(Length::Fixed(90.0)),
        text_input(placeholder, value)
            .on_input(on_change)
            .width(Length::Fill)
            .padding(4)
            .size(11),
    ]
    .align_y(Alignment::Center)
    .into()
}
