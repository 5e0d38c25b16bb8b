//! Group Panel (Center)
//!
//! Header with the group name and members, tab buttons, and the active tab.

use iced::widget::{button, column, container, row, rule, scrollable, text, Space};
use iced::{Alignment, Element, Length, Padding};

use crate::ui::{expense_form, expense_list, settle_panel};
use crate::{App, GroupTab, Message};

/// Render the group panel, or a placeholder when nothing is selected
pub fn view_group_panel(app: &App) -> Element<'_, Message> {
    let group = app.selected_group.and_then(|id| app.ledger.group(id).ok());

    let content: Element<'_, Message> = match group {
        Some(group) => {
            let header = column![
                text(&group.name).size(18),
                text(format!("Members: {}", group.members.join(", ")))
                    .size(10)
                    .color([0.5, 0.5, 0.5]),
            ]
            .spacing(2);

            let tabs = row![
                tab_button("Expenses", GroupTab::Expenses, app.tab),
                tab_button("Add Expense", GroupTab::AddExpense, app.tab),
                tab_button("Settle Up", GroupTab::SettleUp, app.tab),
            ]
            .spacing(4);

            let body = match app.tab {
                GroupTab::Expenses => expense_list::view_expense_list(app, group),
                GroupTab::AddExpense => expense_form::view_expense_form(app, group),
                GroupTab::SettleUp => settle_panel::view_settle_panel(app, group),
            };

            column![header, tabs, rule::horizontal(1), scrollable(body).height(Length::Fill)]
                .spacing(8)
                .into()
        }
        None => view_placeholder(),
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(container::bordered_box)
        .padding(12)
        .into()
}

fn tab_button(label: &str, tab: GroupTab, active: GroupTab) -> Element<'_, Message> {
    let style = if tab == active {
        button::primary
    } else {
        button::secondary
    };
    button(text(label).size(11))
        .on_press(Message::ShowTab(tab))
        .padding(Padding::from([4, 10]))
        .style(style)
        .into()
}

fn view_placeholder() -> Element<'static, Message> {
    column![
        Space::new().height(40),
        text("No group selected").size(14),
        Space::new().height(8),
        text("Pick a group on the left,").size(11).color([0.5, 0.5, 0.5]),
        text("or create one with at least two members.").size(11).color([0.5, 0.5, 0.5]),
    ]
    .width(Length::Fill)
    .align_x(Alignment::Center)
    .into()
}
