//! Groups Panel (Left Sidebar)
//!
//! Displays:
//! - Overall totals across every group
//! - Group list, newest first (click to select)
//! - New group form

use iced::widget::{button, column, container, row, rule, scrollable, text, text_input, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use crate::{App, Message};

const SIDEBAR_WIDTH: f32 = 240.0;

/// Render the groups panel (left sidebar)
pub fn view_groups_panel(app: &App) -> Element<'_, Message> {
    let symbol = app.settings.currency_symbol.as_str();
    let stats = app.ledger.stats();

    let mut panel_content: Column<'_, Message> = column![].spacing(4);

    // ===== Totals =====
    panel_content = panel_content.push(
        column![
            text(format!("Groups: {}", stats.total_groups)).size(10),
            text(format!("Expenses: {}", stats.total_expenses)).size(10),
            text(format!("Total spent: {}", stats.total_spent.format_with(symbol))).size(10),
        ]
        .spacing(2)
        .padding(Padding::from([4, 6])),
    );

    panel_content = panel_content.push(rule::horizontal(1));

    // ===== Group List =====
    panel_content = panel_content.push(text("Groups").size(12));

    let mut group_list: Column<'_, Message> = column![].spacing(2).padding(Padding::from([4, 8]));
    let groups = app.ledger.groups_newest_first();
    if groups.is_empty() {
        group_list = group_list.push(text("(none yet)").size(10).color([0.5, 0.5, 0.5]));
    }
    for group in groups {
        let style = if app.selected_group == Some(group.id) {
            button::primary
        } else {
            button::secondary
        };
        let label = column![
            text(&group.name).size(11),
            text(format!("{} members, {} expenses", group.members.len(), group.expenses.len()))
                .size(9)
                .color([0.5, 0.5, 0.5]),
        ]
        .spacing(1);

        group_list = group_list.push(
            button(label)
                .on_press(Message::SelectGroup(group.id))
                .padding(Padding::from([3, 6]))
                .style(style)
                .width(Length::Fill),
        );
    }
    panel_content = panel_content.push(group_list);

    panel_content = panel_content.push(rule::horizontal(1));

    // ===== New Group Form =====
    let create = button(text("Create Group").size(11))
        .padding(Padding::from([4, 8]))
        .style(button::primary);
    let create = if app.is_read_only() {
        create
    } else {
        create.on_press(Message::CreateGroup)
    };

    panel_content = panel_content.push(
        column![
            text("New Group").size(12),
            text_input("Group name", &app.group_form.name)
                .on_input(Message::GroupNameChanged)
                .padding(4)
                .size(11),
            text_input("Members, comma separated", &app.group_form.members)
                .on_input(Message::GroupMembersChanged)
                .on_submit(Message::CreateGroup)
                .padding(4)
                .size(11),
            text("At least two members").size(9).color([0.5, 0.5, 0.5]),
            row![Space::new().width(Length::Fill), create].align_y(Alignment::Center),
        ]
        .spacing(4)
        .padding(Padding::from([4, 6])),
    );

    container(scrollable(panel_content.padding(4)))
        .width(Length::Fixed(SIDEBAR_WIDTH))
        .height(Length::Fill)
        .style(container::bordered_box)
        .padding(4)
        .into()
}
