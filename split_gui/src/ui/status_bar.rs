//! Status Bar (Bottom)
//!
//! Displays:
//! - Current data file
//! - Lock holder (if read-only)
//! - Status messages

use std::path::Path;

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use crate::Message;

/// Render the status bar
pub fn view_status_bar<'a>(
    data_file: &'a Path,
    lock_holder: &'a Option<String>,
    status: &'a str,
) -> Element<'a, Message> {
    let lock_info = match lock_holder {
        Some(holder) => format!(" [Locked by: {}]", holder),
        None => String::new(),
    };

    row![
        text(data_file.display().to_string()).size(10),
        text(lock_info).size(10).color([0.6, 0.3, 0.0]),
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
