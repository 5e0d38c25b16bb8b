//! # Evenly GUI Application
//!
//! Desktop interface for the shared-expense ledger, built with Iced.
//!
//! The window is split into a groups sidebar and a group panel with three
//! tabs: expenses, the add-expense form, and settle up. The add-expense form
//! previews each member's equal share live while the amount is typed.
//!
//! Every successful change is written to the data file immediately. When
//! another user holds the file's lock the ledger opens read-only.

mod form;
mod ui;

use std::path::PathBuf;

use iced::widget::{column, row};
use iced::{Element, Length, Task};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use split_core::config::Settings;
use split_core::errors::SplitError;
use split_core::file_io::{load_or_init, save_ledger, FileLock};
use split_core::ledger::{Ledger, SplitType};

use crate::form::{ExpenseForm, GroupForm};

pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application(App::new, App::update, App::view)
        .title(App::title)
        .window_size((1000.0, 680.0))
        .run()
}

/// Tabs of the group panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTab {
    Expenses,
    AddExpense,
    SettleUp,
}

#[derive(Debug, Clone)]
pub enum Message {
    // Toolbar
    NewLedger,
    OpenLedger,
    SaveLedgerAs,

    // Groups sidebar
    SelectGroup(u64),
    GroupNameChanged(String),
    GroupMembersChanged(String),
    CreateGroup,

    // Group panel
    ShowTab(GroupTab),
    DeleteGroup,

    // Expense form
    DescriptionChanged(String),
    AmountChanged(String),
    PaidBySelected(String),
    SplitTypeSelected(SplitType),
    ShareChanged(usize, String),
    SubmitExpense,
}

pub struct App {
    pub settings: Settings,
    pub ledger: Ledger,
    pub data_file: PathBuf,
    /// Held while we own the data file
    lock: Option<FileLock>,
    /// Set when someone else holds the lock; the ledger is then read-only
    pub lock_holder: Option<String>,
    pub selected_group: Option<u64>,
    pub tab: GroupTab,
    pub group_form: GroupForm,
    pub expense_form: Option<ExpenseForm>,
    pub status: String,
}

impl App {
    fn new() -> Self {
        let settings = Settings::load().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default settings");
            Settings::default()
        });
        let data_file = settings.data_file.clone();

        let mut app = App {
            settings,
            ledger: Ledger::new(),
            data_file: data_file.clone(),
            lock: None,
            lock_holder: None,
            selected_group: None,
            tab: GroupTab::Expenses,
            group_form: GroupForm::default(),
            expense_form: None,
            status: String::new(),
        };
        app.open(data_file);
        app
    }

    fn title(&self) -> String {
        let read_only = if self.is_read_only() { " [read-only]" } else { "" };
        format!("Evenly - {}{}", self.data_file.display(), read_only)
    }

    pub fn is_read_only(&self) -> bool {
        self.lock_holder.is_some()
    }

    /// Switch to another data file, taking its lock if we can.
    fn open(&mut self, path: PathBuf) {
        // Reloading the file we already hold keeps our own lock
        let reopening = path == self.data_file && self.lock.is_some();

        let (lock, lock_holder) = if reopening {
            (self.lock.take(), None)
        } else {
            match FileLock::acquire(&path, self.settings.user_id.clone()) {
                Ok(lock) => (Some(lock), None),
                Err(SplitError::FileLocked { locked_by, .. }) => (None, Some(locked_by)),
                Err(e) => {
                    self.status = format!("Could not lock {}: {}", path.display(), e);
                    return;
                }
            }
        };

        match load_or_init(&path) {
            Ok(ledger) => {
                info!(path = %path.display(), read_only = lock_holder.is_some(), "ledger opened");
                self.ledger = ledger;
                self.data_file = path;
                self.lock = lock;
                self.lock_holder = lock_holder;
                self.selected_group = None;
                self.expense_form = None;
                self.tab = GroupTab::Expenses;
                self.status = match &self.lock_holder {
                    Some(holder) => format!("Opened read-only; locked by {}", holder),
                    None => "Ledger opened".to_string(),
                };
            }
            Err(e) => {
                if reopening {
                    self.lock = lock;
                }
                self.status = format!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    /// Persist the ledger; returns false (and reports) on failure.
    fn persist(&mut self) -> bool {
        match save_ledger(&self.ledger, &self.data_file) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "save failed");
                self.status = format!("Error saving: {}", e);
                false
            }
        }
    }

    /// Run a ledger change, save it, and report the outcome.
    fn apply<T>(
        &mut self,
        change: impl FnOnce(&mut Ledger) -> Result<T, SplitError>,
        done: impl FnOnce(&T) -> String,
    ) -> Option<T> {
        if self.is_read_only() {
            self.status = "Ledger is read-only while another user has it open".to_string();
            return None;
        }

        // Work on a copy so a failed save leaves memory and disk in agreement
        let mut draft = self.ledger.clone();
        match change(&mut draft) {
            Ok(value) => {
                let previous = std::mem::replace(&mut self.ledger, draft);
                if self.persist() {
                    self.status = done(&value);
                    Some(value)
                } else {
                    self.ledger = previous;
                    None
                }
            }
            Err(e) => {
                self.status = e.to_string();
                None
            }
        }
    }

    fn select_group(&mut self, id: u64) {
        self.selected_group = Some(id);
        self.expense_form = self.ledger.group(id).ok().map(ExpenseForm::for_group);
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NewLedger => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Ledger", &["json"])
                    .set_file_name("data.json")
                    .save_file()
                {
                    if path.exists() {
                        self.status = format!("{} already exists; use Open instead", path.display());
                    } else {
                        self.open(path);
                        self.persist();
                    }
                }
            }
            Message::OpenLedger => {
                if let Some(path) = rfd::FileDialog::new().add_filter("Ledger", &["json"]).pick_file() {
                    self.open(path);
                }
            }
            Message::SaveLedgerAs => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Ledger", &["json"])
                    .set_file_name("data.json")
                    .save_file()
                {
                    match save_ledger(&self.ledger, &path) {
                        Ok(()) => {
                            let selected = self.selected_group;
                            self.open(path);
                            if let Some(id) = selected {
                                self.select_group(id);
                            }
                        }
                        Err(e) => self.status = format!("Error saving: {}", e),
                    }
                }
            }

            Message::SelectGroup(id) => self.select_group(id),
            Message::GroupNameChanged(name) => self.group_form.name = name,
            Message::GroupMembersChanged(members) => self.group_form.members = members,
            Message::CreateGroup => {
                let name = self.group_form.name.clone();
                let members = self.group_form.member_list();
                let created = self.apply(
                    |ledger| ledger.create_group(&name, &members),
                    |_| format!("Group \"{}\" created successfully!", name.trim()),
                );
                if let Some(id) = created {
                    self.group_form = GroupForm::default();
                    self.tab = GroupTab::Expenses;
                    self.select_group(id);
                }
            }

            Message::ShowTab(tab) => self.tab = tab,
            Message::DeleteGroup => {
                if let Some(id) = self.selected_group {
                    let deleted = self.apply(
                        |ledger| ledger.delete_group(id),
                        |group| format!("Group \"{}\" deleted successfully!", group.name),
                    );
                    if deleted.is_some() {
                        self.selected_group = None;
                        self.expense_form = None;
                    }
                }
            }

            Message::DescriptionChanged(text) => {
                if let Some(form) = &mut self.expense_form {
                    form.description = text;
                }
            }
            Message::AmountChanged(text) => {
                if let Some(form) = &mut self.expense_form {
                    form.on_amount_changed(text);
                }
            }
            Message::PaidBySelected(member) => {
                if let Some(form) = &mut self.expense_form {
                    form.paid_by = Some(member);
                }
            }
            Message::SplitTypeSelected(split_type) => {
                if let Some(form) = &mut self.expense_form {
                    form.split_type = split_type;
                }
            }
            Message::ShareChanged(index, text) => {
                if let Some(form) = &mut self.expense_form {
                    form.on_share_changed(index, text);
                }
            }
            Message::SubmitExpense => self.submit_expense(),
        }

        Task::none()
    }

    fn submit_expense(&mut self) {
        let (Some(group_id), Some(form)) = (self.selected_group, self.expense_form.as_ref()) else {
            return;
        };

        let new = match form.to_new_expense() {
            Ok(new) => new,
            Err(reason) => {
                self.status = reason;
                return;
            }
        };

        let added = self.apply(
            |ledger| ledger.add_expense(group_id, new),
            |_| "Expense added successfully!".to_string(),
        );
        if added.is_some() {
            self.tab = GroupTab::Expenses;
            self.select_group(group_id);
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let toolbar = ui::toolbar::view_toolbar();

        let sidebar = ui::groups_panel::view_groups_panel(self);
        let main_panel = ui::group_panel::view_group_panel(self);

        let status_bar = ui::status_bar::view_status_bar(
            &self.data_file,
            &self.lock_holder,
            &self.status,
        );

        column![
            toolbar,
            row![sidebar, main_panel].spacing(6).height(Length::Fill),
            status_bar,
        ]
        .padding(8)
        .spacing(4)
        .into()
    }
}
