use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{Days, Local, Months, NaiveDate};
use crossterm::event::KeyCode;
use rusqlite::Connection;

use crate::config::JournalConfig;
use crate::db;
use crate::entry::Entry;
use crate::report::{ReportView, month_start, week_start};
use crate::tickets::{CandidatePool, FetchResult, PoolUpdate, TicketSource, spawn_fetch};
use crate::types::{CatalogId, CatalogItem, CatalogKind};

use super::form::{EntryForm, FormAction, FormCatalog, FormMode};
use super::{AppEvent, AppView, ReportRange};

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub db: Connection,
    pub config: JournalConfig,
    pub view: AppView,
    previous_view: AppView,
    pub today: NaiveDate,
    pub date: NaiveDate,
    pub journal_dates: Vec<NaiveDate>,
    pub entries: Vec<Entry>,
    pub selected_entry: usize,
    pub form: Option<EntryForm>,
    pub form_catalog: FormCatalog,
    pub report_range: ReportRange,
    pub report_anchor: NaiveDate,
    pub report: Option<ReportView>,
    pub catalog_kind: CatalogKind,
    pub catalog_items: Vec<CatalogItem>,
    pub selected_catalog_item: usize,
    pub new_item_popup: Option<NewCatalogItemPopup>,
    pub confirm_popup: Option<ConfirmPopup>,
    pub pool: CandidatePool,
    source: Arc<dyn TicketSource>,
    fetch_tx: Sender<FetchResult>,
    fetch_rx: Receiver<FetchResult>,
    pub status: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteEntry(usize),
    DeleteCatalogItem(CatalogKind, CatalogId),
}

#[derive(Clone, Debug)]
pub struct ConfirmPopup {
    pub message: String,
    pub action: ConfirmAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogField {
    Name,
    Color,
}

#[derive(Clone, Debug)]
pub struct NewCatalogItemPopup {
    pub kind: CatalogKind,
    pub name: String,
    pub color: String,
    pub field: CatalogField,
}

fn move_selection(index: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *index = 0;
    } else if down {
        *index = (*index + 1).min(len - 1);
    } else {
        *index = index.saturating_sub(1);
    }
}

impl App {
    pub fn new(db: Connection, config: JournalConfig, source: Arc<dyn TicketSource>) -> Self {
        let today = Local::now().date_naive();
        let (fetch_tx, fetch_rx) = mpsc::channel();
        let mut app = Self {
            running: true,
            db,
            config,
            view: AppView::Journal,
            previous_view: AppView::Journal,
            today,
            date: today,
            journal_dates: Vec::new(),
            entries: Vec::new(),
            selected_entry: 0,
            form: None,
            form_catalog: FormCatalog::default(),
            report_range: ReportRange::Week,
            report_anchor: today,
            report: None,
            catalog_kind: CatalogKind::Project,
            catalog_items: Vec::new(),
            selected_catalog_item: 0,
            new_item_popup: None,
            confirm_popup: None,
            pool: CandidatePool::default(),
            source,
            fetch_tx,
            fetch_rx,
            status: None,
        };

        app.load_journal();
        app.load_form_catalog();
        let saved_query = match db::get_preference(db::TICKET_QUERY, &app.db) {
            Ok(query) => query.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("could not read the saved ticket query: {err:#}");
                String::new()
            }
        };
        app.start_fetch(&saved_query);

        app
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.drain_fetches(),
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.confirm_popup.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if self.new_item_popup.is_some() {
            self.handle_new_item_key(key);
            return;
        }
        if self.view == AppView::EntryForm {
            self.handle_form_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('j') => self.navigate_to(AppView::Journal),
            KeyCode::Char('r') => self.navigate_to(AppView::Report),
            KeyCode::Char('c') => self.navigate_to(AppView::Catalog),
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.go_back();
                } else {
                    self.navigate_to(AppView::Help);
                }
            }
            KeyCode::Esc => self.go_back(),
            _ => match self.view {
                AppView::Journal => self.handle_journal_key(key),
                AppView::Report => self.handle_report_key(key),
                AppView::Catalog => self.handle_catalog_key(key),
                AppView::EntryForm | AppView::Help => {}
            },
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if self.view == view {
            return;
        }
        self.previous_view = self.view;
        self.view = view;
        self.clear_status();
        match view {
            AppView::Journal => self.load_journal(),
            AppView::Report => self.load_report(),
            AppView::Catalog => self.load_catalog(),
            AppView::EntryForm | AppView::Help => {}
        }
    }

    fn go_back(&mut self) {
        let target = if self.view == AppView::Help {
            self.previous_view
        } else {
            AppView::Journal
        };
        self.navigate_to(target);
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    // Journal

    pub fn load_journal(&mut self) {
        match db::load_entries_for_date(self.date, &self.db) {
            Ok(entries) => self.entries = entries,
            Err(err) => {
                self.entries.clear();
                self.status = Some(format!("Could not load entries: {err:#}"));
            }
        }
        match db::journal_dates(&self.db) {
            Ok(dates) => self.journal_dates = dates,
            Err(err) => tracing::warn!("could not list journal days: {err:#}"),
        }
        self.selected_entry = self.selected_entry.min(self.entries.len().saturating_sub(1));
    }

    fn handle_journal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => move_selection(&mut self.selected_entry, self.entries.len(), false),
            KeyCode::Down => move_selection(&mut self.selected_entry, self.entries.len(), true),
            KeyCode::Char('[') => self.set_date(self.date.checked_sub_days(Days::new(1))),
            KeyCode::Char(']') => self.set_date(self.date.checked_add_days(Days::new(1))),
            KeyCode::Char('{') => {
                let earlier = self.journal_dates.iter().copied().find(|d| *d < self.date);
                self.set_date(earlier);
            }
            KeyCode::Char('}') => {
                let later = self.journal_dates.iter().rev().copied().find(|d| *d > self.date);
                self.set_date(later);
            }
            KeyCode::Char('t') => self.set_date(Some(self.today)),
            KeyCode::Char('n') => self.open_new_entry(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_entry(),
            KeyCode::Char('d') => {
                if self.entries.get(self.selected_entry).is_some() {
                    self.confirm_popup = Some(ConfirmPopup {
                        message: format!("Delete entry #{} of {}?", self.selected_entry + 1, self.date),
                        action: ConfirmAction::DeleteEntry(self.selected_entry),
                    });
                }
            }
            _ => {}
        }
    }

    fn set_date(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.date = date;
            self.selected_entry = 0;
            self.clear_status();
            self.load_journal();
        }
    }

    // Entry form

    fn open_new_entry(&mut self) {
        let entry = Entry::new(self.date, &self.config.default_entry_type);
        self.open_form(FormMode::New, entry);
    }

    fn open_edit_entry(&mut self) {
        let Some(entry) = self.entries.get(self.selected_entry).cloned() else {
            return;
        };
        self.open_form(FormMode::Edit(self.selected_entry), entry);
    }

    fn open_form(&mut self, mode: FormMode, entry: Entry) {
        self.load_form_catalog();
        let has_tickets = !entry.tickets().is_empty();
        self.form = Some(EntryForm::new(mode, entry, &self.form_catalog, self.pool.query()));
        self.navigate_to(AppView::EntryForm);
        // Re-run the current search so the entry's own tickets are resolved.
        if has_tickets && !self.pool.is_busy() {
            let query = self.pool.query().to_string();
            self.start_fetch(&query);
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let Some(form) = self.form.as_mut() else {
            self.view = AppView::Journal;
            return;
        };
        let action = form.handle_key(key, &self.form_catalog, self.pool.tickets(), self.pool.is_busy());
        match action {
            FormAction::Continue => {}
            FormAction::Save => self.save_form(),
            FormAction::Cancel => {
                self.form = None;
                self.navigate_to(AppView::Journal);
            }
            FormAction::Search(query) => {
                self.start_fetch(&query);
                if let Err(err) = db::set_preference(db::TICKET_QUERY, &query, &self.db) {
                    tracing::warn!("could not store the ticket query: {err:#}");
                }
            }
        }
    }

    /// Persists the form. On failure the form stays open with its content untouched.
    fn save_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let result = match form.mode {
            FormMode::New => db::save_entry(self.date, &form.entry, &self.db).map(|_| true),
            FormMode::Edit(index) => db::update_entry(self.date, index, &form.entry, &self.db),
        };
        match result {
            Ok(true) => {
                self.form = None;
                self.navigate_to(AppView::Journal);
                self.load_journal();
                self.status = Some("Entry saved.".to_string());
            }
            Ok(false) => {
                self.status = Some("The entry no longer exists; press Esc and reload.".to_string());
            }
            Err(err) => {
                tracing::warn!("saving entry failed: {err:#}");
                self.status = Some(format!("Save failed: {err:#}"));
            }
        }
    }

    // Ticket pool

    fn start_fetch(&mut self, query: &str) {
        let selected_keys = self
            .form
            .as_ref()
            .map(|form| form.entry.tickets().iter().map(|t| t.key.clone()).collect())
            .unwrap_or_default();
        let id = self.pool.begin_fetch(query);
        spawn_fetch(
            Arc::clone(&self.source),
            id,
            query.to_string(),
            selected_keys,
            self.fetch_tx.clone(),
        );
    }

    fn drain_fetches(&mut self) {
        while let Ok((id, result)) = self.fetch_rx.try_recv() {
            match self.pool.resolve(id, result) {
                PoolUpdate::Applied(count) => {
                    if self.view == AppView::EntryForm {
                        self.status = Some(format!("{count} tickets found."));
                    }
                    if let Some(form) = self.form.as_mut() {
                        let visible = form.ticket_view(self.pool.tickets()).len();
                        form.ticket_cursor = form.ticket_cursor.min(visible.saturating_sub(1));
                    }
                }
                PoolUpdate::Failed(message) => {
                    self.status = Some(format!("Ticket search failed: {message}"));
                }
                PoolUpdate::Stale => {}
            }
        }
    }

    // Report

    pub fn report_period(&self) -> (NaiveDate, NaiveDate) {
        match self.report_range {
            ReportRange::Week => {
                let start = week_start(self.report_anchor);
                (start, start.checked_add_days(Days::new(6)).unwrap_or(start))
            }
            ReportRange::Month => {
                let start = month_start(self.report_anchor);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(start);
                (start, end)
            }
        }
    }

    fn load_report(&mut self) {
        let (start, end) = self.report_period();
        match db::generate_activity_report(start, end, &self.db) {
            Ok(report) => self.report = Some(ReportView::from_aggregate(&report)),
            Err(err) => {
                self.report = None;
                self.status = Some(format!("Could not build report: {err:#}"));
            }
        }
    }

    fn handle_report_key(&mut self, key: KeyCode) {
        let anchor = match key {
            KeyCode::Char('w') => {
                self.report_range = ReportRange::Week;
                Some(self.report_anchor)
            }
            KeyCode::Char('m') => {
                self.report_range = ReportRange::Month;
                Some(self.report_anchor)
            }
            KeyCode::Char('[') => match self.report_range {
                ReportRange::Week => self.report_anchor.checked_sub_days(Days::new(7)),
                ReportRange::Month => self.report_anchor.checked_sub_months(Months::new(1)),
            },
            KeyCode::Char(']') => match self.report_range {
                ReportRange::Week => self.report_anchor.checked_add_days(Days::new(7)),
                ReportRange::Month => self.report_anchor.checked_add_months(Months::new(1)),
            },
            KeyCode::Char('t') => Some(self.today),
            _ => None,
        };
        if let Some(anchor) = anchor {
            self.report_anchor = anchor;
            self.load_report();
        }
    }

    // Catalog

    fn load_catalog(&mut self) {
        let items = match self.catalog_kind {
            CatalogKind::Project => db::list_projects(true, &self.db),
            CatalogKind::Tag => db::list_tags(true, &self.db),
        };
        match items {
            Ok(items) => self.catalog_items = items,
            Err(err) => {
                self.catalog_items.clear();
                self.status = Some(format!("Could not load {}s: {err:#}", self.catalog_kind.label()));
            }
        }
        self.selected_catalog_item = self
            .selected_catalog_item
            .min(self.catalog_items.len().saturating_sub(1));
    }

    fn load_form_catalog(&mut self) {
        let names = |items: anyhow::Result<Vec<CatalogItem>>| -> Vec<String> {
            match items {
                Ok(items) => items.into_iter().map(|item| item.name).collect(),
                Err(err) => {
                    tracing::warn!("could not load catalog names: {err:#}");
                    Vec::new()
                }
            }
        };
        self.form_catalog = FormCatalog {
            projects: names(db::list_projects(false, &self.db)),
            tags: names(db::list_tags(false, &self.db)),
        };
    }

    fn handle_catalog_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Tab => {
                self.catalog_kind = match self.catalog_kind {
                    CatalogKind::Project => CatalogKind::Tag,
                    CatalogKind::Tag => CatalogKind::Project,
                };
                self.selected_catalog_item = 0;
                self.load_catalog();
            }
            KeyCode::Up => {
                move_selection(&mut self.selected_catalog_item, self.catalog_items.len(), false)
            }
            KeyCode::Down => {
                move_selection(&mut self.selected_catalog_item, self.catalog_items.len(), true)
            }
            KeyCode::Char(' ') => self.toggle_selected_item(),
            KeyCode::Char('n') => {
                self.new_item_popup = Some(NewCatalogItemPopup {
                    kind: self.catalog_kind,
                    name: String::new(),
                    color: crate::color::random_color(),
                    field: CatalogField::Name,
                });
            }
            KeyCode::Char('d') => {
                if let Some(item) = self.catalog_items.get(self.selected_catalog_item) {
                    self.confirm_popup = Some(ConfirmPopup {
                        message: format!("Delete {} '{}'?", self.catalog_kind.label(), item.name),
                        action: ConfirmAction::DeleteCatalogItem(self.catalog_kind, item.id),
                    });
                }
            }
            _ => {}
        }
    }

    fn toggle_selected_item(&mut self) {
        let Some(item) = self.catalog_items.get(self.selected_catalog_item) else {
            return;
        };
        let result = match self.catalog_kind {
            CatalogKind::Project => db::toggle_project_status(item.id, &self.db),
            CatalogKind::Tag => db::toggle_tag_status(item.id, &self.db),
        };
        match result {
            Ok(active) => {
                let state = if active { "active" } else { "inactive" };
                self.status = Some(format!("'{}' is now {state}.", item.name));
            }
            Err(err) => self.status = Some(format!("Toggle failed: {err:#}")),
        }
        self.load_catalog();
        self.load_form_catalog();
    }

    fn handle_new_item_key(&mut self, key: KeyCode) {
        let Some(popup) = self.new_item_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.new_item_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => self.apply_new_item_popup(),
            KeyCode::Tab => {
                popup.field = match popup.field {
                    CatalogField::Name => CatalogField::Color,
                    CatalogField::Color => CatalogField::Name,
                };
            }
            KeyCode::Backspace | KeyCode::Delete => match popup.field {
                CatalogField::Name => {
                    popup.name.pop();
                }
                CatalogField::Color => {
                    popup.color.pop();
                }
            },
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                match popup.field {
                    CatalogField::Name => popup.name.push(ch),
                    CatalogField::Color => popup.color.push(ch),
                }
            }
            _ => {}
        }
    }

    fn apply_new_item_popup(&mut self) {
        let Some(popup) = self.new_item_popup.as_ref() else {
            return;
        };
        let name = popup.name.trim();
        if name.is_empty() {
            self.status = Some("Name cannot be empty.".to_string());
            return;
        }
        if !crate::color::is_valid_hex(&popup.color) {
            self.status = Some("Invalid color format. Use #RRGGBB.".to_string());
            return;
        }
        let result = match popup.kind {
            CatalogKind::Project => db::create_project(name, None, Some(&popup.color), &self.db),
            CatalogKind::Tag => db::create_tag(name, None, Some(&popup.color), &self.db),
        };
        match result {
            Ok(_) => {
                self.status = Some(format!("Created {} '{name}'.", popup.kind.label()));
                self.new_item_popup = None;
                self.load_catalog();
                self.load_form_catalog();
            }
            Err(err) => self.status = Some(format!("Create failed: {err:#}")),
        }
    }

    // Confirmation

    fn handle_confirm_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(popup) = self.confirm_popup.take() {
                    self.apply_confirmed(popup.action);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_popup = None;
            }
            _ => {}
        }
    }

    fn apply_confirmed(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::DeleteEntry(index) => {
                match db::delete_entry(self.date, index, &self.db) {
                    Ok(true) => self.status = Some("Entry deleted.".to_string()),
                    Ok(false) => self.status = Some("Entry was already gone.".to_string()),
                    Err(err) => self.status = Some(format!("Delete failed: {err:#}")),
                }
                self.load_journal();
            }
            ConfirmAction::DeleteCatalogItem(kind, id) => {
                let result = match kind {
                    CatalogKind::Project => db::delete_project(id, &self.db),
                    CatalogKind::Tag => db::delete_tag(id, &self.db),
                };
                if let Err(err) = result {
                    self.status = Some(format!("Delete failed: {err:#}"));
                }
                self.load_catalog();
                self.load_form_catalog();
            }
        }
    }
}
