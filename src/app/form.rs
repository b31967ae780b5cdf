use crossterm::event::KeyCode;

use crate::entry::{ENTRY_TYPES, Entry, EntryField};
use crate::tickets;
use crate::types::{LinkField, PoolTicket, TicketCandidate};

/// Which part of the entry form receives key presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormFocus {
    Field(EntryField),
    Tags,
    CustomTags,
    Links,
    Tickets,
    Search,
}

impl FormFocus {
    const ORDER: [FormFocus; 13] = [
        FormFocus::Field(EntryField::TimeRange),
        FormFocus::Field(EntryField::Project),
        FormFocus::Field(EntryField::EntryType),
        FormFocus::Field(EntryField::Description),
        FormFocus::Field(EntryField::Duration),
        FormFocus::Field(EntryField::Results),
        FormFocus::Field(EntryField::Blockers),
        FormFocus::Field(EntryField::Reflections),
        FormFocus::Tags,
        FormFocus::CustomTags,
        FormFocus::Links,
        FormFocus::Tickets,
        FormFocus::Search,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit(usize),
}

/// What the shell has to do after a key press in the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Save,
    Cancel,
    Search(String),
}

/// Active project and tag names offered by the form.
#[derive(Clone, Debug, Default)]
pub struct FormCatalog {
    pub projects: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct EntryForm {
    pub mode: FormMode,
    pub entry: Entry,
    pub focus: FormFocus,
    pub tag_cursor: usize,
    /// Catalog tags picked in the tag list; only changed by toggling.
    pub chosen_tags: Vec<String>,
    pub custom_tags: String,
    pub link_cursor: usize,
    pub link_field: LinkField,
    pub ticket_cursor: usize,
    pub search: String,
}

fn cycle(options: &[impl AsRef<str>], current: &str, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| o.as_ref() == current) {
        Some(index) if forward => (index + 1) % len,
        Some(index) => (index + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(options[next].as_ref().to_string())
}

fn move_cursor(cursor: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *cursor = 0;
    } else if down {
        *cursor = (*cursor + 1) % len;
    } else {
        *cursor = (*cursor + len - 1) % len;
    }
}

impl EntryForm {
    pub fn new(mode: FormMode, entry: Entry, catalog: &FormCatalog, search: &str) -> Self {
        let custom_tags = entry.custom_tags(&catalog.tags);
        let chosen_tags = entry
            .tags()
            .iter()
            .filter(|tag| catalog.tags.contains(tag))
            .cloned()
            .collect();
        Self {
            mode,
            entry,
            focus: FormFocus::Field(EntryField::TimeRange),
            tag_cursor: 0,
            chosen_tags,
            custom_tags,
            link_cursor: 0,
            link_field: LinkField::Text,
            ticket_cursor: 0,
            search: search.to_string(),
        }
    }

    /// Reconciled ticket list for the current candidate pool.
    pub fn ticket_view(&self, pool: &[PoolTicket]) -> Vec<TicketCandidate> {
        tickets::reconcile(self.entry.tickets(), pool)
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        catalog: &FormCatalog,
        pool: &[PoolTicket],
        search_busy: bool,
    ) -> FormAction {
        match key {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return FormAction::Continue;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return FormAction::Continue;
            }
            _ => {}
        }

        match self.focus {
            FormFocus::Field(field) => self.handle_field_key(field, key, catalog),
            FormFocus::Tags => self.handle_tags_key(key, catalog),
            FormFocus::CustomTags => self.handle_custom_tags_key(key),
            FormFocus::Links => self.handle_links_key(key),
            FormFocus::Tickets => self.handle_tickets_key(key, pool),
            FormFocus::Search => self.handle_search_key(key, search_busy),
        }
    }

    fn handle_field_key(&mut self, field: EntryField, key: KeyCode, catalog: &FormCatalog) -> FormAction {
        match key {
            KeyCode::Enter => return FormAction::Save,
            KeyCode::Char(ch) if !ch.is_control() => {
                let mut value = self.entry.field(field).to_string();
                value.push(ch);
                self.entry.set_field(field, value);
            }
            KeyCode::Backspace => {
                let mut value = self.entry.field(field).to_string();
                value.pop();
                self.entry.set_field(field, value);
            }
            KeyCode::Up | KeyCode::Down => {
                let forward = key == KeyCode::Down;
                let current = self.entry.field(field).to_string();
                let next = match field {
                    EntryField::Project => cycle(&catalog.projects, &current, forward),
                    EntryField::EntryType => cycle(ENTRY_TYPES, &current, forward),
                    _ => None,
                };
                if let Some(next) = next {
                    self.entry.set_field(field, next);
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    fn handle_tags_key(&mut self, key: KeyCode, catalog: &FormCatalog) -> FormAction {
        match key {
            KeyCode::Enter => return FormAction::Save,
            KeyCode::Up => move_cursor(&mut self.tag_cursor, catalog.tags.len(), false),
            KeyCode::Down => move_cursor(&mut self.tag_cursor, catalog.tags.len(), true),
            KeyCode::Char(' ') => {
                if let Some(tag) = catalog.tags.get(self.tag_cursor) {
                    match self.chosen_tags.iter().position(|t| t == tag) {
                        Some(index) => {
                            self.chosen_tags.remove(index);
                        }
                        None => self.chosen_tags.push(tag.clone()),
                    }
                    self.entry.set_custom_tags(&self.custom_tags, &self.chosen_tags);
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    fn handle_custom_tags_key(&mut self, key: KeyCode) -> FormAction {
        match key {
            KeyCode::Enter => return FormAction::Save,
            KeyCode::Char(ch) if !ch.is_control() => self.custom_tags.push(ch),
            KeyCode::Backspace => {
                self.custom_tags.pop();
            }
            _ => return FormAction::Continue,
        }
        self.entry.set_custom_tags(&self.custom_tags, &self.chosen_tags);
        FormAction::Continue
    }

    fn handle_links_key(&mut self, key: KeyCode) -> FormAction {
        let count = self.entry.links().len();
        match key {
            KeyCode::Enter => return FormAction::Save,
            KeyCode::Insert => {
                self.entry.add_link();
                self.link_cursor = self.entry.links().len() - 1;
                self.link_field = LinkField::Text;
            }
            KeyCode::Delete => {
                if self.entry.remove_link(self.link_cursor) {
                    self.link_cursor = self.link_cursor.min(self.entry.links().len().saturating_sub(1));
                }
            }
            KeyCode::Up => move_cursor(&mut self.link_cursor, count, false),
            KeyCode::Down => move_cursor(&mut self.link_cursor, count, true),
            KeyCode::Left | KeyCode::Right => {
                self.link_field = match self.link_field {
                    LinkField::Text => LinkField::Url,
                    LinkField::Url => LinkField::Text,
                };
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if let Some(mut value) = self.current_link_value() {
                    value.push(ch);
                    self.entry.set_link(self.link_cursor, self.link_field, value);
                }
            }
            KeyCode::Backspace => {
                if let Some(mut value) = self.current_link_value() {
                    value.pop();
                    self.entry.set_link(self.link_cursor, self.link_field, value);
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    fn current_link_value(&self) -> Option<String> {
        let link = self.entry.links().get(self.link_cursor)?;
        Some(match self.link_field {
            LinkField::Text => link.text.clone(),
            LinkField::Url => link.url.clone(),
        })
    }

    fn handle_tickets_key(&mut self, key: KeyCode, pool: &[PoolTicket]) -> FormAction {
        let view = self.ticket_view(pool);
        match key {
            KeyCode::Enter => return FormAction::Save,
            KeyCode::Up => move_cursor(&mut self.ticket_cursor, view.len(), false),
            KeyCode::Down => move_cursor(&mut self.ticket_cursor, view.len(), true),
            KeyCode::Char(' ') => {
                if let Some(candidate) = view.get(self.ticket_cursor) {
                    let visible = self.entry.toggle_ticket_view(&candidate.key, pool).len();
                    let selected = self.entry.tickets().len();
                    tracing::debug!(key = %candidate.key, selected, "ticket toggled in form");
                    self.ticket_cursor = self.ticket_cursor.min(visible.saturating_sub(1));
                }
            }
            KeyCode::Char('/') => self.focus = FormFocus::Search,
            _ => {}
        }
        FormAction::Continue
    }

    fn handle_search_key(&mut self, key: KeyCode, search_busy: bool) -> FormAction {
        match key {
            KeyCode::Enter => {
                if search_busy {
                    return FormAction::Continue;
                }
                self.ticket_cursor = 0;
                return FormAction::Search(self.search.trim().to_string());
            }
            KeyCode::Char(ch) if !ch.is_control() => self.search.push(ch),
            KeyCode::Backspace => {
                self.search.pop();
            }
            _ => {}
        }
        FormAction::Continue
    }
}
