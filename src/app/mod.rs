mod form;
mod state;

use crossterm::event::KeyCode;

pub use form::{EntryForm, FormFocus, FormMode};
pub use state::{App, CatalogField, ConfirmPopup, NewCatalogItemPopup};

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Journal,
    EntryForm,
    Report,
    Catalog,
    Help,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportRange {
    Week,
    Month,
}
