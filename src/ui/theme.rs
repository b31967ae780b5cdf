use ratatui::style::Color;

/// Fixed color palette of the terminal UI
pub struct Theme;

impl Theme {
    /// Branding and headings
    pub fn primary() -> Color {
        Color::Magenta
    }

    /// Borders
    pub fn secondary() -> Color {
        Color::Cyan
    }

    /// Saved / active items
    pub fn success() -> Color {
        Color::Green
    }

    /// Search in progress, pending confirmation
    pub fn warn() -> Color {
        Color::Yellow
    }

    /// Failures and orphaned tickets
    pub fn error() -> Color {
        Color::LightRed
    }

    /// Focused field
    pub fn highlight() -> Color {
        Color::Cyan
    }

    /// Selection marker/arrow
    pub fn selection_marker() -> Color {
        Color::Green
    }

    /// Dimmed/inactive text
    pub fn dim() -> Color {
        Color::DarkGray
    }

    pub fn text() -> Color {
        Color::White
    }

    /// Hours, counts and other numbers
    pub fn accent() -> Color {
        Color::LightBlue
    }
}
