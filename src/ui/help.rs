use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Global"));
    lines.extend(section_lines(&[
        "q: Quit",
        "?: Toggle help",
        "j/r/c: Journal, Report, Catalog",
        "esc: Back",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Journal"));
    lines.extend(section_lines(&[
        "Up/Down: Select entry",
        "[ / ]: Previous / next day",
        "{ / }: Previous / next day with entries",
        "t: Today",
        "n: New entry",
        "e or Enter: Edit entry",
        "d: Delete entry (asks for confirmation)",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Entry form"));
    lines.extend(section_lines(&[
        "Tab / Shift+Tab: Next / previous field",
        "Enter: Save   Esc: Discard",
        "Time range: type digits, separators are added for you",
        "Project, type: Up/Down pick from the catalog",
        "Tags: Up/Down select, space toggle",
        "Links: Insert add, Delete remove, Left/Right text/url",
        "Tickets: space attach/detach, / search",
        "Search: Enter runs the query (disabled while searching)",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Report"));
    lines.extend(section_lines(&[
        "w / m: Week / month",
        "[ / ]: Previous / next period",
        "t: Current period",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Catalog"));
    lines.extend(section_lines(&[
        "Tab: Projects / tags",
        "space: Toggle active",
        "n: New item   d: Delete item",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Tickets"));
    lines.extend(section_lines(&[
        "Tickets shown in red are attached but missing from the latest search; they stay attached",
    ]));

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
