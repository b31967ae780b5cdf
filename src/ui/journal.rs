use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, marker};
use super::theme::Theme;
use crate::app::App;
use crate::entry::{EntryField, ticket_url};

pub fn build_journal_text(app: &App) -> Text<'_> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            app.date.format("%A %d %B %Y").to_string(),
            Style::default()
                .fg(Theme::primary())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if app.date == app.today { "  (today)" } else { "" },
            Style::default().fg(Theme::dim()),
        ),
        Span::styled(
            format!("  {} journaled days", app.journal_dates.len()),
            Style::default().fg(Theme::dim()),
        ),
    ])];
    lines.push(Line::from(""));

    if app.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No entries for this day. Press 'n' to write one.",
            Style::default().fg(Theme::dim()),
        )));
        return Text::from(lines);
    }

    for (index, entry) in app.entries.iter().enumerate() {
        let selected = index == app.selected_entry;
        let (arrow, arrow_style) = marker(selected);
        let time = if entry.time_range().is_empty() {
            "--:--"
        } else {
            entry.time_range()
        };
        let name_style = if selected {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::text())
        };
        lines.push(Line::from(vec![
            Span::styled(arrow, arrow_style),
            Span::styled(format!("{:<12}", time), Style::default().fg(Theme::accent())),
            Span::styled(clamp_name(&entry.project, 14), name_style),
            Span::raw(" "),
            Span::styled(clamp_name(&entry.entry_type, 14), Style::default().fg(Theme::dim())),
            Span::raw(" "),
            Span::styled(entry.duration.as_str(), Style::default().fg(Theme::accent())),
        ]));
        if !entry.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", entry.description),
                Style::default().fg(Theme::text()),
            )));
        }
        if !selected {
            continue;
        }

        for field in [EntryField::Results, EntryField::Blockers, EntryField::Reflections] {
            let value = entry.field(field);
            if !value.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(format!("    {}: ", field.label()), Style::default().fg(Theme::dim())),
                    Span::styled(value, Style::default().fg(Theme::text())),
                ]));
            }
        }
        if !entry.tags().is_empty() {
            let tags = entry
                .tags()
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(Line::from(Span::styled(
                format!("    {tags}"),
                Style::default().fg(Theme::secondary()),
            )));
        }
        for link in entry.complete_links() {
            lines.push(Line::from(vec![
                Span::styled(format!("    {} ", link.text), Style::default().fg(Theme::text())),
                Span::styled(link.url.as_str(), Style::default().fg(Theme::dim())),
            ]));
        }
        for ticket in entry.tickets() {
            let mut spans = vec![
                Span::styled(
                    format!("    {} ", ticket.key),
                    Style::default()
                        .fg(Theme::accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    ticket.summary.as_deref().unwrap_or(""),
                    Style::default().fg(Theme::text()),
                ),
            ];
            if let Some(base) = &app.config.tracker_base_url {
                spans.push(Span::styled(
                    format!("  {}", ticket_url(&ticket.key, base)),
                    Style::default().fg(Theme::dim()),
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    Text::from(lines)
}
