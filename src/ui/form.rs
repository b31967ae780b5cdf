use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::marker;
use super::theme::Theme;
use crate::app::{App, EntryForm, FormFocus, FormMode};
use crate::entry::EntryField;
use crate::types::LinkField;

fn section_style(form: &EntryForm, focus: FormFocus) -> Style {
    if form.focus == focus {
        Style::default()
            .fg(Theme::highlight())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::dim())
    }
}

fn cursor(form: &EntryForm, focus: FormFocus) -> &'static str {
    if form.focus == focus { "_" } else { "" }
}

pub fn build_form_title(app: &App) -> String {
    match app.form.as_ref().map(|form| form.mode) {
        Some(FormMode::Edit(index)) => format!(" Edit entry #{} ", index + 1),
        _ => " New entry ".to_string(),
    }
}

pub fn build_form_text(app: &App) -> Text<'_> {
    let Some(form) = app.form.as_ref() else {
        return Text::from("No entry is being edited.");
    };
    let mut lines = Vec::new();

    for field in EntryField::ALL {
        let focus = FormFocus::Field(field);
        let hint = match field {
            EntryField::Project | EntryField::EntryType if form.focus == focus => "  (Up/Down: choose)",
            _ => "",
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<13}", field.label()), section_style(form, focus)),
            Span::styled(form.entry.field(field), Style::default().fg(Theme::text())),
            Span::styled(cursor(form, focus), Style::default().fg(Theme::highlight())),
            Span::styled(hint, Style::default().fg(Theme::dim())),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Tags", section_style(form, FormFocus::Tags))));
    let mut tag_spans = vec![Span::raw("  ")];
    for (index, tag) in app.form_catalog.tags.iter().enumerate() {
        let checked = form.entry.tags().contains(tag);
        let mut style = if checked {
            Style::default()
                .fg(Theme::success())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        };
        if form.focus == FormFocus::Tags && index == form.tag_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let mark = if checked { "[x]" } else { "[ ]" };
        tag_spans.push(Span::styled(format!("{mark} {tag}"), style));
        tag_spans.push(Span::raw("  "));
    }
    lines.push(Line::from(tag_spans));
    lines.push(Line::from(vec![
        Span::styled("Custom tags  ", section_style(form, FormFocus::CustomTags)),
        Span::styled(form.custom_tags.as_str(), Style::default().fg(Theme::text())),
        Span::styled(cursor(form, FormFocus::CustomTags), Style::default().fg(Theme::highlight())),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Links", section_style(form, FormFocus::Links)),
        Span::styled(
            "  (Insert: add  Delete: remove  Left/Right: text/url)",
            Style::default().fg(Theme::dim()),
        ),
    ]));
    for (index, link) in form.entry.links().iter().enumerate() {
        let selected = form.focus == FormFocus::Links && index == form.link_cursor;
        let (arrow, arrow_style) = marker(selected);
        let field_style = |field: LinkField| {
            if selected && form.link_field == field {
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(Theme::text())
            }
        };
        lines.push(Line::from(vec![
            Span::styled(arrow, arrow_style),
            Span::styled(
                if link.text.is_empty() { "<text>" } else { link.text.as_str() },
                field_style(LinkField::Text),
            ),
            Span::raw("  "),
            Span::styled(
                if link.url.is_empty() { "<url>" } else { link.url.as_str() },
                field_style(LinkField::Url),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.extend(ticket_lines(app, form));

    Text::from(lines)
}

fn ticket_lines<'a>(app: &'a App, form: &'a EntryForm) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    let busy = app.pool.is_busy();
    lines.push(Line::from(vec![
        Span::styled("Tickets", section_style(form, FormFocus::Tickets)),
        Span::styled("  (space: attach/detach  /: search)", Style::default().fg(Theme::dim())),
    ]));
    let search_style = if busy {
        Style::default().fg(Theme::dim())
    } else {
        Style::default().fg(Theme::text())
    };
    let mut search = vec![
        Span::styled("Search  ", section_style(form, FormFocus::Search)),
        Span::styled(form.search.as_str(), search_style),
        Span::styled(cursor(form, FormFocus::Search), Style::default().fg(Theme::highlight())),
    ];
    if busy {
        search.push(Span::styled("  searching...", Style::default().fg(Theme::warn())));
    }
    lines.push(Line::from(search));

    let view = form.ticket_view(app.pool.tickets());
    if view.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No tickets. Search to load candidates.",
            Style::default().fg(Theme::dim()),
        )));
    }
    for (index, candidate) in view.into_iter().enumerate() {
        let selected = form.focus == FormFocus::Tickets && index == form.ticket_cursor;
        let (arrow, arrow_style) = marker(selected);
        let check = if candidate.is_selected { "[x] " } else { "[ ] " };
        let key_style = if candidate.is_available {
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Theme::error())
                .add_modifier(Modifier::BOLD)
        };
        let mut spans = vec![
            Span::styled(arrow, arrow_style),
            Span::styled(check, Style::default().fg(Theme::success())),
            Span::styled(format!("{:<10}", candidate.key), key_style),
            Span::styled(candidate.summary, Style::default().fg(Theme::text())),
        ];
        if candidate.is_available {
            spans.push(Span::styled(
                format!("  [{}]", candidate.status),
                Style::default().fg(Theme::dim()),
            ));
        } else {
            spans.push(Span::styled(
                "  (not in current results)",
                Style::default().fg(Theme::error()),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}
