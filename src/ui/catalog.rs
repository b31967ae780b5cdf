use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{catalog_style, clamp_name, marker};
use super::theme::Theme;
use crate::app::App;
use crate::types::CatalogKind;

pub fn build_catalog_text(app: &App) -> Text<'_> {
    let tab = |kind: CatalogKind, label: &'static str| {
        if app.catalog_kind == kind {
            Span::styled(
                label,
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
        } else {
            Span::styled(label, Style::default().fg(Theme::dim()))
        }
    };
    let mut lines = vec![
        Line::from(vec![
            tab(CatalogKind::Project, "Projects"),
            Span::raw("   "),
            tab(CatalogKind::Tag, "Tags"),
        ]),
        Line::from(""),
    ];

    if app.catalog_items.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("No {}s found. Press 'n' to create one.", app.catalog_kind.label()),
            Style::default().fg(Theme::dim()),
        )));
        return Text::from(lines);
    }

    for (index, item) in app.catalog_items.iter().enumerate() {
        let (arrow, arrow_style) = marker(index == app.selected_catalog_item);
        let (state, state_style) = if item.active {
            ("active  ", Style::default().fg(Theme::success()))
        } else {
            ("inactive", Style::default().fg(Theme::dim()))
        };
        lines.push(Line::from(vec![
            Span::styled(arrow, arrow_style),
            Span::styled(clamp_name(&item.name, 16), catalog_style(&item.color)),
            Span::raw("  "),
            Span::styled(item.color.as_str(), Style::default().fg(Theme::dim())),
            Span::raw("  "),
            Span::styled(state, state_style),
            Span::raw("  "),
            Span::styled(
                item.description.as_deref().unwrap_or(""),
                Style::default().fg(Theme::text()),
            ),
        ]));
    }

    Text::from(lines)
}
