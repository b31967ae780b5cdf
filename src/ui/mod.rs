mod catalog;
mod form;
mod help;
mod helpers;
mod journal;
mod report;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, AppView, CatalogField, ConfirmPopup, NewCatalogItemPopup};
use helpers::hex_to_color;
use theme::Theme;

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (title, body_text) = match app.view {
        AppView::Journal => (" Journal ".to_string(), journal::build_journal_text(app)),
        AppView::EntryForm => (form::build_form_title(app), form::build_form_text(app)),
        AppView::Report => (" Report ".to_string(), report::build_report_text(app)),
        AppView::Catalog => (" Catalog ".to_string(), catalog::build_catalog_text(app)),
        AppView::Help => (" Help ".to_string(), help::build_help_text()),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  DevJournal  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        tabs_line(app),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(header, layout[0]);

    let body = Paragraph::new(body_text)
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary()))
                .title(title),
        );
    frame.render_widget(body, layout[1]);

    let mut footer_lines = Vec::new();
    footer_lines.push(match &app.status {
        Some(status) => Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Theme::warn()),
        )),
        None => Line::from(""),
    });
    footer_lines.push(Line::from(Span::styled(
        keybinds_hint(app),
        Style::default().fg(Theme::dim()),
    )));
    let footer = Paragraph::new(Text::from(footer_lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(footer, layout[2]);

    if let Some(popup) = &app.new_item_popup {
        render_new_item_popup(frame, popup);
    }
    if let Some(popup) = &app.confirm_popup {
        render_confirm_popup(frame, popup);
    }
}

fn tabs_line(app: &App) -> Span<'static> {
    let label = match app.view {
        AppView::Journal => "journal",
        AppView::EntryForm => "journal / entry",
        AppView::Report => "report",
        AppView::Catalog => "catalog",
        AppView::Help => "help",
    };
    Span::styled(
        label,
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    )
}

fn keybinds_hint(app: &App) -> &'static str {
    match app.view {
        AppView::Journal => "[/]: Day  {/}: Journaled day  n: New  e: Edit  d: Delete  r: Report  c: Catalog  ?: Help  q: Quit",
        AppView::EntryForm => "Tab: Next field  Enter: Save  Esc: Discard  space: Toggle  /: Search tickets",
        AppView::Report => "w: Week  m: Month  [/]: Period  t: Now  j: Journal  ?: Help  q: Quit",
        AppView::Catalog => "Tab: Projects/Tags  space: Toggle  n: New  d: Delete  esc: Back  q: Quit",
        AppView::Help => "Press ? or ESC to close this help screen",
    }
}

fn render_new_item_popup(frame: &mut Frame, popup: &NewCatalogItemPopup) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);

    let field_style = |field: CatalogField| {
        if popup.field == field {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        }
    };
    let swatch_style = hex_to_color(&popup.color)
        .map(|color| Style::default().bg(color))
        .unwrap_or_else(|| Style::default().fg(Theme::error()));

    let lines = vec![
        Line::from(Span::styled(
            format!("New {}", popup.kind.label()),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Name:  ", field_style(CatalogField::Name)),
            Span::styled(popup.name.as_str(), Style::default().fg(Theme::text())),
        ]),
        Line::from(vec![
            Span::styled("Color: ", field_style(CatalogField::Color)),
            Span::styled(popup.color.as_str(), Style::default().fg(Theme::text())),
            Span::raw(" "),
            Span::styled("    ", swatch_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Tab: switch field  Enter: save  Esc: cancel",
            Style::default().fg(Theme::dim()),
        )),
    ];

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary()))
                .title(" New "),
        );
    frame.render_widget(widget, area);
}

fn render_confirm_popup(frame: &mut Frame, popup: &ConfirmPopup) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "Confirm Action",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            popup.message.as_str(),
            Style::default().fg(Theme::text()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Theme::dim())),
            Span::styled("Y", Style::default().fg(Theme::highlight()).add_modifier(Modifier::BOLD)),
            Span::styled(" to confirm or ", Style::default().fg(Theme::dim())),
            Span::styled("N", Style::default().fg(Theme::highlight()).add_modifier(Modifier::BOLD)),
            Span::styled("/", Style::default().fg(Theme::dim())),
            Span::styled("ESC", Style::default().fg(Theme::highlight()).add_modifier(Modifier::BOLD)),
            Span::styled(" to cancel", Style::default().fg(Theme::dim())),
        ]),
    ];

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::warn()))
                .title(" Confirm "),
        );
    frame.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyCode;
    use ratatui::{Terminal, backend::TestBackend};

    use super::draw;
    use crate::app::{App, AppEvent};
    use crate::config::JournalConfig;
    use crate::db;
    use crate::tickets::DemoTicketSource;

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("test terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_every_view() {
        let conn = db::open_in_memory().expect("in-memory db");
        let mut app = App::new(conn, JournalConfig::default(), Arc::new(DemoTicketSource::new()));

        assert!(rendered(&app).contains("No entries for this day"));
        for key in ['n', 'x'] {
            app.update(AppEvent::KeyPress(KeyCode::Char(key)));
        }
        assert!(rendered(&app).contains("New entry"));
        app.update(AppEvent::KeyPress(KeyCode::Esc));
        for (key, expected) in [('r', "Nothing logged"), ('c', "Projects"), ('?', "Key bindings")] {
            app.update(AppEvent::KeyPress(KeyCode::Char(key)));
            assert!(rendered(&app).contains(expected), "view for '{key}'");
        }
    }
}
