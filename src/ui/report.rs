use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{catalog_style, clamp_name, format_hours};
use super::theme::Theme;
use crate::app::{App, ReportRange};
use crate::report::bar;

const BAR_WIDTH: usize = 24;

fn heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Theme::primary())
            .add_modifier(Modifier::BOLD),
    ))
}

pub fn build_report_text(app: &App) -> Text<'_> {
    let Some(report) = &app.report else {
        return Text::from(app.status.as_deref().unwrap_or("No report loaded."));
    };
    let range = match app.report_range {
        ReportRange::Week => "Week",
        ReportRange::Month => "Month",
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{range} {} .. {}", report.period_start, report.period_end),
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Entries ", Style::default().fg(Theme::dim())),
            Span::styled(report.total_entries.to_string(), Style::default().fg(Theme::accent())),
            Span::styled("   Total ", Style::default().fg(Theme::dim())),
            Span::styled(format_hours(report.total_hours), Style::default().fg(Theme::accent())),
            Span::styled("   Per active day ", Style::default().fg(Theme::dim())),
            Span::styled(
                format_hours(report.average_hours_per_day),
                Style::default().fg(Theme::accent()),
            ),
        ]),
        Line::from(""),
    ];

    if report.total_entries == 0 {
        lines.push(Line::from(Span::styled(
            "Nothing logged in this period.",
            Style::default().fg(Theme::dim()),
        )));
        return Text::from(lines);
    }

    lines.push(heading("Projects"));
    for project in &report.project_bars {
        let style = catalog_style(&project.color);
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", clamp_name(&project.name, 14)), style),
            Span::styled(bar(project.fraction, BAR_WIDTH), style),
            Span::styled(
                format!(" {:>6} {:>3.0}%", format_hours(project.hours), project.fraction * 100.0),
                Style::default().fg(Theme::accent()),
            ),
            Span::styled(format!("  {} entries", project.entries), Style::default().fg(Theme::dim())),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(heading("Activity types"));
    for (name, count) in &report.activity_types {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", clamp_name(name, 14)), Style::default().fg(Theme::text())),
            Span::styled(count.to_string(), Style::default().fg(Theme::accent())),
        ]));
    }

    if !report.tag_cloud.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Tags"));
        let mut spans = vec![Span::raw("  ")];
        for tag in &report.tag_cloud {
            // The terminal has no font sizes: the strongest tags are bold.
            let mut style = catalog_style(&tag.color);
            if tag.emphasis < 14.0 {
                style = style.remove_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!("#{}({}) ", tag.name, tag.count), style));
        }
        lines.push(Line::from(spans));
    }

    if report.monthly.len() > 1 {
        lines.push(Line::from(""));
        lines.push(heading("Months"));
        for month in &report.monthly {
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", month.month), Style::default().fg(Theme::text())),
                Span::styled(bar(month.fraction, BAR_WIDTH), Style::default().fg(Theme::secondary())),
                Span::styled(
                    format!(" {:>6}  {} entries", format_hours(month.hours), month.entries),
                    Style::default().fg(Theme::accent()),
                ),
            ]));
        }
    }

    Text::from(lines)
}
