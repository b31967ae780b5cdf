use ratatui::style::{Color, Modifier, Style};

use super::theme::Theme;

pub fn format_hours(hours: f64) -> String {
    let minutes = (hours * 60.0).round().max(0.0) as i64;
    format!("{}h{:02}", minutes / 60, minutes % 60)
}

pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return format!("{value:<width$}", width = width);
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

pub fn hex_to_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#').unwrap_or(value.trim());
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Bold foreground in the catalog color, plain text when the color is not a hex code.
pub fn catalog_style(color: &str) -> Style {
    hex_to_color(color)
        .map(|color| Style::default().fg(color).add_modifier(Modifier::BOLD))
        .unwrap_or_else(|| Style::default().fg(Theme::text()))
}

pub fn marker(selected: bool) -> (&'static str, Style) {
    if selected {
        (
            "> ",
            Style::default()
                .fg(Theme::selection_marker())
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(Theme::dim()))
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::{clamp_name, format_hours, hex_to_color};

    #[test]
    fn formats_hours() {
        assert_eq!(format_hours(2.5), "2h30");
        assert_eq!(format_hours(0.0), "0h00");
        assert_eq!(format_hours(-1.0), "0h00");
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(hex_to_color("#007bff"), Some(Color::Rgb(0, 0x7b, 0xff)));
        assert_eq!(hex_to_color("blue"), None);
        assert_eq!(hex_to_color("#ééé"), None);
    }

    #[test]
    fn clamps_long_names() {
        assert_eq!(clamp_name("Maintenance", 6), "Main..");
        assert_eq!(clamp_name("Socle", 6), "Socle ");
    }
}
