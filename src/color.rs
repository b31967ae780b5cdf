/// Catalog colors: validation and the palette used when a project or tag is created without one.
use rand::RngExt;

/// Colors of the default project and tag catalogue.
const PALETTE: &[&str] = &[
    "#28a745", "#007bff", "#ffc107", "#17a2b8", "#6c757d", "#e83e8c", "#fd7e14", "#dc3545",
    "#6f42c1", "#20c997", "#0dcaf0", "#198754", "#0d6efd", "#6610f2",
];

/// Validate if a string is a valid hex color (e.g., #RRGGBB).
pub fn is_valid_hex(s: &str) -> bool {
    s.starts_with('#') && s.len() == 7 && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn random_color() -> String {
    let mut rng = rand::rng();
    PALETTE[rng.random_range(0..PALETTE.len())].to_string()
}

#[cfg(test)]
mod tests {
    use super::{PALETTE, is_valid_hex, random_color};

    #[test]
    fn validates_hex_colors() {
        assert!(is_valid_hex("#a1B2c3"));
        assert!(!is_valid_hex("a1b2c3"));
        assert!(!is_valid_hex("#a1b2c"));
        assert!(!is_valid_hex("#gggggg"));
    }

    #[test]
    fn random_colors_come_from_the_palette() {
        assert!(PALETTE.iter().all(|c| is_valid_hex(c)));
        for _ in 0..32 {
            assert!(PALETTE.contains(&random_color().as_str()));
        }
    }
}
