//! Input mask for the `HH:MM-HH:MM` time-range field.

/// Longest value the mask can produce: `HH:MM-HH:MM`.
pub const MAX_LEN: usize = 11;

const CLOCK_DIGITS: usize = 4;

/// Normalizes whatever the field currently holds into a prefix of `HH:MM-HH:MM`.
///
/// Only the digit stream is consulted, so separators typed, pasted or deleted by the user
/// never change the outcome. Digits past the eighth are dropped.
pub fn mask_time_range(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= CLOCK_DIGITS {
        return mask_clock(&digits);
    }

    let (start, rest) = digits.split_at(CLOCK_DIGITS);
    let end = &rest[..rest.len().min(CLOCK_DIGITS)];
    let mut masked = mask_clock(start);
    masked.push('-');
    masked.push_str(&mask_clock(end));
    masked.truncate(MAX_LEN);
    masked
}

/// `HHMM` prefix to `HH:MM` prefix; the colon appears once a third digit exists.
fn mask_clock(digits: &[char]) -> String {
    let mut clock = String::with_capacity(5);
    for (index, digit) in digits.iter().enumerate() {
        if index == 2 {
            clock.push(':');
        }
        clock.push(*digit);
    }
    clock
}

#[cfg(test)]
mod tests {
    use super::{MAX_LEN, mask_time_range};

    #[test]
    fn formats_start_time_progressively() {
        assert_eq!(mask_time_range(""), "");
        assert_eq!(mask_time_range("1"), "1");
        assert_eq!(mask_time_range("14"), "14");
        assert_eq!(mask_time_range("143"), "14:3");
        assert_eq!(mask_time_range("1430"), "14:30");
    }

    #[test]
    fn formats_end_time_after_fourth_digit() {
        assert_eq!(mask_time_range("14301"), "14:30-1");
        assert_eq!(mask_time_range("143016"), "14:30-16");
        assert_eq!(mask_time_range("1430163"), "14:30-16:3");
        assert_eq!(mask_time_range("14301630"), "14:30-16:30");
    }

    #[test]
    fn truncates_digits_past_the_end_time() {
        assert_eq!(mask_time_range("143016309999"), "14:30-16:30");
    }

    #[test]
    fn ignores_separators_and_noise() {
        assert_eq!(mask_time_range("14:30-16:30"), "14:30-16:30");
        assert_eq!(mask_time_range("14h30 to 16h30"), "14:30-16:30");
        assert_eq!(mask_time_range("ab:-c"), "");
        assert_eq!(mask_time_range("1:4:3:0"), "14:30");
    }

    #[test]
    fn backspace_over_separator_keeps_a_valid_prefix() {
        // "14:30-1" with the trailing digit deleted
        assert_eq!(mask_time_range("14:30-"), "14:30");
        // "14:3" with the digit deleted leaves a dangling colon
        assert_eq!(mask_time_range("14:"), "14");
    }

    #[test]
    fn mid_string_edit_reflows_digits() {
        // cursor after "14:" and a "2" typed
        assert_eq!(mask_time_range("14:230-16:30"), "14:23-01:63");
    }

    #[test]
    fn masked_output_is_bounded_clean_and_idempotent() {
        let mut seed: u64 = 0x5eed;
        for len in 0..=12 {
            for _ in 0..200 {
                let digits: String = (0..len)
                    .map(|_| {
                        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                        char::from(b'0' + ((seed >> 33) % 10) as u8)
                    })
                    .collect();
                let masked = mask_time_range(&digits);
                assert!(masked.len() <= MAX_LEN, "{digits} -> {masked}");
                assert!(
                    masked.chars().all(|c| c.is_ascii_digit() || c == ':' || c == '-'),
                    "{digits} -> {masked}"
                );
                assert_eq!(mask_time_range(&masked), masked, "not a fixed point for {digits}");
            }
        }
    }
}
