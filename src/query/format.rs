//! Display formatting for counter values.

/// Placeholder shown when a counter was not reported.
pub const PLACEHOLDER: &str = "-";

/// Render a counter for display: unreported becomes the placeholder dash,
/// reported values get digits grouped in threes with `.` separators, the
/// Brazilian convention (`1234567` → `"1.234.567"`).
pub fn format_count(value: Option<u64>) -> String {
    let Some(value) = value else {
        return PLACEHOLDER.to_string();
    };
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_a_dash() {
        assert_eq!(format_count(None), "-");
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(format_count(Some(0)), "0");
    }

    #[test]
    fn groups_of_three_from_the_right() {
        assert_eq!(format_count(Some(7)), "7");
        assert_eq!(format_count(Some(100)), "100");
        assert_eq!(format_count(Some(1000)), "1.000");
        assert_eq!(format_count(Some(72597)), "72.597");
        assert_eq!(format_count(Some(1234567)), "1.234.567");
    }
}
