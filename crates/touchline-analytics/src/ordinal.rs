//! English ordinal numbers for rank labels.

/// Returns the English ordinal suffix for `n`.
///
/// Numbers ending in 11, 12 or 13 always take "th".
///
/// # Examples
///
/// ```
/// use touchline_analytics::ordinal;
///
/// assert_eq!(ordinal::suffix(1), "st");
/// assert_eq!(ordinal::suffix(12), "th");
/// assert_eq!(ordinal::suffix(23), "rd");
/// ```
#[must_use]
pub const fn suffix(n: u64) -> &'static str {
    match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    }
}

/// Formats `n` followed by its ordinal suffix, e.g. `"2nd"`.
///
/// ```
/// use touchline_analytics::ordinal;
///
/// assert_eq!(ordinal::with_suffix(2), "2nd");
/// assert_eq!(ordinal::with_suffix(111), "111th");
/// ```
#[must_use]
pub fn with_suffix(n: u64) -> String {
    format!("{n}{}", suffix(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        let formatted = (0..=5).map(with_suffix).collect::<Vec<_>>();
        assert_eq!(formatted, ["0th", "1st", "2nd", "3rd", "4th", "5th"]);
    }

    #[test]
    fn test_teens_take_th() {
        for n in [11, 12, 13, 111, 112, 113, 1011] {
            assert_eq!(suffix(n), "th", "n = {n}");
        }
    }

    #[test]
    fn test_tens_follow_last_digit() {
        assert_eq!(with_suffix(21), "21st");
        assert_eq!(with_suffix(22), "22nd");
        assert_eq!(with_suffix(23), "23rd");
        assert_eq!(with_suffix(101), "101st");
        assert_eq!(with_suffix(1002), "1002nd");
    }
}
