//! Shared helpers

pub mod time;

/// Format a count with thousands separators
///
/// # Examples
///
/// ```
/// use samplepulse::util::format_number;
///
/// assert_eq!(format_number(0), "0");
/// assert_eq!(format_number(1234567), "1,234,567");
/// ```
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}
