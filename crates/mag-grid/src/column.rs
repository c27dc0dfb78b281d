//! Spreadsheet column letters
//!
//! Columns are numbered from 1 and named in bijective base 26:
//! `1 → A`, `26 → Z`, `27 → AA`, `702 → ZZ`, `703 → AAA`, `16384 → XFD`.

/// Widest sheet supported (column XFD)
pub const MAX_COLUMNS: u32 = 16_384;

/// Tallest sheet supported
pub const MAX_ROWS: u32 = 1_048_576;

/// Letters for a 1-based column number
///
/// Column 0 has no name and yields an empty string.
pub fn column_name(column: u32) -> String {
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// 1-based column number for letters (case-insensitive)
///
/// Returns `None` for empty input, non-letters, or columns past [`MAX_COLUMNS`].
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut n: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        n = n.checked_mul(26)?.checked_add(digit)?;
        if n > MAX_COLUMNS {
            return None;
        }
    }
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_names() {
        assert_eq!(column_name(1), "A");
        assert_eq!(column_name(5), "E");
        assert_eq!(column_name(26), "Z");
        assert_eq!(column_name(27), "AA");
        assert_eq!(column_name(52), "AZ");
        assert_eq!(column_name(702), "ZZ");
        assert_eq!(column_name(703), "AAA");
        assert_eq!(column_name(MAX_COLUMNS), "XFD");
        assert_eq!(column_name(0), "");
    }

    #[test]
    fn test_parse_letters() {
        assert_eq!(column_index("G"), Some(7));
        assert_eq!(column_index("h"), Some(8));
        assert_eq!(column_index("XFD"), Some(MAX_COLUMNS));
        assert_eq!(column_index("XFE"), None);
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
    }

    proptest! {
        #[test]
        fn names_round_trip(column in 1u32..=MAX_COLUMNS) {
            prop_assert_eq!(column_index(&column_name(column)), Some(column));
        }

        #[test]
        fn names_are_ordered(column in 1u32..MAX_COLUMNS) {
            let a = column_name(column);
            let b = column_name(column + 1);
            prop_assert!(a.len() < b.len() || (a.len() == b.len() && a < b));
        }
    }
}
