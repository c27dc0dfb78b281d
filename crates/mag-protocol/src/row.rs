//! Typed row decoding
//!
//! A record is split on a single fixed delimiter, left to right, with no
//! quoting or escaping. Each field becomes a [`Cell`]: an integer when the
//! whole field is the canonical decimal form of an `i64`, text otherwise.

use std::fmt;

use crate::error::ProtocolError;
use crate::line::Record;

/// Default field delimiter
pub const DEFAULT_DELIMITER: &str = ",";

/// A single typed value destined for one grid position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    /// Whole-field base-10 integer
    Integer(i64),
    /// Anything else, verbatim
    Text(String),
}

impl Cell {
    /// Returns the integer value, if this is an integer cell
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    /// Returns the text, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Integer(_) => None,
            Cell::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Integer(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Coerce one field into a cell
///
/// `"42"` and `"-7"` are integers. `"+5"`, `"007"`, `" 3"`, `"1.5"`, `""` and
/// values outside the `i64` range are kept as text, unchanged.
pub fn decode_field(field: &str) -> Cell {
    match field.parse::<i64>() {
        Ok(v) if v.to_string() == field => Cell::Integer(v),
        _ => Cell::Text(field.to_string()),
    }
}

/// An ordered sequence of cells decoded from one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Create a row from cells
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// The cells, left to right
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of fields in this row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over the cells
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Consume the row, returning its cells
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

impl From<Vec<Cell>> for Row {
    fn from(cells: Vec<Cell>) -> Self {
        Self::new(cells)
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Splits records into typed rows on a fixed delimiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDecoder {
    delimiter: String,
}

impl RowDecoder {
    /// Create a decoder for the given delimiter
    pub fn new(delimiter: impl Into<String>) -> Result<Self, ProtocolError> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(ProtocolError::EmptyDelimiter);
        }
        Ok(Self { delimiter })
    }

    /// The field delimiter
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Decode a record into a row
    pub fn decode(&self, record: &Record) -> Row {
        self.decode_str(record.as_str())
    }

    /// Decode raw text into a row
    ///
    /// Always yields at least one cell; a line without the delimiter is a
    /// single field.
    pub fn decode_str(&self, text: &str) -> Row {
        text.split(self.delimiter.as_str())
            .map(decode_field)
            .collect::<Vec<_>>()
            .into()
    }

    /// Decode a batch of records, preserving order
    pub fn decode_all<'a, I>(&self, records: I) -> Vec<Row>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().map(|r| self.decode(r)).collect()
    }
}

impl Default for RowDecoder {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_integer_fields() {
        let row = RowDecoder::default().decode_str("1,2,3");
        assert_eq!(
            row.cells(),
            &[Cell::Integer(1), Cell::Integer(2), Cell::Integer(3)]
        );
    }

    #[test]
    fn test_no_delimiter_is_single_field() {
        let row = RowDecoder::default().decode_str("hello");
        assert_eq!(row.cells(), &[text("hello")]);
    }

    #[test]
    fn test_empty_field_is_empty_text() {
        let row = RowDecoder::default().decode_str("1,,3");
        assert_eq!(row.cells(), &[Cell::Integer(1), text(""), Cell::Integer(3)]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_last_field() {
        let row = RowDecoder::default().decode_str("1,2,");
        assert_eq!(row.cells(), &[Cell::Integer(1), Cell::Integer(2), text("")]);
    }

    #[test]
    fn test_empty_record_is_one_empty_field() {
        let row = RowDecoder::default().decode(&Record::new(""));
        assert_eq!(row.cells(), &[text("")]);
    }

    #[test]
    fn test_mixed_fields_kept_verbatim() {
        let row = RowDecoder::default().decode_str("-12,1.5, 7,abc,12abc");
        assert_eq!(
            row.cells(),
            &[
                Cell::Integer(-12),
                text("1.5"),
                text(" 7"),
                text("abc"),
                text("12abc"),
            ]
        );
    }

    #[test]
    fn test_non_canonical_integers_stay_text() {
        assert_eq!(decode_field("+5"), text("+5"));
        assert_eq!(decode_field("007"), text("007"));
        assert_eq!(decode_field("-0"), text("-0"));
        assert_eq!(decode_field("0"), Cell::Integer(0));
    }

    #[test]
    fn test_overflow_stays_text() {
        assert_eq!(
            decode_field("99999999999999999999"),
            text("99999999999999999999")
        );
        assert_eq!(decode_field(&i64::MIN.to_string()), Cell::Integer(i64::MIN));
    }

    #[test]
    fn test_multi_char_delimiter() {
        let decoder = RowDecoder::new("::").unwrap();
        let row = decoder.decode_str("1::a:b::3");
        assert_eq!(row.cells(), &[Cell::Integer(1), text("a:b"), Cell::Integer(3)]);
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        assert_eq!(RowDecoder::new(""), Err(ProtocolError::EmptyDelimiter));
    }

    #[test]
    fn test_decode_all_preserves_order() {
        let records = vec![Record::new("1,a"), Record::new("2,b")];
        let rows = RowDecoder::default().decode_all(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells()[0], Cell::Integer(1));
        assert_eq!(rows[1].cells()[1], text("b"));
    }

    proptest! {
        #[test]
        fn integers_round_trip(v: i64) {
            prop_assert_eq!(decode_field(&v.to_string()), Cell::Integer(v));
        }

        #[test]
        fn coercion_is_exact(s in ".{0,24}") {
            match decode_field(&s) {
                Cell::Integer(v) => prop_assert_eq!(v.to_string(), s),
                Cell::Text(t) => {
                    prop_assert_eq!(&t, &s);
                    prop_assert!(s.parse::<i64>().map_or(true, |v| v.to_string() != s));
                }
            }
        }

        #[test]
        fn field_count_is_delimiters_plus_one(s in "[0-9a-z,]{0,32}") {
            let row = RowDecoder::default().decode_str(&s);
            prop_assert_eq!(row.len(), s.matches(',').count() + 1);
        }
    }
}
