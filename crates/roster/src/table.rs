//! Tabular roster data.
//!
//! The roster export is CSV: the first record is the header line and every
//! following record is a data row. Rows may be ragged, quotes may appear in
//! odd places, and fields may carry stray whitespace.

use std::collections::HashMap;
use std::io::Read;

use crate::error::Result;

/// Parsed roster with a header row and data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RosterTable {
    /// Parse CSV from any reader. An empty input yields an empty table.
    pub fn parse<R: Read>(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let mut records = reader.byte_records();

        let headers = match records.next() {
            Some(record) => lossy_fields(&record?),
            None => return Ok(Self::default()),
        };

        let mut rows = Vec::new();
        for record in records {
            rows.push(lossy_fields(&record?));
        }

        Ok(Self { headers, rows })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Values at position `index`, skipping rows too short to have one.
    pub fn column(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).cloned())
            .collect()
    }

    /// Values of the first declared column, whatever its header says.
    pub fn first_column(&self) -> Option<Vec<String>> {
        if self.headers.is_empty() {
            None
        } else {
            Some(self.column(0))
        }
    }

    /// Values of the column whose header equals `name`.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<String>> {
        let index = self.position(name)?;
        Some(self.column(index))
    }

    /// Keep only rows whose `name` column equals `value`.
    ///
    /// An unknown column leaves the table unchanged.
    pub fn filter_rows(&self, name: &str, value: &str) -> Self {
        let Some(index) = self.position(name) else {
            tracing::warn!(column = name, "Column not found for filtering");
            return self.clone();
        };

        let rows = self
            .rows
            .iter()
            .filter(|row| row.get(index).is_some_and(|cell| cell == value))
            .cloned()
            .collect();

        Self {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// One header-keyed map per row. Cells past the last header are dropped.
    pub fn to_maps(&self) -> Vec<HashMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row.iter())
                    .map(|(header, cell)| (header.clone(), cell.clone()))
                    .collect()
            })
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

/// Invalid UTF-8 in a cell becomes U+FFFD instead of failing the record.
fn lossy_fields(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers_and_rows() {
        let table = RosterTable::from_bytes(b"email,score\nalice@x.com,10\nbob@y.com,7\n").unwrap();
        assert_eq!(table.headers, vec!["email", "score"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column(0), vec!["alice@x.com", "bob@y.com"]);
        assert_eq!(table.column(1), vec!["10", "7"]);
    }

    #[test]
    fn test_parse_empty_body() {
        let table = RosterTable::from_bytes(b"").unwrap();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
        assert!(table.first_column().is_none());
    }

    #[test]
    fn test_header_only() {
        let table = RosterTable::from_bytes(b"wallet\n").unwrap();
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.first_column(), Some(vec![]));
    }

    #[test]
    fn test_leading_whitespace_trimmed() {
        let table = RosterTable::from_bytes(b"user, note\n  alice@x.com, hi\n").unwrap();
        assert_eq!(table.headers, vec!["user", "note"]);
        assert_eq!(table.column(0), vec!["alice@x.com"]);
        assert_eq!(table.column(1), vec!["hi"]);
    }

    #[test]
    fn test_ragged_rows() {
        let table = RosterTable::from_bytes(b"a,b,c\n1\n2,3,4,5\n").unwrap();
        assert_eq!(table.column(0), vec!["1", "2"]);
        assert_eq!(table.column(2), vec!["4"]);
    }

    #[test]
    fn test_stray_quotes_tolerated() {
        let table = RosterTable::from_bytes(b"user\n'0xabc\nab\"cd\n\"quoted, value\"\n").unwrap();
        assert_eq!(table.column(0), vec!["'0xabc", "ab\"cd", "quoted, value"]);
    }

    #[test]
    fn test_non_utf8_cell_does_not_drop_roster() {
        let table = RosterTable::from_bytes(
            b"wallet,name\n0x7b9e2692aa4b72e325808611d10ca128b8bc8eb6,Ren\xe9\n",
        )
        .unwrap();
        assert_eq!(
            table.first_column(),
            Some(vec!["0x7b9e2692aa4b72e325808611d10ca128b8bc8eb6".to_string()])
        );
        assert_eq!(table.column(1), vec!["Ren\u{FFFD}"]);
    }

    #[test]
    fn test_first_column_is_positional() {
        let table = RosterTable::from_bytes(b"score,email\n10,alice@x.com\n").unwrap();
        assert_eq!(table.first_column(), Some(vec!["10".to_string()]));
        assert_eq!(
            table.column_by_name("email"),
            Some(vec!["alice@x.com".to_string()])
        );
        assert!(table.column_by_name("missing").is_none());
    }

    #[test]
    fn test_filter_rows() {
        let table = RosterTable::from_bytes(b"user,tier\na,gold\nb,silver\nc,gold\n").unwrap();
        let gold = table.filter_rows("tier", "gold");
        assert_eq!(gold.column(0), vec!["a", "c"]);
        assert_eq!(gold.headers, table.headers);

        let unchanged = table.filter_rows("nope", "gold");
        assert_eq!(unchanged, table);
    }

    #[test]
    fn test_to_maps() {
        let table = RosterTable::from_bytes(b"user,tier\na,gold,extra\n").unwrap();
        let maps = table.to_maps();
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].get("user").map(String::as_str), Some("a"));
        assert_eq!(maps[0].get("tier").map(String::as_str), Some("gold"));
        assert_eq!(maps[0].len(), 2);
    }
}
