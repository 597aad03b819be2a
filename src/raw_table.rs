use std::collections::HashMap;

use csv::{ReaderBuilder, Trim};

/// One CSV data row keyed by header text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// `None` only when the column is absent; a blank cell is `Some("")`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// Short rows keep only the columns they carry, so trailing fields read as absent.
pub fn parse_csv(text: &str) -> Result<RawTable, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = RawRow::from_pairs(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, cell)| (h.clone(), cell.to_string())),
        );
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::parse_csv;

    #[test]
    fn parses_header_keyed_rows_in_order() {
        let raw = "Season_End_Year,Home,Away\n1993,Arsenal,Norwich City\n1993,Chelsea,Oldham\n";
        let table = parse_csv(raw).expect("csv should parse");
        assert_eq!(table.headers, vec!["Season_End_Year", "Home", "Away"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("Home"), Some("Arsenal"));
        assert_eq!(table.rows[1].get("Away"), Some("Oldham"));
    }

    #[test]
    fn short_rows_leave_trailing_columns_absent() {
        let raw = "Name,Minutes Played\nShearer,\"3,240\"\nCole\n";
        let table = parse_csv(raw).expect("csv should parse");
        assert_eq!(table.rows[0].get("Minutes Played"), Some("3,240"));
        assert_eq!(table.rows[1].get("Minutes Played"), None);
    }

    #[test]
    fn blank_cells_keep_their_row() {
        let raw = "Year,Name\n2001,Henry\n,\n\n2002,Shearer\n";
        let table = parse_csv(raw).expect("csv should parse");
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1].get("Year"), Some(""));
        assert_eq!(table.rows[2].get("Name"), Some("Shearer"));
        assert!(table.has_column("Year"));
    }
}
