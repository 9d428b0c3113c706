use csv::ReaderBuilder;

use crate::config::CsvConfig;
use crate::error::{ConvertError, Result};

/// One CSV record: header name to cell, in column order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Parse CSV text with a header row into records.
///
/// Short rows only carry the columns they have; extra cells beyond the
/// header are ignored. Blank lines are skipped.
pub fn parse_records(text: &str, config: &CsvConfig) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(config.delimiter_byte())
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields = headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        records.push(Record::new(fields));
    }
    Ok(records)
}

/// Render records as a pipe table. Columns come from the first record.
pub fn records_to_markdown(records: &[Record]) -> Result<String> {
    let first = records.first().ok_or(ConvertError::EmptyInput("CSV rows"))?;
    let headers: Vec<&str> = first.columns().collect();

    let mut markdown = format!("| {} |\n", headers.join(" | "));
    markdown.push_str(&format!(
        "| {} |\n",
        headers.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
    ));

    for record in records {
        let cells: Vec<&str> = headers
            .iter()
            .map(|header| record.get(header).unwrap_or(""))
            .collect();
        markdown.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    Ok(markdown)
}

/// Convert CSV text (with a header row) to a Markdown table.
pub fn csv_to_markdown(text: &str, config: &CsvConfig) -> Result<String> {
    let records = parse_records(text, config)?;
    tracing::debug!(rows = records.len(), "parsed CSV records");
    records_to_markdown(&records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        Record::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn renders_table_with_empty_cell() {
        let records = vec![
            record(&[("a", "1"), ("b", "2")]),
            record(&[("a", "3"), ("b", "")]),
        ];
        assert_eq!(
            records_to_markdown(&records).unwrap(),
            "| a | b |\n| --- | --- |\n| 1 | 2 |\n| 3 |  |\n"
        );
    }

    #[test]
    fn missing_cells_render_empty() {
        let records = vec![record(&[("a", "1"), ("b", "2")]), record(&[("a", "3")])];
        assert_eq!(
            records_to_markdown(&records).unwrap(),
            "| a | b |\n| --- | --- |\n| 1 | 2 |\n| 3 |  |\n"
        );
    }

    #[test]
    fn no_records_is_empty_input() {
        let err = records_to_markdown(&[]).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyInput(_)));
    }

    #[test]
    fn csv_text_end_to_end() {
        let markdown = csv_to_markdown("name,age\nAda,36\nLinus,\n", &CsvConfig::default()).unwrap();
        assert_eq!(
            markdown,
            "| name | age |\n| --- | --- |\n| Ada | 36 |\n| Linus |  |\n"
        );
    }

    #[test]
    fn header_only_csv_is_empty_input() {
        let err = csv_to_markdown("a,b\n", &CsvConfig::default()).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyInput(_)));
    }

    #[test]
    fn short_rows_and_custom_delimiter() {
        let config = CsvConfig {
            delimiter: ";".to_string(),
        };
        let records = parse_records("x;y\n1\n2;3\n", &config).unwrap();
        assert_eq!(records[0].get("x"), Some("1"));
        assert_eq!(records[0].get("y"), None);
        assert_eq!(records[1].get("y"), Some("3"));
    }

    #[test]
    fn quoted_fields_are_unwrapped() {
        let records = parse_records("q\n\"a, b\"\n", &CsvConfig::default()).unwrap();
        assert_eq!(records[0].get("q"), Some("a, b"));
    }
}
