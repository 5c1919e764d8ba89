use indexmap::IndexMap;
use serde_json::Value;

use crate::model::record::Record;

/// Parse comma-delimited text into records.
///
/// The first non-blank line is the header row; each later non-blank line is
/// zipped against it in order. Lines with fewer cells than the header are
/// padded with empty strings; extra cells are dropped. Blank lines anywhere
/// are skipped and never produce empty records.
pub fn parse_csv(text: &str) -> Vec<Record> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header = match lines.next() {
        Some(line) => parse_line(line),
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    for line in lines {
        let cells = parse_line(line);
        let mut fields = IndexMap::with_capacity(header.len());
        for (i, name) in header.iter().enumerate() {
            let value = cells.get(i).cloned().unwrap_or_default();
            fields.insert(name.clone(), Value::String(value));
        }
        records.push(Record { fields });
    }
    records
}

/// Tokenize one line into cells with a single-pass quote-aware scanner.
///
/// A doubled quote inside a quoted field is a literal quote; any other quote
/// ends the quoted run. An unterminated quote is closed implicitly at end of
/// line rather than rejected. Every cell is trimmed after tokenizing.
fn parse_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cur = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cur.push(ch);
            }
        } else {
            match ch {
                ',' => {
                    cells.push(cur.trim().to_string());
                    cur.clear();
                }
                '"' => in_quotes = true,
                _ => cur.push(ch),
            }
        }
    }
    cells.push(cur.trim().to_string());
    cells
}

/// Serialize records to CSV with the given column order. Every cell is
/// quoted with internal quotes doubled; the header row comes first.
pub fn serialize_csv<'a, I>(records: I, columns: &[&str]) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut rows = Vec::new();
    rows.push(
        columns
            .iter()
            .map(|c| quote_cell(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        rows.push(
            columns
                .iter()
                .map(|c| quote_cell(&record.text(c)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    rows.join("\n")
}

fn quote_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::field;
    use pretty_assertions::assert_eq;

    fn get<'a>(records: &'a [Record], i: usize, key: &str) -> String {
        records[i].text(key).into_owned()
    }

    // --- Basic parsing ---

    #[test]
    fn parses_header_and_rows() {
        let records = parse_csv("ClashID,Status\nC-0001,Open\nC-0002,Resolved\n");
        assert_eq!(records.len(), 2);
        assert_eq!(get(&records, 0, field::CLASH_ID), "C-0001");
        assert_eq!(get(&records, 1, field::STATUS), "Resolved");
    }

    #[test]
    fn handles_crlf_newlines() {
        let records = parse_csv("ClashID,Status\r\nC-0001,Open\r\n");
        assert_eq!(records.len(), 1);
        assert_eq!(get(&records, 0, field::STATUS), "Open");
    }

    #[test]
    fn skips_leading_and_embedded_blank_lines() {
        let records = parse_csv("\n\nClashID,Status\n\nC-0001,Open\n\n\nC-0002,Open\n");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\n  \n").is_empty());
    }

    #[test]
    fn header_only_yields_no_records() {
        assert!(parse_csv("ClashID,Status\n").is_empty());
    }

    // --- Quoting ---

    #[test]
    fn quoted_cell_keeps_commas() {
        let records = parse_csv("ClashID,Notes\nC-0001,\"beam, duct\"\n");
        assert_eq!(get(&records, 0, field::NOTES), "beam, duct");
    }

    #[test]
    fn doubled_quote_is_literal() {
        let records = parse_csv("ClashID,Notes\nC-0001,\"say \"\"hi\"\"\"\n");
        assert_eq!(get(&records, 0, field::NOTES), "say \"hi\"");
    }

    #[test]
    fn unterminated_quote_closes_at_eol() {
        let records = parse_csv("ClashID,Notes\nC-0001,\"dangling, text\n");
        assert_eq!(get(&records, 0, field::NOTES), "dangling, text");
    }

    #[test]
    fn cells_are_trimmed_quoted_or_not() {
        let records = parse_csv("ClashID,Notes\n  C-0001  ,\"  padded  \"\n");
        assert_eq!(get(&records, 0, field::CLASH_ID), "C-0001");
        assert_eq!(get(&records, 0, field::NOTES), "padded");
    }

    // --- Ragged rows ---

    #[test]
    fn short_row_is_padded_with_empty() {
        let records = parse_csv("ClashID,Status,Notes\nC-0001,Open\n");
        assert_eq!(get(&records, 0, field::NOTES), "");
    }

    #[test]
    fn extra_cells_are_dropped() {
        let records = parse_csv("ClashID,Status\nC-0001,Open,surplus\n");
        assert_eq!(records[0].fields.len(), 2);
    }

    // --- Serialization ---

    #[test]
    fn serialize_quotes_every_cell() {
        let records = parse_csv("ClashID,Notes\nC-0001,plain\n");
        let out = serialize_csv(&records, &["ClashID", "Notes"]);
        assert_eq!(out, "\"ClashID\",\"Notes\"\n\"C-0001\",\"plain\"");
    }

    #[test]
    fn serialize_doubles_internal_quotes() {
        let mut r = Record::new();
        r.set_text(field::CLASH_ID, "C-0001");
        r.set_text(field::NOTES, "say \"hi\"");
        let out = serialize_csv([&r], &["ClashID", "Notes"]);
        assert_eq!(out, "\"ClashID\",\"Notes\"\n\"C-0001\",\"say \"\"hi\"\"\"");
    }

    // --- Round trip ---

    #[test]
    fn round_trip_with_commas_and_quotes() {
        let source = "ClashID,ModelA,Notes\n\
                      C-0001,Structure.rvt,\"beam, duct\"\n\
                      C-0002,MEP.rvt,\"a \"\"quoted\"\" note\"\n";
        let records = parse_csv(source);
        let out = serialize_csv(&records, &["ClashID", "ModelA", "Notes"]);
        let back = parse_csv(&out);
        assert_eq!(back, records);
    }
}
