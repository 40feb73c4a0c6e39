use log::{debug, warn};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use crate::error::{NormalizeError, Result};
use crate::record_set::{Cell, RecordSet};

/// Field values read as missing, in addition to the empty field.
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn to_cell(field: &str) -> Cell {
    if field.is_empty() || MISSING_TOKENS.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

/// Loads a record set from the CSV file at `path`.
pub fn load_csv_file(path: &Path) -> Result<RecordSet> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => NormalizeError::FileNotFound(path.to_path_buf()),
        _ => NormalizeError::Io(e),
    })?;
    let set = read_records(file)?;
    debug!("Loaded {} rows with columns {:?} from {}", set.len(), set.headers(), path.display());
    Ok(set)
}

/// Parses CSV content with a header row. Fields are kept verbatim; empty
/// fields and the usual NA spellings become missing values.
pub fn read_records<R: Read>(input: R) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| if i == 0 { name.trim_start_matches('\u{feff}') } else { name })
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(NormalizeError::EmptyInput);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() > headers.len() {
            return Err(NormalizeError::MalformedRow {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }
        let mut row: Vec<Cell> = record
            .iter()
            .map(to_cell)
            .collect();
        if row.len() < headers.len() {
            warn!("Line {} has {} of {} fields. Missing fields are left empty.", line, row.len(), headers.len());
            row.resize(headers.len(), None);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(NormalizeError::EmptyInput);
    }
    Ok(RecordSet::new(headers, rows))
}

/// Writes the record set to `path` as CSV, header included, no index column.
pub fn write_csv_file(set: &RecordSet, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_records(set, file)?;
    debug!("Wrote {} rows to {}", set.len(), path.display());
    Ok(())
}

pub fn write_records<W: Write>(set: &RecordSet, output: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(output);
    writer.write_record(set.headers())?;
    for row in set.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_read_keeps_whitespace_and_marks_missing() {
        let input = "pukReference,Date\n  ab1 ,\n total,05/03/2024\n";
        let set = read_records(input.as_bytes()).unwrap();

        assert_eq!(set.headers(), ["pukReference", "Date"]);
        assert_eq!(set.rows()[0], vec![Some("  ab1 ".to_string()), None]);
        assert_eq!(set.rows()[1], vec![Some(" total".to_string()), Some("05/03/2024".to_string())]);
    }

    #[test]
    fn test_read_na_tokens_as_missing() {
        let input = "pukReference,Date,Note\nNA,null,N/A\n NA,nan ,Na\n";
        let set = read_records(input.as_bytes()).unwrap();

        assert_eq!(set.rows()[0], vec![None, None, None]);
        // Only exact spellings count, surrounding whitespace keeps the value.
        assert_eq!(
            set.rows()[1],
            vec![Some(" NA".to_string()), Some("nan ".to_string()), Some("Na".to_string())]
        );
    }

    #[test]
    fn test_read_strips_bom() {
        let input = "\u{feff}pukReference,Date\nab1,05/03/2024\n";
        let set = read_records(input.as_bytes()).unwrap();
        assert_eq!(set.column_index("pukReference").unwrap(), 0);
    }

    #[test]
    fn test_read_pads_short_rows() {
        let input = "a,b,c\n1,2\n";
        let set = read_records(input.as_bytes()).unwrap();
        assert_eq!(set.rows()[0], vec![Some("1".to_string()), Some("2".to_string()), None]);
    }

    #[test]
    fn test_read_rejects_long_rows() {
        let input = "a,b\n1,2\n1,2,3\n";
        match read_records(input.as_bytes()) {
            Err(NormalizeError::MalformedRow { line, expected, found }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_empty_and_header_only() {
        let empty = read_records("".as_bytes()).unwrap_err();
        assert_eq!(empty.kind(), ErrorKind::EmptyInput);

        let header_only = read_records("a,b\n".as_bytes()).unwrap_err();
        assert_eq!(header_only.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv_file(&dir.path().join("absent.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }

    #[test]
    fn test_write_quotes_and_missing_values() {
        let set = RecordSet::new(
            vec!["Medication Costs".to_string(), "Note".to_string()],
            vec![vec![Some("1,200.00".to_string()), None]],
        );
        let mut output = Vec::new();
        write_records(&set, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Medication Costs,Note\n\"1,200.00\",\n");
    }
}
