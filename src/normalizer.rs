use chrono::NaiveDate;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use crate::csv_handler::{load_csv_file, write_csv_file};
use crate::error::Result;
use crate::record_set::{Cell, RecordSet};

pub const SALES_COLUMN: &str = "Sum of AccountSales";
pub const PAYMENT_REF_COLUMN: &str = "paymentRefOperation";
pub const DATE_COLUMN: &str = "Date";
pub const KEY_COLUMN: &str = "pukReference";

const HEADER_FROM: &str = "MedicationCosts";
const HEADER_TO: &str = "Medication Costs";

/// Key value of the summary row.
const SUMMARY_KEY: &str = "total";

const CURRENCY_SYMBOL: char = '£';
const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";
const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CLEANED_SUFFIX: &str = "_cleaned.csv";

/// Text a missing payment reference turns into once coerced to text.
const MISSING_TEXT: &str = "nan";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$").expect("valid date regex"));

pub fn strip_currency(value: &str) -> String {
    value.replace(CURRENCY_SYMBOL, "")
}

/// Collapses every whitespace run into one space. Edges are not trimmed.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value, " ").into_owned()
}

/// Rewrites a `DD/MM/YYYY` date as `YYYY-MM-DD 00:00:00`, or `None` if the
/// value does not match that format.
pub fn reformat_date(value: &str) -> Option<String> {
    // chrono skips whitespace before numeric fields, so check the shape first.
    if !DATE_SHAPE.is_match(value) {
        return None;
    }
    let date = NaiveDate::parse_from_str(value, INPUT_DATE_FORMAT).ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.format(OUTPUT_DATE_FORMAT).to_string())
}

pub fn normalize_key(value: &str) -> String {
    value.to_uppercase().trim().to_string()
}

/// Applies the cleaning steps, in order, to a loaded record set.
pub fn normalize(mut set: RecordSet) -> Result<RecordSet> {
    set.map_column(SALES_COLUMN, |value| value.map(|v| strip_currency(&v)))?;
    set.map_column(PAYMENT_REF_COLUMN, |value| {
        let text = value.unwrap_or_else(|| MISSING_TEXT.to_string());
        Some(collapse_whitespace(&text))
    })?;
    set.rename_headers(HEADER_FROM, HEADER_TO);

    let mut unparsed_dates = 0;
    set.map_column(DATE_COLUMN, |value| {
        let value = value?;
        let reformatted = reformat_date(&value);
        if reformatted.is_none() {
            trace!("Date '{}' is not in DD/MM/YYYY form. Leaving it empty.", value);
            unparsed_dates += 1;
        }
        reformatted
    })?;
    if unparsed_dates > 0 {
        debug!("{} date values could not be parsed", unparsed_dates);
    }

    let removed = set.retain_rows(KEY_COLUMN, |key| key != Some(SUMMARY_KEY))?;
    debug!("Removed {} summary rows", removed);

    set.map_column(KEY_COLUMN, |value: Cell| value.map(|v| normalize_key(&v)))?;

    // The last row goes regardless of what the summary filter removed.
    if let Some(row) = set.drop_last_row() {
        trace!("Dropped trailing row {:?}", row);
    }
    if set.is_empty() {
        debug!("No rows left after cleaning");
    }

    Ok(set)
}

/// Output path beside the input: the extension is replaced by `_cleaned.csv`.
pub fn output_path(input: &Path) -> PathBuf {
    let mut name: OsString = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(CLEANED_SUFFIX);
    input.with_file_name(name)
}

/// Removes the line terminator left by console input and any surrounding
/// quotation marks.
pub fn strip_quotes(raw: &str) -> &str {
    raw.trim_end_matches(['\r', '\n']).trim_matches('"')
}

/// Cleans the CSV at `input` and returns the path of the written file.
/// Nothing is written unless every step succeeds.
pub fn clean_csv(input: &Path) -> Result<PathBuf> {
    let set = load_csv_file(input)?;
    let cleaned = normalize(set)?;
    let output = output_path(input);
    write_csv_file(&cleaned, &output)?;
    Ok(output)
}
