use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use crate::errors::{AppError, AppResult};

/// Probed in order when no explicit input path is configured.
pub const INPUT_CANDIDATES: &[&str] = &[
    "addresses_template.csv",
    "addresses.csv",
    "addresses_template.xlsx",
    "addresses.xlsx",
];

const SNIFF_DELIMITERS: &[u8] = b",;\t|";

/// One input row: the original `(header, value)` cells in file order.
/// Values are kept verbatim; trimming happens at field access.
#[derive(Debug, Clone)]
pub struct InputRow {
    cells: Vec<(String, String)>,
}

impl InputRow {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(header, _)| header.trim().eq_ignore_ascii_case(name.trim()))
            .map(|(_, value)| value.as_str())
    }

    /// First present alias wins; absent fields read as the empty string.
    pub fn field(&self, aliases: &[&str]) -> String {
        aliases
            .iter()
            .find_map(|alias| self.get(alias))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<InputRow>,
}

/// The field-name alias set a given input file uses. Address fields shift
/// between the hand-maintained template and the ERP export; name hints are
/// shared. Passed explicitly so schema variation stays a configuration concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSchema {
    pub street: &'static [&'static str],
    pub house: &'static [&'static str],
    pub postal_code: &'static [&'static str],
    pub city: &'static [&'static str],
    pub country: &'static [&'static str],
    pub name_hints: &'static [&'static str],
}

pub const TEMPLATE_SCHEMA: RowSchema = RowSchema {
    street: &["Street"],
    house: &["House"],
    postal_code: &["PostalCode"],
    city: &["City"],
    country: &["Country"],
    name_hints: &["Name", "c/o name", "Name 2"],
};

pub const EXPORT_SCHEMA: RowSchema = RowSchema {
    street: &["Street"],
    house: &["House No."],
    postal_code: &["Postl Code"],
    city: &["City"],
    country: &["Cty"],
    name_hints: &["Name", "c/o name", "Name 2"],
};

impl RowSchema {
    pub fn detect(headers: &[String]) -> Self {
        let has = |name: &str| {
            headers
                .iter()
                .any(|header| header.trim().eq_ignore_ascii_case(name))
        };
        if has("Postl Code") || has("House No.") {
            EXPORT_SCHEMA
        } else {
            TEMPLATE_SCHEMA
        }
    }
}

/// Resolves the input file: an explicit override must exist, otherwise the
/// first readable candidate path wins. No input at all is fatal.
pub fn locate_input(explicit: Option<&Path>) -> AppResult<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(AppError::Input(format!(
            "configured input file not found: {}",
            path.display()
        )));
    }

    INPUT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            AppError::Input(format!(
                "no input file found; looked for {}",
                INPUT_CANDIDATES.join(", ")
            ))
        })
}

pub fn load_table(path: &Path) -> AppResult<InputTable> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx") | Some("xls") => load_spreadsheet(path),
        _ => load_delimited(path),
    }
}

fn load_delimited(path: &Path) -> AppResult<InputTable> {
    let contents = fs::read_to_string(path)?;
    let delimiter = sniff_delimiter(&contents);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(assemble_row(&headers, record.iter()));
    }

    Ok(InputTable { headers, rows })
}

fn load_spreadsheet(path: &Path) -> AppResult<InputTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range_at(0).ok_or_else(|| {
        AppError::Input(format!("spreadsheet has no worksheets: {}", path.display()))
    })??;

    let mut cells = range.rows();
    let headers: Vec<String> = cells
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();

    let rows = cells
        .map(|row| {
            let values: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            assemble_row(&headers, values.iter().map(String::as_str))
        })
        .collect();

    Ok(InputTable { headers, rows })
}

fn assemble_row<'a>(headers: &[String], values: impl Iterator<Item = &'a str>) -> InputRow {
    let mut values: Vec<String> = values.map(|value| value.to_string()).collect();
    // Short records read as empty trailing cells.
    values.resize(headers.len(), String::new());
    InputRow::new(headers.iter().cloned().zip(values).collect())
}

fn sniff_delimiter(contents: &str) -> u8 {
    let first_line = contents.lines().next().unwrap_or_default();
    SNIFF_DELIMITERS
        .iter()
        .copied()
        .max_by_key(|delimiter| first_line.matches(*delimiter as char).count())
        .filter(|delimiter| first_line.contains(*delimiter as char))
        .unwrap_or(b',')
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        assert_eq!(sniff_delimiter("Street;House;PostalCode;City"), b';');
        assert_eq!(sniff_delimiter("Street,House,PostalCode,City"), b',');
        assert_eq!(sniff_delimiter("Street\tHouse"), b'\t');
        assert_eq!(sniff_delimiter("SingleColumn"), b',');
    }

    #[test]
    fn loads_delimited_table_and_pads_short_records() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "addresses.csv",
            "Street;House;PostalCode;City;Country\nMainstreet;12;10115;Berlin;Germany\nSidestreet;3;80331\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.headers.len(), 5);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("City"), Some("Berlin"));
        assert_eq!(table.rows[1].get("City"), Some(""));
        assert_eq!(table.rows[1].get("Country"), Some(""));
    }

    #[test]
    fn preserves_non_ascii_cells() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "addresses.csv",
            "Name,Street,House,PostalCode,City,Country\nUnterwäsche Müller,Hauptstraße,7,50667,Köln,Germany\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows[0].get("Name"), Some("Unterwäsche Müller"));
        assert_eq!(table.rows[0].get("Street"), Some("Hauptstraße"));
    }

    #[test]
    fn field_lookup_is_case_insensitive_and_total() {
        let row = InputRow::new(vec![
            ("Street".into(), "  Mainstreet ".into()),
            ("House".into(), "12".into()),
        ]);
        assert_eq!(row.field(&["street"]), "Mainstreet");
        assert_eq!(row.field(&["Postl Code", "PostalCode"]), "");
    }

    #[test]
    fn detects_export_schema_from_headers() {
        let export: Vec<String> = ["Name", "Street", "House No.", "Postl Code", "City", "Cty"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(RowSchema::detect(&export), EXPORT_SCHEMA);

        let template: Vec<String> = ["Street", "House", "PostalCode", "City", "Country"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(RowSchema::detect(&template), TEMPLATE_SCHEMA);
    }

    #[test]
    fn explicit_input_path_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nowhere.csv");
        let err = locate_input(Some(&missing)).unwrap_err();
        assert!(matches!(err, AppError::Input(_)));

        let present = write_file(dir.path(), "addresses.csv", "Street\n");
        assert_eq!(locate_input(Some(&present)).unwrap(), present);
    }
}
