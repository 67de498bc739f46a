use std::fs;
use std::path::Path;

use crate::errors::AppResult;
use crate::processor::OutputRow;
use crate::runner::BatchReport;

/// Audit columns appended after the original input columns, in this order.
pub const APPENDED_COLUMNS: &[&str] = &[
    "Query Address",
    "Formatted Address",
    "Status",
    "Lat",
    "Lng",
    "StoreFound",
    "MatchLevel",
    "StoreName",
    "StoreVicinity",
    "Corrected Address",
    "Corrected Store Name",
    "Changes",
];

/// Writes the augmented table as UTF-8 comma-delimited text, one output row
/// per input row in input order.
pub fn write_output(path: &Path, report: &BatchReport) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = report.headers.iter().map(String::as_str).collect();
    header.extend_from_slice(APPENDED_COLUMNS);
    writer.write_record(&header)?;

    for row in &report.rows {
        writer.write_record(render_row(row))?;
    }

    writer.flush()?;
    Ok(())
}

fn render_row(row: &OutputRow) -> Vec<String> {
    let mut record: Vec<String> = row
        .input
        .cells()
        .iter()
        .map(|(_, value)| value.clone())
        .collect();

    record.push(row.query_address.clone());
    record.push(row.formatted_address.clone());
    record.push(row.status.as_str().to_string());
    record.push(render_coordinate(row.latitude));
    record.push(render_coordinate(row.longitude));
    record.push(if row.store_found { "YES" } else { "NO" }.to_string());
    record.push(row.match_label.clone());
    record.push(row.store_name.clone());
    record.push(row.store_location.clone());
    record.push(row.corrected_address.clone());
    record.push(row.corrected_store_name.clone());
    record.push(if row.address_changed { "yes" } else { "no" }.to_string());
    record
}

fn render_coordinate(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::ingestion::InputRow;
    use crate::processor::RowStatus;
    use crate::runner::BatchStats;

    use super::*;

    fn sample_report() -> BatchReport {
        let input = InputRow::new(vec![
            ("Street".into(), "Mainstreet".into()),
            ("House".into(), "12".into()),
            ("City".into(), "Berlin".into()),
        ]);
        let row = OutputRow {
            input,
            query_address: "Mainstreet 12, 10115 Berlin, Germany".into(),
            formatted_address: "Mainstreet 12, 10115 Berlin, Germany".into(),
            status: RowStatus::Ok,
            latitude: Some(52.53),
            longitude: Some(13.38),
            store_found: true,
            match_label: "Lingerie".into(),
            store_name: "Dessous Boutique".into(),
            store_location: "Mainstreet 10".into(),
            corrected_address: String::new(),
            corrected_store_name: "Dessous Boutique".into(),
            address_changed: false,
        };
        BatchReport {
            headers: vec!["Street".into(), "House".into(), "City".into()],
            rows: vec![row],
            stats: BatchStats {
                total_rows: 1,
                resolved: 1,
                invalid: 0,
                stores_found: 1,
            },
        }
    }

    #[test]
    fn appends_audit_columns_after_input_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.csv");
        write_output(&path, &sample_report()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Street,House,City,Query Address"));
        assert!(header.ends_with("Corrected Store Name,Changes"));

        let row = lines.next().unwrap();
        assert!(row.contains("Dessous Boutique"));
        assert!(row.contains("52.53"));
        assert!(row.contains("YES"));
        assert!(row.ends_with("no"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("output.csv");
        write_output(&path, &sample_report()).unwrap();
        assert!(path.is_file());
    }
}
