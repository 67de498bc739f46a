use crate::ingestion::{InputRow, RowSchema};

/// Builds the geocoding query string for one row. Total by construction:
/// absent fields render as empty strings and the surrounding punctuation is
/// kept as-is, matching what the geocoder has always been sent.
pub fn build_query_address(row: &InputRow, schema: &RowSchema) -> String {
    let street = row.field(schema.street);
    let house = row.field(schema.house);
    let postal_code = row.field(schema.postal_code);
    let city = row.field(schema.city);
    let country = row.field(schema.country);
    format!("{street} {house}, {postal_code} {city}, {country}")
}
