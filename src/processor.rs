use std::sync::Arc;

use crate::address::build_query_address;
use crate::errors::AppResult;
use crate::geocode::{GeocodeOutcome, LocationResolver};
use crate::ingestion::{InputRow, RowSchema};
use crate::matcher::{match_store, MatchOutcome};
use crate::places::NearbySearch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Ok,
    Invalid,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Ok => "OK",
            RowStatus::Invalid => "Invalid",
        }
    }
}

/// The audited row: the untouched input cells plus every appended column.
#[derive(Debug, Clone)]
pub struct OutputRow {
    pub input: InputRow,
    pub query_address: String,
    pub formatted_address: String,
    pub status: RowStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub store_found: bool,
    pub match_label: String,
    pub store_name: String,
    pub store_location: String,
    pub corrected_address: String,
    pub corrected_store_name: String,
    pub address_changed: bool,
}

pub struct RowProcessor {
    resolver: Arc<dyn LocationResolver>,
    nearby: Arc<dyn NearbySearch>,
    schema: RowSchema,
}

impl RowProcessor {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        nearby: Arc<dyn NearbySearch>,
        schema: RowSchema,
    ) -> Self {
        Self {
            resolver,
            nearby,
            schema,
        }
    }

    /// Runs one row through geocoding, nearby search and the store matcher.
    /// Service-reported failures become an `Invalid` row; transport errors
    /// bubble up and end the run.
    pub async fn process(&self, row: InputRow) -> AppResult<OutputRow> {
        let query_address = build_query_address(&row, &self.schema);

        let (latitude, longitude, formatted_address) =
            match self.resolver.resolve(&query_address).await? {
                GeocodeOutcome::Resolved {
                    latitude,
                    longitude,
                    formatted_address,
                } => (latitude, longitude, formatted_address),
                GeocodeOutcome::Invalid => return Ok(invalid_row(row, query_address)),
            };

        let candidates = self.nearby.nearby(latitude, longitude).await?;
        let outcome = match_store(&row, &self.schema, &candidates);

        let address_changed = query_address.to_lowercase() != formatted_address.to_lowercase();
        let corrected_address = if address_changed {
            formatted_address.clone()
        } else {
            String::new()
        };

        let (store_found, match_label, store_name, store_location) = match outcome {
            MatchOutcome::Found {
                label,
                name,
                location,
            } => (true, label, name, location),
            MatchOutcome::NotFound => (false, String::new(), String::new(), String::new()),
        };

        // Only a place-pass hit that disagrees with the row's own name is a
        // correction worth surfacing.
        let own_name = row.field(self.schema.name_hints);
        let corrected_store_name = if store_found && !store_name.eq_ignore_ascii_case(&own_name) {
            store_name.clone()
        } else {
            String::new()
        };

        Ok(OutputRow {
            input: row,
            query_address,
            formatted_address,
            status: RowStatus::Ok,
            latitude: Some(latitude),
            longitude: Some(longitude),
            store_found,
            match_label,
            store_name,
            store_location,
            corrected_address,
            corrected_store_name,
            address_changed,
        })
    }
}

fn invalid_row(input: InputRow, query_address: String) -> OutputRow {
    OutputRow {
        input,
        query_address,
        formatted_address: String::new(),
        status: RowStatus::Invalid,
        latitude: None,
        longitude: None,
        store_found: false,
        match_label: String::new(),
        store_name: String::new(),
        store_location: String::new(),
        corrected_address: String::new(),
        corrected_store_name: String::new(),
        address_changed: true,
    }
}
