pub mod address;
pub mod config;
pub mod errors;
pub mod geocode;
pub mod ingestion;
pub mod matcher;
pub mod output;
pub mod places;
pub mod processor;
pub mod runner;

use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use address::build_query_address;
pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use geocode::{GeocodeOutcome, HttpGeocodeClient, LocationResolver};
pub use ingestion::{load_table, locate_input, InputRow, InputTable, RowSchema};
pub use matcher::{match_store, MatchOutcome};
pub use output::write_output;
pub use places::{HttpNearbyClient, NearbySearch, PlaceCandidate};
pub use processor::{OutputRow, RowProcessor, RowStatus};
pub use runner::{BatchReport, BatchRunner, BatchStats};

pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    let _ = INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,address_auditor=debug"));
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}
