use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use address_auditor::{
    init_tracing, load_table, locate_input, write_output, AppConfig, BatchRunner,
    HttpGeocodeClient, HttpNearbyClient, RowProcessor, RowSchema,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    let input_path = locate_input(config.input_path.as_deref())?;
    let table = load_table(&input_path)?;
    let schema = RowSchema::detect(&table.headers);
    info!(
        input = %input_path.display(),
        rows = table.rows.len(),
        "loaded address table"
    );

    let resolver = Arc::new(HttpGeocodeClient::new(&config)?);
    let nearby = Arc::new(HttpNearbyClient::new(&config)?);
    let processor = RowProcessor::new(resolver, nearby, schema);
    let runner = BatchRunner::new(processor, Duration::from_millis(config.throttle_ms));

    let report = runner.run(table).await?;
    write_output(&config.output_path, &report)?;

    info!(
        output = %config.output_path.display(),
        total = report.stats.total_rows,
        resolved = report.stats.resolved,
        invalid = report.stats.invalid,
        stores_found = report.stats.stores_found,
        "run complete"
    );
    Ok(())
}
