mod recording;

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::info;

pub use recording::{record_duration, record_error, record_rows_processed, record_run};

/// Installs the process-wide recorder and its Prometheus scrape listener.
///
/// One recorder per process, installed once at startup; counters live for the
/// process lifetime and there is no teardown. The listener serves the text
/// exposition format on `addr`.
pub fn install(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    recording::register_metrics();

    info!("Prometheus exporter listening on {addr}");

    Ok(())
}
