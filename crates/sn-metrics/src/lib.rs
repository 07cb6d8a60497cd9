use std::env;
use std::sync::OnceLock;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const RECOMMENDATIONS_TOTAL: &str = "sn_recommendations_total";
pub const RECOMMENDATION_RESULTS: &str = "sn_recommendation_results";
pub const RECOMMENDATION_ERRORS_TOTAL: &str = "sn_recommendation_errors_total";

fn resolve_port(raw: Option<String>, default_port: u16) -> u16 {
    raw.and_then(|raw| raw.trim().parse::<u16>().ok())
        .unwrap_or(default_port)
}

/// Install the global recorder and serve `/metrics` on `0.0.0.0:<port>`.
///
/// The port comes from `port_env`, falling back to `default_port`. Must be
/// called from inside a tokio runtime; later calls return the first handle.
pub fn init_metrics(port_env: &str, default_port: u16) -> Option<&'static PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing);
    }

    let port = resolve_port(env::var(port_env).ok(), default_port);
    let (recorder, exporter) = match PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .build()
    {
        Ok(parts) => parts,
        Err(err) => {
            warn!(error = %err, metrics_port = port, "failed to build prometheus exporter");
            return None;
        }
    };

    let handle = recorder.handle();
    if let Err(err) = metrics::set_global_recorder(recorder) {
        warn!(error = %err, "metrics recorder already installed");
        return None;
    }
    tokio::spawn(async move {
        if let Err(err) = exporter.await {
            warn!(error = ?err, "prometheus exporter stopped");
        }
    });

    let _ = PROMETHEUS_HANDLE.set(handle);
    info!(metrics_port = port, "started prometheus exporter");
    PROMETHEUS_HANDLE.get()
}

/// Count a served ranking and how many results it returned.
pub fn record_ranking(kind: &'static str, returned: usize) {
    counter!(RECOMMENDATIONS_TOTAL, "kind" => kind).increment(1);
    histogram!(RECOMMENDATION_RESULTS, "kind" => kind).record(returned as f64);
}

pub fn record_ranking_error(kind: &'static str) {
    counter!(RECOMMENDATION_ERRORS_TOTAL, "kind" => kind).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_falls_back_on_missing_or_invalid_values() {
        assert_eq!(resolve_port(None, 9100), 9100);
        assert_eq!(resolve_port(Some("not-a-port".into()), 9100), 9100);
        assert_eq!(resolve_port(Some(" 9300 ".into()), 9100), 9300);
    }

    #[test]
    fn recording_without_a_recorder_is_a_no_op() {
        record_ranking("friends", 3);
        record_ranking_error("jobs");
    }
}
