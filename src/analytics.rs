//! Model performance summary for the analytics page.

use serde::Serialize;
use tracing::warn;

use crate::gesture::display_name;
use crate::service::api::GestureApi;
use crate::service::types::ModelMetrics;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyRow {
    pub label: String,
    pub display_name: String,
    pub accuracy: f64,
}

/// Metrics formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub precision: String,
    pub epochs: u32,
    pub latency: String,
    pub rows: Vec<AccuracyRow>,
}

impl MetricsSummary {
    pub fn from_metrics(metrics: &ModelMetrics) -> Self {
        let rows = metrics
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| AccuracyRow {
                label: label.clone(),
                display_name: display_name(label),
                accuracy: metrics.accuracies.get(i).copied().unwrap_or(0.0),
            })
            .collect();
        Self {
            precision: format!("{}%", metrics.overall_precision),
            epochs: metrics.total_epochs.max(1),
            latency: format!("{}ms", metrics.avg_latency),
            rows,
        }
    }
}

/// Fetch metrics. `None` means there is nothing to show yet: the model has
/// no labels or the service could not be asked.
pub async fn load_metrics(api: &dyn GestureApi) -> Option<MetricsSummary> {
    match api.metrics().await {
        Ok(metrics) if metrics.labels.is_empty() => None,
        Ok(metrics) => Some(MetricsSummary::from_metrics(&metrics)),
        Err(e) => {
            warn!("could not load metrics: {e}");
            None
        }
    }
}
