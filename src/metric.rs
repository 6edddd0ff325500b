use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("wa_preview_statds")
        .with_description("WhatsApp preview webhook statistics")
        .with_unit("webhook")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

/// Counts how each webhook delivery ended: `resumed`, `no_content`,
/// `classified:<kind>` or `unclassified`.
pub fn incr_webhook_outcome_statds(outcome: &str) {
    incr_statds("webhook_outcome".to_string(), outcome.into())
}

pub fn classified_outcome(kind: &str) -> String {
    format!("classified:{kind}")
}
