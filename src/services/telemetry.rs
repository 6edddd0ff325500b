//! Observability sink backed by logfire events and counters.

use super::ObservabilitySink;
use crate::{
    metric,
    webhook::whatsapp::errors::{ClassifiedError, ErrorDetail},
};

#[derive(Clone, Default)]
pub struct LogfireSink;

fn detail_as_string(detail: &ErrorDetail) -> String {
    match detail {
        ErrorDetail::Structured(value) => value.to_string(),
        ErrorDetail::Raw(raw) => raw.clone(),
    }
}

impl ObservabilitySink for LogfireSink {
    fn report_classified(&self, error: &ClassifiedError) {
        let detail = error
            .detail
            .as_ref()
            .map(|detail| detail.to_string())
            .unwrap_or_default();

        logfire::warn!(
            "WhatsApp preview delivery failed: {kind} {detail}",
            kind = error.kind.to_string(),
            detail = detail
        );
        metric::incr_webhook_outcome_statds(&metric::classified_outcome(
            error.kind.as_metric_label(),
        ));
    }

    fn report_unclassified(&self, message: &str, detail: &ErrorDetail) {
        logfire::error!(
            "Failed to process WhatsApp preview webhook: {message} detail={detail}",
            message = message.to_string(),
            detail = detail_as_string(detail)
        );
        metric::incr_webhook_outcome_statds("unclassified");
    }
}
