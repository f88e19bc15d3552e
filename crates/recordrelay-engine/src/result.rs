//! Run result summary, returned as the outbound document of a run.

use recordrelay_types::{DeliveryResult, SinkKind};
use serde::{Deserialize, Serialize};

/// Batch-level outcome of one flow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Flow name from the configuration.
    pub flow: String,
    /// Sink the batch was routed to.
    pub sink: SinkKind,
    /// Number of canonical records delivered.
    pub records: usize,
    /// Per-record outcomes in delivery order.
    pub results: Vec<DeliveryResult>,
}

impl RunSummary {
    /// Serialize the summary as the run's single outbound document.
    #[must_use]
    pub fn to_output_document(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordrelay_types::DeliveryOutcome;

    #[test]
    fn summary_serializes_and_parses_back() {
        let summary = RunSummary {
            flow: "contacts".to_string(),
            sink: SinkKind::Store,
            records: 1,
            results: vec![DeliveryResult {
                key: "CP1".to_string(),
                sink: SinkKind::Store,
                outcome: DeliveryOutcome::Stored {
                    entry_key: "CP1".to_string(),
                },
            }],
        };
        let doc = summary.to_output_document();
        let back: RunSummary = serde_json::from_str(&doc).unwrap();
        assert_eq!(summary, back);
    }
}
