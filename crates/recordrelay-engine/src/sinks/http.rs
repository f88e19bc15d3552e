//! HTTP sink: basic-auth JSON delivery to a remote endpoint.
//!
//! Exactly status 200 counts as success. Anything else captures the
//! response body for diagnostics and aborts the batch; a request that
//! never produced a status (refused, timeout) is a transport error.

use std::time::Duration;

use recordrelay_types::{CanonicalRecord, DeliveryOutcome, DeliveryResult, FlowError, SinkKind};

use crate::config::{HttpMode, HttpSettings};
use crate::diagnostics::DiagnosticSink;

/// Sentinel key reported by a connectivity probe.
pub const PROBE_KEY: &str = "connectivity";

/// Delivers canonical records (or a connectivity probe) over HTTP.
pub struct HttpSink {
    client: reqwest::blocking::Client,
    settings: HttpSettings,
}

impl HttpSink {
    /// Build the sink and its blocking client with the configured
    /// connect/read timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::HttpTransport`] if the client can't be built.
    pub fn new(settings: HttpSettings) -> Result<Self, FlowError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.read_timeout_secs))
            .build()
            .map_err(|e| FlowError::HttpTransport(e.to_string()))?;
        Ok(Self { client, settings })
    }

    /// Deliver the batch according to the configured mode.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::RemoteDelivery`] on the first non-200 response
    /// (fail-fast, no retry) or [`FlowError::HttpTransport`] when a request
    /// produced no status at all.
    pub fn deliver(
        &self,
        records: &[CanonicalRecord],
        diagnostics: &dyn DiagnosticSink,
    ) -> Result<Vec<DeliveryResult>, FlowError> {
        match self.settings.mode {
            HttpMode::PerRecord => self.deliver_each(records, diagnostics),
            HttpMode::Batch => self.deliver_batch(records, diagnostics),
            HttpMode::Probe => self.probe(diagnostics),
        }
    }

    /// Connect-only probe: a single unauthenticated GET; any 200 response
    /// is a successful connectivity check, reported as a fixed sentinel
    /// result instead of per-record results.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::RemoteDelivery`] keyed by the probe sentinel
    /// on a non-200 response.
    pub fn probe(&self, diagnostics: &dyn DiagnosticSink) -> Result<Vec<DeliveryResult>, FlowError> {
        let url = self.endpoint(None);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FlowError::HttpTransport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();

        if status != 200 {
            diagnostics.attach("failed-response-connectivity", &body, "text/plain");
            return Err(FlowError::RemoteDelivery {
                key: PROBE_KEY.to_string(),
                status,
                body,
            });
        }

        tracing::info!(url, "connectivity probe succeeded");
        Ok(vec![DeliveryResult {
            key: PROBE_KEY.to_string(),
            sink: SinkKind::Http,
            outcome: DeliveryOutcome::Probed { status },
        }])
    }

    fn deliver_each(
        &self,
        records: &[CanonicalRecord],
        diagnostics: &dyn DiagnosticSink,
    ) -> Result<Vec<DeliveryResult>, FlowError> {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let key = record.key().to_string();
            let url = self.endpoint(Some(&key));
            let payload = self.envelope(std::slice::from_ref(record));
            let (status, body) = self.post(&url, &payload)?;

            if status != 200 {
                diagnostics.attach(&format!("failed-response-{key}"), &body, "text/plain");
                return Err(FlowError::RemoteDelivery { key, status, body });
            }

            diagnostics.attach(&format!("http-response-{key}"), &body, "application/json");
            tracing::debug!(key, status, "record delivered");
            results.push(DeliveryResult {
                key,
                sink: SinkKind::Http,
                outcome: DeliveryOutcome::Delivered { status, body },
            });
        }

        tracing::info!(records = results.len(), "batch delivered per record");
        Ok(results)
    }

    /// Whole batch in one request: one request, one outcome, so there is
    /// no partially-acknowledged state to lose.
    fn deliver_batch(
        &self,
        records: &[CanonicalRecord],
        diagnostics: &dyn DiagnosticSink,
    ) -> Result<Vec<DeliveryResult>, FlowError> {
        let url = self.endpoint(None);
        let payload = self.envelope(records);
        let (status, body) = self.post(&url, &payload)?;

        if status != 200 {
            diagnostics.attach("failed-response-batch", &body, "text/plain");
            return Err(FlowError::RemoteDelivery {
                key: "batch".to_string(),
                status,
                body,
            });
        }

        diagnostics.attach("http-response-batch", &body, "application/json");
        tracing::info!(records = records.len(), status, "batch delivered in one request");
        Ok(records
            .iter()
            .map(|record| DeliveryResult {
                key: record.key().to_string(),
                sink: SinkKind::Http,
                outcome: DeliveryOutcome::Delivered {
                    status,
                    body: body.clone(),
                },
            })
            .collect())
    }

    fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(u16, String), FlowError> {
        let response = self
            .client
            .post(url)
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .json(payload)
            .send()
            .map_err(|e| FlowError::HttpTransport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        Ok((status, body))
    }

    /// Endpoint shape: `<base>/<entity_path>[/<key>]`.
    fn endpoint(&self, key: Option<&str>) -> String {
        let base = self.settings.base_url.trim_end_matches('/');
        let path = self.settings.entity_path.trim_matches('/');
        match key {
            Some(k) => format!("{base}/{path}/{k}"),
            None => format!("{base}/{path}"),
        }
    }

    /// Documented JSON envelope shape: `{"<envelope>": [records...]}`.
    fn envelope(&self, records: &[CanonicalRecord]) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            self.settings.envelope.clone(),
            serde_json::Value::Array(records.iter().map(CanonicalRecord::to_json).collect()),
        );
        serde_json::Value::Object(map)
    }
}
