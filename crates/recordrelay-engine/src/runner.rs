//! Flow runner: the pipeline boundary.
//!
//! One invocation = one inbound document, one routed batch, one summary.
//! Stages run strictly in order: parse, extract, map, route, deliver.
//! Single-threaded and run-to-completion; nothing is retried and nothing
//! overlaps. On any stage failure the original payload (not the partially
//! transformed one) is attached as a diagnostic artifact and a single
//! [`RunError`] is surfaced.

use std::sync::Arc;

use recordrelay_store::{KeyedStore, SqliteKeyedStore};
use recordrelay_types::{FlowError, SinkKind, StoreName};

use crate::config::{validate_flow, FlowConfig, HttpMode};
use crate::diagnostics::{DiagnosticSink, LogDiagnostics};
use crate::document::Document;
use crate::errors::RunError;
use crate::extract::extract_records;
use crate::mapping::map_record;
use crate::result::RunSummary;
use crate::router::{parse_routing_flag, route};
use crate::sinks::{HttpSink, StoreSink};

/// Executes one flow configuration against inbound documents.
pub struct FlowRunner {
    config: FlowConfig,
    store: Option<Arc<dyn KeyedStore>>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl FlowRunner {
    /// Validate the configuration once and build a runner.
    ///
    /// # Errors
    ///
    /// Returns a [`RunError`] wrapping [`FlowError::Configuration`] when
    /// the flow fails semantic validation.
    pub fn new(config: FlowConfig) -> Result<Self, RunError> {
        validate_flow(&config)?;
        Ok(Self {
            config,
            store: None,
            diagnostics: Arc::new(LogDiagnostics),
        })
    }

    /// Inject a keyed store backend (tests, shared stores). Without this,
    /// the runner opens the SQLite store configured in the flow on demand.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn KeyedStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the diagnostic sink (default: structured log events).
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Run the pipeline over one inbound document.
    ///
    /// # Errors
    ///
    /// Any stage failure is caught exactly once here: the original input
    /// is attached as a diagnostic artifact and returned as one
    /// [`RunError`]. No partial success is reported.
    pub fn run(&self, input: &str) -> Result<RunSummary, RunError> {
        match self.execute(input) {
            Ok(summary) => {
                tracing::info!(
                    flow = %summary.flow,
                    sink = %summary.sink,
                    records = summary.records,
                    "flow run completed"
                );
                Ok(summary)
            }
            Err(cause) => {
                self.diagnostics
                    .attach("failed-payload", input, self.input_mime());
                tracing::error!(flow = %self.config.flow, error = %cause, "flow run aborted");
                Err(RunError::new(cause))
            }
        }
    }

    fn execute(&self, input: &str) -> Result<RunSummary, FlowError> {
        let use_store = parse_routing_flag(self.config.delivery.route_to_store.as_deref());
        let sink = route(use_store);

        // Connect-only flows carry no records; skip extraction entirely.
        if sink == SinkKind::Http {
            if let Some(http) = &self.config.delivery.http {
                if http.mode == HttpMode::Probe {
                    let results = HttpSink::new(http.clone())?.probe(&*self.diagnostics)?;
                    return Ok(RunSummary {
                        flow: self.config.flow.clone(),
                        sink,
                        records: 0,
                        results,
                    });
                }
            }
        }

        // Validation guarantees source and mapping for non-probe flows.
        let source = self
            .config
            .source
            .as_ref()
            .ok_or_else(|| FlowError::Configuration("source section is required".to_string()))?;
        let mapping = self
            .config
            .mapping
            .as_ref()
            .ok_or_else(|| FlowError::Configuration("mapping section is required".to_string()))?;

        let document = Document::parse(input, source.format)?;
        let raw_records = extract_records(&document, &source.entity)?;
        let records = raw_records
            .iter()
            .map(|raw| map_record(raw, mapping))
            .collect::<Result<Vec<_>, _>>()?;

        let results = match sink {
            SinkKind::Store => {
                let settings = self.config.delivery.store.as_ref().ok_or_else(|| {
                    FlowError::Configuration("store section is required".to_string())
                })?;
                let backend = self.acquire_store(settings)?;
                StoreSink::new(&*backend, StoreName::new(&settings.name))
                    .deliver(&records, &*self.diagnostics)?
            }
            SinkKind::Http => {
                let settings = self.config.delivery.http.as_ref().ok_or_else(|| {
                    FlowError::Configuration("http section is required".to_string())
                })?;
                HttpSink::new(settings.clone())?.deliver(&records, &*self.diagnostics)?
            }
        };

        Ok(RunSummary {
            flow: self.config.flow.clone(),
            sink,
            records: records.len(),
            results,
        })
    }

    fn acquire_store(
        &self,
        settings: &crate::config::StoreSettings,
    ) -> Result<Arc<dyn KeyedStore>, FlowError> {
        if let Some(store) = &self.store {
            return Ok(Arc::clone(store));
        }
        SqliteKeyedStore::open(&settings.path)
            .map(|s| Arc::new(s) as Arc<dyn KeyedStore>)
            .map_err(|e| FlowError::StoreUnavailable(e.to_string()))
    }

    fn input_mime(&self) -> &'static str {
        self.config
            .source
            .as_ref()
            .map_or("text/plain", |s| s.format.mime())
    }
}

/// Convenience entry point: validate, run, and serialize the summary as
/// the single outbound document.
///
/// # Errors
///
/// Returns [`RunError`] on validation failure or any stage failure.
pub fn run_flow(input: &str, config: FlowConfig) -> Result<String, RunError> {
    let summary = FlowRunner::new(config)?.run(input)?;
    Ok(summary.to_output_document())
}
