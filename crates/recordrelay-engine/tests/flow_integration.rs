//! Integration tests for the full transform-route-deliver path.
//!
//! These tests drive the runner end to end with real fixture flows:
//! XML/JSON inputs, both sinks, the error envelope, and the connect-only
//! probe mode.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use recordrelay_engine::config::parser;
use recordrelay_engine::diagnostics::MemoryDiagnostics;
use recordrelay_engine::runner::FlowRunner;
use recordrelay_store::{KeyedStore, SqliteKeyedStore};
use recordrelay_types::{CanonicalRecord, DeliveryOutcome, FieldValue, FlowError, SinkKind, StoreName};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests/fixtures/flows")
        .join(name)
}

const CONTACT_XML: &str = r#"
<n0:BusinessPartnerByIDResponse xmlns:n0="http://example.com/partners">
  <BusinessPartner>
    <InternalID>CP1</InternalID>
    <Common><Person><Name>
      <GivenName>Anna</GivenName>
      <FamilyName>Muster</FamilyName>
    </Name></Person></Common>
    <BlockedIndicator>true</BlockedIndicator>
  </BusinessPartner>
</n0:BusinessPartnerByIDResponse>"#;

/// Minimal HTTP responder for sink tests: accepts `connections` requests
/// and answers each with the given status/body.
fn spawn_server(
    connections: usize,
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = std::thread::spawn(move || {
        let mut captured = Vec::new();
        for _ in 0..connections {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(str::trim)
                                .map(String::from)
                        })
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            captured.push(String::from_utf8_lossy(&raw).to_string());
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
        captured
    });
    (format!("http://{addr}"), handle)
}

/// Scenario A + B: routing flag "true" writes one store entry keyed CP1
/// with the documented canonical field values, and makes zero HTTP calls.
#[test]
fn contact_flow_routes_to_store_with_mapped_fields() {
    let config = parser::parse_flow(&fixture("contacts_store.yaml")).unwrap();
    let backend: Arc<SqliteKeyedStore> = Arc::new(SqliteKeyedStore::in_memory().unwrap());
    let diagnostics = Arc::new(MemoryDiagnostics::default());

    let runner = FlowRunner::new(config)
        .unwrap()
        .with_store(Arc::clone(&backend) as Arc<dyn KeyedStore>)
        .with_diagnostics(Arc::clone(&diagnostics) as _);

    let summary = runner.run(CONTACT_XML).unwrap();
    assert_eq!(summary.sink, SinkKind::Store);
    assert_eq!(summary.records, 1);
    assert_eq!(summary.results[0].key, "CP1");

    let store = StoreName::new("ContactPersons");
    assert_eq!(backend.entry_count(&store).unwrap(), 1);
    let payload = backend.get(&store, "CP1").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(json["externalId"], "CP1");
    assert_eq!(json["firstName"], "Anna");
    assert_eq!(json["lastName"], "Muster");
    assert_eq!(json["inactive"], true);
    assert_eq!(json["title"], "");

    // Audit copy of the written entry, tagged by key
    assert!(diagnostics.find("store-entry-CP1").is_some());
}

/// Store-sink idempotence: running the same document twice leaves one
/// logical entry (last write wins), not two.
#[test]
fn rerun_overwrites_rather_than_duplicates() {
    let config = parser::parse_flow(&fixture("contacts_store.yaml")).unwrap();
    let backend: Arc<SqliteKeyedStore> = Arc::new(SqliteKeyedStore::in_memory().unwrap());
    let runner = FlowRunner::new(config)
        .unwrap()
        .with_store(Arc::clone(&backend) as Arc<dyn KeyedStore>);

    runner.run(CONTACT_XML).unwrap();
    runner.run(CONTACT_XML).unwrap();

    assert_eq!(
        backend.entry_count(&StoreName::new("ContactPersons")).unwrap(),
        1
    );
}

/// Scenario C: HTTP sink answering 500 fails the run with a
/// RemoteDelivery error, and the diagnostic artifact holds the original
/// input document, not the partially built JSON.
#[test]
fn http_failure_preserves_original_payload() {
    let (base, server) = spawn_server(1, "500 Internal Server Error", "backend exploded");
    std::env::set_var("RR_CONTACTS_BASE_URL", &base);
    std::env::set_var("RR_CONTACTS_USER", "svc");
    std::env::set_var("RR_CONTACTS_PASS", "secret");

    let config = parser::parse_flow(&fixture("contacts_http.yaml")).unwrap();
    let diagnostics = Arc::new(MemoryDiagnostics::default());
    let runner = FlowRunner::new(config)
        .unwrap()
        .with_diagnostics(Arc::clone(&diagnostics) as _);

    let err = runner.run(CONTACT_XML).unwrap_err();
    assert_eq!(
        *err.cause(),
        FlowError::RemoteDelivery {
            key: "CP1".to_string(),
            status: 500,
            body: "backend exploded".to_string(),
        }
    );

    let artifact = diagnostics.find("failed-payload").unwrap();
    assert_eq!(artifact.content, CONTACT_XML);
    assert_eq!(artifact.mime, "application/xml");

    server.join().unwrap();
    std::env::remove_var("RR_CONTACTS_BASE_URL");
    std::env::remove_var("RR_CONTACTS_USER");
    std::env::remove_var("RR_CONTACTS_PASS");
}

/// Happy-path HTTP delivery: per-record POST with basic auth and the
/// documented envelope shape.
#[test]
fn http_delivery_succeeds_with_envelope() {
    let (base, server) = spawn_server(1, "200 OK", "{\"ok\":true}");
    std::env::set_var("RR_CONTACTS2_BASE_URL", &base);

    let yaml = std::fs::read_to_string(fixture("contacts_http.yaml"))
        .unwrap()
        .replace("RR_CONTACTS_BASE_URL", "RR_CONTACTS2_BASE_URL")
        .replace("${RR_CONTACTS_USER}", "svc")
        .replace("${RR_CONTACTS_PASS}", "secret");
    let config = parser::parse_flow_str(&yaml).unwrap();

    let summary = FlowRunner::new(config).unwrap().run(CONTACT_XML).unwrap();
    assert_eq!(summary.sink, SinkKind::Http);
    assert!(matches!(
        summary.results[0].outcome,
        DeliveryOutcome::Delivered { status: 200, .. }
    ));

    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("POST /contacts/CP1 "));
    assert!(requests[0].contains("\"CP\""));
    std::env::remove_var("RR_CONTACTS2_BASE_URL");
}

/// Scenario D: a document with zero matching entities fails with
/// NoRecordsFound and no sink is invoked.
#[test]
fn zero_entities_is_no_records_found() {
    let config = parser::parse_flow(&fixture("contacts_store.yaml")).unwrap();
    let backend: Arc<SqliteKeyedStore> = Arc::new(SqliteKeyedStore::in_memory().unwrap());
    let runner = FlowRunner::new(config)
        .unwrap()
        .with_store(Arc::clone(&backend) as Arc<dyn KeyedStore>);

    let err = runner.run("<Response><Other/></Response>").unwrap_err();
    assert_eq!(
        *err.cause(),
        FlowError::NoRecordsFound {
            marker: "BusinessPartner".to_string()
        }
    );
    assert_eq!(
        backend.entry_count(&StoreName::new("ContactPersons")).unwrap(),
        0
    );
}

/// Empty input is distinct from "no records": EmptyInput, payload attached.
#[test]
fn blank_input_is_empty_input_error() {
    let config = parser::parse_flow(&fixture("contacts_store.yaml")).unwrap();
    let diagnostics = Arc::new(MemoryDiagnostics::default());
    let runner = FlowRunner::new(config)
        .unwrap()
        .with_diagnostics(Arc::clone(&diagnostics) as _);

    let err = runner.run("   ").unwrap_err();
    assert!(matches!(err.cause(), FlowError::EmptyInput(_)));
    assert!(diagnostics.find("failed-payload").is_some());
}

/// A record missing its key aborts the entire batch, even when other
/// records in the same document are valid.
#[test]
fn missing_key_fails_the_whole_batch() {
    let config = parser::parse_flow(&fixture("contacts_store.yaml")).unwrap();
    let backend: Arc<SqliteKeyedStore> = Arc::new(SqliteKeyedStore::in_memory().unwrap());
    let runner = FlowRunner::new(config)
        .unwrap()
        .with_store(Arc::clone(&backend) as Arc<dyn KeyedStore>);

    let xml = r"<m>
        <BusinessPartner><InternalID>CP1</InternalID></BusinessPartner>
        <BusinessPartner><InternalID></InternalID></BusinessPartner>
    </m>";
    let err = runner.run(xml).unwrap_err();
    assert_eq!(
        *err.cause(),
        FlowError::MissingRequiredField {
            field: "externalId".to_string()
        }
    );
    // Nothing was written: mapping of the whole batch precedes delivery
    assert_eq!(
        backend.entry_count(&StoreName::new("ContactPersons")).unwrap(),
        0
    );
}

/// An unopenable store database aborts the batch with StoreUnavailable,
/// and the original payload is still preserved as a diagnostic artifact.
#[test]
fn unopenable_store_is_store_unavailable() {
    let mut config = parser::parse_flow(&fixture("contacts_store.yaml")).unwrap();
    // Parent of the database path is an existing regular file, so the
    // store directory can never be created.
    config.delivery.store.as_mut().unwrap().path =
        fixture("contacts_store.yaml").join("store.db");

    let diagnostics = Arc::new(MemoryDiagnostics::default());
    let runner = FlowRunner::new(config)
        .unwrap()
        .with_diagnostics(Arc::clone(&diagnostics) as _);

    let err = runner.run(CONTACT_XML).unwrap_err();
    assert!(matches!(err.cause(), FlowError::StoreUnavailable(_)));
    assert_eq!(
        diagnostics.find("failed-payload").unwrap().content,
        CONTACT_XML
    );
}

/// Scenario E: two assets with two file variants each map to two entries,
/// each carrying a DIGITALASSETFILE list of two sharing the parent key.
#[test]
fn asset_flow_maps_nested_file_variants() {
    let config = parser::parse_flow(&fixture("assets_store.yaml")).unwrap();
    let backend: Arc<SqliteKeyedStore> = Arc::new(SqliteKeyedStore::in_memory().unwrap());
    let runner = FlowRunner::new(config)
        .unwrap()
        .with_store(Arc::clone(&backend) as Arc<dyn KeyedStore>);

    let json = r#"{"assets": {"asset": [
        {"asset_id": "A1", "keywords": "k1", "description": "d1",
         "files": {"file": [
            {"filename": "a1-thumb.png", "variant": "thumbnail"},
            {"filename": "a1-full.png", "variant": "original"}
         ]}},
        {"asset_id": "A2", "keywords": "k2", "description": "d2",
         "files": {"file": [
            {"filename": "a2-thumb.png", "variant": "thumbnail"},
            {"filename": "a2-full.png", "variant": "original"}
         ]}}
    ]}}"#;

    let summary = runner.run(json).unwrap();
    assert_eq!(summary.records, 2);

    let store = StoreName::new("Assets");
    for key in ["A1", "A2"] {
        let payload = backend.get(&store, key).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        let record = CanonicalRecord::from_json(&value, "ASSET_ID").unwrap();
        let Some(FieldValue::Records(files)) = record.get("DIGITALASSETFILE") else {
            panic!("expected nested file list for {key}");
        };
        assert_eq!(files.len(), 2, "asset {key}");
        for file in files {
            assert_eq!(file.get("ASSET_ID"), Some(&FieldValue::Text(key.into())));
        }
    }
}

/// Connect-only probe: single GET, fixed sentinel result, no records.
#[test]
fn probe_flow_returns_sentinel() {
    let (base, server) = spawn_server(1, "200 OK", "alive");
    std::env::set_var("RR_PROBE_BASE_URL", &base);

    let config = parser::parse_flow(&fixture("connectivity_probe.yaml")).unwrap();
    let summary = FlowRunner::new(config).unwrap().run("").unwrap();

    assert_eq!(summary.records, 0);
    assert_eq!(summary.results.len(), 1);
    assert_eq!(summary.results[0].key, "connectivity");
    assert_eq!(
        summary.results[0].outcome,
        DeliveryOutcome::Probed { status: 200 }
    );

    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("GET /assets "));
    std::env::remove_var("RR_PROBE_BASE_URL");
}

/// The run summary is the outbound document: JSON, parseable, complete.
#[test]
fn run_summary_serializes_as_output_document() {
    let config = parser::parse_flow(&fixture("contacts_store.yaml")).unwrap();
    let backend: Arc<SqliteKeyedStore> = Arc::new(SqliteKeyedStore::in_memory().unwrap());
    let runner = FlowRunner::new(config)
        .unwrap()
        .with_store(Arc::clone(&backend) as Arc<dyn KeyedStore>);

    let summary = runner.run(CONTACT_XML).unwrap();
    let doc = summary.to_output_document();
    let parsed: serde_json::Value = serde_json::from_str(&doc).unwrap();
    assert_eq!(parsed["flow"], "contacts_to_store");
    assert_eq!(parsed["sink"], "store");
    assert_eq!(parsed["results"][0]["key"], "CP1");
}
