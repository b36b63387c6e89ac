//! Append-only audit journal
//!
//! Every component records structured events through the [`EventRecorder`]
//! trait; whoever assembles the pipeline decides where they land (JSONL
//! file, memory, ...). A failed append is fatal to the pipeline run:
//! the audit trail is a correctness requirement, not best-effort
//! telemetry, so the file recorder writes and flushes synchronously.

use crate::core::{OrderId, OrderState, OrderType, Side};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::info;

/// Audit sink failure
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("could not encode audit event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One immutable audit event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum AuditEvent {
    #[serde(rename = "ORDER_CREATED")]
    OrderCreated {
        order_id: OrderId,
        symbol: String,
        side: Side,
        quantity: u64,
        order_type: OrderType,
        price: Option<Decimal>,
        state: OrderState,
    },
    #[serde(rename = "STATE_CHANGE")]
    StateChange {
        order_id: OrderId,
        symbol: String,
        old_state: OrderState,
        new_state: OrderState,
    },
    #[serde(rename = "RISK_APPROVED")]
    RiskApproved {
        order_id: OrderId,
        symbol: String,
        side: Side,
        quantity: u64,
    },
    #[serde(rename = "RISK_REJECTED")]
    RiskRejected {
        order_id: OrderId,
        symbol: String,
        side: Side,
        quantity: u64,
        reason: String,
    },
    #[serde(rename = "POSITION_UPDATE")]
    PositionUpdate {
        order_id: OrderId,
        symbol: String,
        old_position: i64,
        new_position: i64,
    },
}

impl AuditEvent {
    /// The event's type tag as it appears in the journal
    pub fn kind(&self) -> &'static str {
        match self {
            AuditEvent::OrderCreated { .. } => "ORDER_CREATED",
            AuditEvent::StateChange { .. } => "STATE_CHANGE",
            AuditEvent::RiskApproved { .. } => "RISK_APPROVED",
            AuditEvent::RiskRejected { .. } => "RISK_REJECTED",
            AuditEvent::PositionUpdate { .. } => "POSITION_UPDATE",
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            AuditEvent::OrderCreated { symbol, .. }
            | AuditEvent::StateChange { symbol, .. }
            | AuditEvent::RiskApproved { symbol, .. }
            | AuditEvent::RiskRejected { symbol, .. }
            | AuditEvent::PositionUpdate { symbol, .. } => symbol,
        }
    }
}

/// A journal line: event plus capture time (unix millis)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: u64,
    #[serde(flatten)]
    pub event: AuditEvent,
}

impl AuditRecord {
    pub fn new(event: AuditEvent) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0))
            .as_millis() as u64;

        Self { timestamp, event }
    }
}

/// The contract every component records through
///
/// Injected as `Arc<dyn EventRecorder>` into the pipeline, the risk
/// engine and order construction; never reached through global state.
pub trait EventRecorder: Send + Sync {
    /// Durably append one event, in emission order
    fn record(&self, event: AuditEvent) -> Result<(), RecorderError>;
}

/// Synchronous JSON-lines file recorder
///
/// One JSON object per line, appended and flushed before returning, so a
/// reported success means the event reached the file.
pub struct JsonlRecorder {
    file: Mutex<File>,
    path: PathBuf,
}

impl JsonlRecorder {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, RecorderError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!(path = %path.display(), "audit journal open");

        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventRecorder for JsonlRecorder {
    fn record(&self, event: AuditEvent) -> Result<(), RecorderError> {
        let json = serde_json::to_string(&AuditRecord::new(event))?;
        let mut file = self.file.lock();
        writeln!(file, "{}", json)?;
        file.flush()?;
        Ok(())
    }
}

/// In-memory recorder for tests and embedders that inspect the trail
#[derive(Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in emission order
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Event type tags in emission order, for asserting event ordering
    pub fn kinds(&self) -> Vec<&'static str> {
        self.records.lock().iter().map(|r| r.event.kind()).collect()
    }

    /// Records of one event type
    pub fn records_of(&self, kind: &str) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.event.kind() == kind)
            .cloned()
            .collect()
    }

    /// Count of records per event type
    pub fn stats(&self) -> BTreeMap<&'static str, usize> {
        let mut stats = BTreeMap::new();
        for record in self.records.lock().iter() {
            *stats.entry(record.event.kind()).or_insert(0) += 1;
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl EventRecorder for MemoryRecorder {
    fn record(&self, event: AuditEvent) -> Result<(), RecorderError> {
        self.records.lock().push(AuditRecord::new(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::{BufRead, BufReader};
    use tempfile::NamedTempFile;

    fn created_event(symbol: &str) -> AuditEvent {
        AuditEvent::OrderCreated {
            order_id: OrderId::from("test-id"),
            symbol: symbol.to_string(),
            side: Side::Buy,
            quantity: 500,
            order_type: OrderType::Limit,
            price: Some(dec!(150.00)),
            state: OrderState::New,
        }
    }

    #[test]
    fn test_jsonl_recorder_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let recorder = JsonlRecorder::create(path.clone()).unwrap();
        recorder.record(created_event("AAPL")).unwrap();
        recorder
            .record(AuditEvent::PositionUpdate {
                order_id: OrderId::from("test-id"),
                symbol: "AAPL".to_string(),
                old_position: 0,
                new_position: 500,
            })
            .unwrap();

        let file = File::open(&path).unwrap();
        let reader = BufReader::new(file);
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>().unwrap();

        assert_eq!(lines.len(), 2);

        let entry: AuditRecord = serde_json::from_str(&lines[0]).unwrap();
        match entry.event {
            AuditEvent::OrderCreated { symbol, state, .. } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(state, OrderState::New);
            }
            other => panic!("wrong event type: {:?}", other),
        }

        let entry: AuditRecord = serde_json::from_str(&lines[1]).unwrap();
        match entry.event {
            AuditEvent::PositionUpdate {
                old_position,
                new_position,
                ..
            } => {
                assert_eq!(old_position, 0);
                assert_eq!(new_position, 500);
            }
            other => panic!("wrong event type: {:?}", other),
        }
    }

    #[test]
    fn test_jsonl_event_tag_layout() {
        let json = serde_json::to_string(&AuditRecord::new(created_event("AAPL"))).unwrap();
        assert!(json.contains("\"event\":\"ORDER_CREATED\""));
        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"state\":\"NEW\""));
    }

    #[test]
    fn test_memory_recorder_preserves_order() {
        let recorder = MemoryRecorder::new();
        recorder.record(created_event("AAPL")).unwrap();
        recorder
            .record(AuditEvent::RiskApproved {
                order_id: OrderId::from("test-id"),
                symbol: "AAPL".to_string(),
                side: Side::Buy,
                quantity: 500,
            })
            .unwrap();

        assert_eq!(recorder.kinds(), vec!["ORDER_CREATED", "RISK_APPROVED"]);
        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn test_memory_recorder_stats() {
        let recorder = MemoryRecorder::new();
        recorder.record(created_event("AAPL")).unwrap();
        recorder.record(created_event("GOOGL")).unwrap();
        recorder
            .record(AuditEvent::RiskRejected {
                order_id: OrderId::from("test-id"),
                symbol: "AAPL".to_string(),
                side: Side::Buy,
                quantity: 5000,
                reason: "too big".to_string(),
            })
            .unwrap();

        let stats = recorder.stats();
        assert_eq!(stats.get("ORDER_CREATED"), Some(&2));
        assert_eq!(stats.get("RISK_REJECTED"), Some(&1));
        assert_eq!(stats.get("POSITION_UPDATE"), None);

        assert_eq!(recorder.records_of("ORDER_CREATED").len(), 2);
    }

    #[test]
    fn test_memory_recorder_clear() {
        let recorder = MemoryRecorder::new();
        recorder.record(created_event("AAPL")).unwrap();
        assert!(!recorder.is_empty());

        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_event_kind_and_symbol_accessors() {
        let event = created_event("AAPL");
        assert_eq!(event.kind(), "ORDER_CREATED");
        assert_eq!(event.symbol(), "AAPL");
    }
}
