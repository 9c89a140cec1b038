//! Observable side effects: completed chat turns, bookings and every
//! fallback taken while generating a reply.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Chat,
    Book,
    Fallback,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Chat => "chat",
            EventKind::Book => "book",
            EventKind::Fallback => "fallback",
        }
    }
}

pub trait EventLog: Send + Sync {
    fn record(&self, kind: EventKind, payload: Value);
}

/// Emits every event as a structured tracing record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn record(&self, kind: EventKind, payload: Value) {
        match kind {
            EventKind::Fallback => warn!(kind = kind.as_str(), %payload, "fallback taken"),
            _ => info!(kind = kind.as_str(), %payload, "event"),
        }
    }
}

/// Appends one JSON object per event to a file and mirrors it to tracing.
pub struct JsonlEventLog {
    file: Mutex<File>,
}

impl JsonlEventLog {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Mutex::new(file) })
    }

    fn line(kind: EventKind, payload: Value) -> Value {
        let mut record = Map::new();
        record.insert(
            "ts".to_string(),
            Value::String(Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()),
        );
        record.insert("kind".to_string(), Value::String(kind.as_str().to_string()));
        match payload {
            Value::Object(fields) => record.extend(fields),
            other => {
                record.insert("payload".to_string(), other);
            }
        }
        Value::Object(record)
    }
}

impl EventLog for JsonlEventLog {
    fn record(&self, kind: EventKind, payload: Value) {
        TracingEventLog.record(kind, payload.clone());

        let line = Self::line(kind, payload);
        match self.file.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", line) {
                    warn!("Failed to append event log: {}", e);
                }
            }
            Err(_) => warn!("Event log lock poisoned; dropping {} event", kind.as_str()),
        }
    }
}
