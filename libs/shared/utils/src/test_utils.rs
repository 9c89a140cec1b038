use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use shared_config::AppConfig;
use shared_database::Database;
use shared_models::{EventKind, EventLog, DEPARTMENTS, DOCTOR_ROSTER};

pub struct TestConfig {
    pub ollama_url: String,
    pub ollama_model: String,
    pub knowledge_dir: PathBuf,
    pub generation_timeout: Duration,
    pub translate_replies: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://127.0.0.1:9".to_string(),
            ollama_model: "test-model".to_string(),
            knowledge_dir: PathBuf::from("knowledge-does-not-exist"),
            generation_timeout: Duration::from_secs(2),
            translate_replies: false,
        }
    }
}

impl TestConfig {
    pub fn with_ollama_url(url: &str) -> Self {
        Self {
            ollama_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            database_path: ":memory:".to_string(),
            ollama_url: self.ollama_url.clone(),
            ollama_model: self.ollama_model.clone(),
            generation_timeout: self.generation_timeout,
            translate_replies: self.translate_replies,
            knowledge_dir: self.knowledge_dir.clone(),
            retrieval_top_k: 3,
            slot_days: 3,
            slot_start_hour: 9,
            slot_end_hour: 16,
            slots_per_doctor: 5,
            chat_log_path: None,
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// In-memory database with the clinic catalogue already seeded.
pub fn seeded_database() -> Arc<Database> {
    let db = Database::open_in_memory().expect("in-memory database");
    db.seed_reference_data(DEPARTMENTS, DOCTOR_ROSTER)
        .expect("seed reference data");
    Arc::new(db)
}

/// Fixed wall-clock instants used by slot and booking tests.
pub struct TestClock;

impl TestClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid test timestamp")
    }

    /// Before opening hours: the whole first day is bookable.
    pub fn early_morning() -> NaiveDateTime {
        Self::at(2030, 3, 4, 7, 15)
    }

    /// Mid-afternoon: only the last hours of the first day remain.
    pub fn mid_afternoon() -> NaiveDateTime {
        Self::at(2030, 3, 4, 14, 40)
    }

    /// After closing: the first day contributes no slots.
    pub fn evening() -> NaiveDateTime {
        Self::at(2030, 3, 4, 19, 5)
    }
}

/// Event log that keeps every record in memory for assertions.
#[derive(Default)]
pub struct RecordingEventLog {
    events: Mutex<Vec<(EventKind, Value)>>,
}

impl RecordingEventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(EventKind, Value)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn of_kind(&self, kind: EventKind) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, payload)| payload)
            .collect()
    }
}

impl EventLog for RecordingEventLog {
    fn record(&self, kind: EventKind, payload: Value) {
        if let Ok(mut events) = self.events.lock() {
            events.push((kind, payload));
        }
    }
}
