use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub generation_timeout: Duration,
    pub translate_replies: bool,
    pub knowledge_dir: PathBuf,
    pub retrieval_top_k: usize,
    pub slot_days: u32,
    pub slot_start_hour: u32,
    pub slot_end_hour: u32,
    pub slots_per_doctor: usize,
    pub chat_log_path: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| {
                warn!("BIND_ADDR not set, using default");
                "0.0.0.0:8000".to_string()
            }),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| {
                warn!("DATABASE_PATH not set, using default");
                "data/app.db".to_string()
            }),
            ollama_url: env::var("OLLAMA_URL").unwrap_or_else(|_| {
                warn!("OLLAMA_URL not set, using default");
                "http://localhost:11434".to_string()
            }),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| {
                warn!("OLLAMA_MODEL not set, using default");
                "llama3.2:1b".to_string()
            }),
            generation_timeout: Duration::from_secs(parse_var("GENERATION_TIMEOUT_SECS", 90)),
            translate_replies: parse_var("TRANSLATE_REPLIES", true),
            knowledge_dir: env::var("KNOWLEDGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("KNOWLEDGE_DIR not set, using default");
                    PathBuf::from("knowledge")
                }),
            retrieval_top_k: parse_var("RETRIEVAL_TOP_K", 3),
            slot_days: parse_var("SLOT_DAYS", 3),
            slot_start_hour: parse_var("SLOT_START_HOUR", 9),
            slot_end_hour: parse_var("SLOT_END_HOUR", 16),
            slots_per_doctor: parse_var("SLOTS_PER_DOCTOR", 5),
            chat_log_path: env::var("CHAT_LOG_PATH").ok().map(PathBuf::from),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()),
        };

        if !config.is_slot_window_valid() {
            warn!(
                "Slot window {}..={} is invalid; availability will be empty",
                config.slot_start_hour, config.slot_end_hour
            );
        }

        config
    }

    pub fn is_generation_configured(&self) -> bool {
        !self.ollama_url.is_empty() && !self.ollama_model.is_empty()
    }

    pub fn is_slot_window_valid(&self) -> bool {
        self.slot_start_hour <= self.slot_end_hour && self.slot_end_hour < 24 && self.slot_days > 0
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
