use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::BookingService;
use chat_cell::{generator_from_config, ChatOrchestrator, KnowledgeBase};
use doctor_cell::{AvailabilityService, SlotCalendar};
use shared_config::AppConfig;
use shared_database::Database;
use shared_models::{EventLog, JsonlEventLog, TracingEventLog, DEPARTMENTS, DOCTOR_ROSTER};

use router::AppServices;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic chat API server");

    let config = AppConfig::from_env();

    let db = Database::open(&config.database_path)
        .with_context(|| format!("opening database at {}", config.database_path))?;
    db.seed_reference_data(DEPARTMENTS, DOCTOR_ROSTER)
        .context("seeding departments and doctors")?;
    let db = Arc::new(db);

    let events: Arc<dyn EventLog> = match &config.chat_log_path {
        Some(path) => {
            info!("Writing chat and booking events to {}", path.display());
            Arc::new(JsonlEventLog::open(path).with_context(|| format!("opening {}", path.display()))?)
        }
        None => Arc::new(TracingEventLog),
    };

    let availability = Arc::new(AvailabilityService::new(db.clone(), SlotCalendar::from_config(&config)));
    let booking = Arc::new(BookingService::new(db, availability.clone()).with_event_log(events.clone()));

    let generator = generator_from_config(&config);
    let knowledge = Arc::new(KnowledgeBase::load(&config.knowledge_dir).context("loading knowledge base")?);
    let chat = Arc::new(
        ChatOrchestrator::new(generator, knowledge, availability.clone(), &config).with_event_log(events),
    );

    let app = router::create_router(AppServices {
        availability,
        booking,
        chat,
    })
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
            .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
    )
    .layer(cors_layer(&config));

    info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
