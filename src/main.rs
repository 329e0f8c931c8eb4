use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use trinexa::config::AppConfig;
use trinexa::db;
use trinexa::handlers;
use trinexa::services::storage::sqlite::SqliteBookingStore;
use trinexa::services::storage::supabase::SupabaseBookingStore;
use trinexa::services::storage::BookingStore;
use trinexa::services::transcript::SqliteTranscriptStore;
use trinexa::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let bookings: Box<dyn BookingStore> = match config.booking_backend.as_str() {
        "supabase" => {
            anyhow::ensure!(
                !config.supabase_url.is_empty() && !config.supabase_key.is_empty(),
                "SUPABASE_URL and SUPABASE_KEY must be set when BOOKING_BACKEND=supabase"
            );
            tracing::info!("storing demo bookings in Supabase ({})", config.supabase_url);
            Box::new(SupabaseBookingStore::new(
                config.supabase_url.clone(),
                config.supabase_key.clone(),
            ))
        }
        _ => {
            tracing::info!("storing demo bookings in SQLite ({})", config.database_url);
            Box::new(SqliteBookingStore::new(Arc::clone(&db)))
        }
    };

    if config.admin_token == "changeme" {
        tracing::warn!("ADMIN_TOKEN is not set, using the default token");
    }

    let state = Arc::new(AppState::new(
        Arc::clone(&db),
        config.clone(),
        bookings,
        Box::new(SqliteTranscriptStore::new(db)),
    ));

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/", get(handlers::chat::chat_page))
        .route("/chat", get(handlers::chat::chat_page))
        .route("/api/chat/message", post(handlers::chat::send_message))
        .route(
            "/api/chat/:session_id/transcript",
            get(handlers::chat::get_transcript),
        )
        .route(
            "/api/chat/:session_id",
            axum::routing::delete(handlers::chat::clear_session),
        )
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route("/api/admin/bookings/:id", get(handlers::admin::get_booking))
        .route(
            "/calendar/:booking_id",
            get(handlers::calendar::download_ics),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
