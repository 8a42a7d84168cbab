#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the hazard map application.
//!
//! Serves the analysis REST API for the map frontend: a drawn polygon plus
//! magnitude comes in, the concurrent area aggregation runs against the
//! external geographic services, and the structured report (with an
//! optional generated narrative) goes back out. Also serves the built
//! frontend static files in production.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use hazard_map_ai::providers::{self, TextProvider};
use hazard_map_analysis::Analyzer;

/// Shared application state.
pub struct AppState {
    /// The scatter-gather analyzer over the geographic data sources.
    pub analyzer: Analyzer,
    /// Narrative text provider; `None` when no credentials are configured.
    pub narrative: Option<Arc<dyn TextProvider>>,
}

/// Starts the hazard map API server.
///
/// Wires the Overpass-backed analyzer, builds the narrative provider from
/// the environment (the server runs without one; reports are then returned
/// without generated prose), and starts the Actix-Web HTTP server. This is
/// a regular async function; the caller provides the async runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let narrative = match providers::create_provider_from_env() {
        Ok(provider) => Some(Arc::from(provider)),
        Err(e) => {
            log::warn!("Narrative provider unavailable, reports will omit prose: {e}");
            None
        }
    };

    let state = web::Data::new(AppState {
        analyzer: Analyzer::from_env(),
        narrative,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/analyze", web::post().to(handlers::analyze))
                    .route(
                        "/recommendations",
                        web::post().to(handlers::recommendations),
                    ),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
