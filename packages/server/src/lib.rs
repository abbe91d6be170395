#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the dengue watch dashboard.
//!
//! Serves the JSON API under `/api` and the compiled dashboard from the
//! configured static directory. Each request runs its database round trips
//! and at most one weather call and one completion call in sequence. Every
//! failure is logged and turned into a JSON error at the handler boundary.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dengue_watch_ai::AiError;
use dengue_watch_ai::providers::{CompletionProvider, create_provider};
use dengue_watch_config::{AppConfig, EmailConfig};
use dengue_watch_database::{DbError, db};
use dengue_watch_notify::{BrevoMailer, DisabledMailer, Mailer, NotifyError};
use dengue_watch_weather::{ForecastSource, OpenMeteoClient, WeatherError};
use switchy_database::Database;
use thiserror::Error;

/// Errors that can occur while starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The database could not be opened.
    #[error(transparent)]
    Database(#[from] DbError),

    /// The weather client could not be built.
    #[error(transparent)]
    Weather(#[from] WeatherError),

    /// The completion provider could not be built.
    #[error(transparent)]
    Ai(#[from] AiError),

    /// The mailer could not be built.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Binding or running the HTTP server failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Surveillance database.
    pub db: Arc<dyn Database>,
    /// Configuration loaded at start-up.
    pub config: AppConfig,
    /// Weather forecast source.
    pub weather: Arc<dyn ForecastSource>,
    /// Chatbot completion provider.
    pub provider: Arc<dyn CompletionProvider>,
    /// Alert email sender.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Opens the database and builds every external client described by
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the database cannot be opened or a client
    /// cannot be built.
    pub async fn from_config(config: AppConfig) -> Result<Self, ServerError> {
        log::info!("Opening database...");
        let db = db::open(&config.database.path).await?;

        let weather = OpenMeteoClient::new(
            config.weather.base_url.clone(),
            config.weather.latitude,
            config.weather.longitude,
            Duration::from_secs(config.weather.timeout_secs),
        )?;
        let provider = create_provider(&config.ai)?;
        let mailer = create_mailer(&config.email)?;

        Ok(Self {
            db: Arc::from(db),
            config,
            weather: Arc::new(weather),
            provider: Arc::from(provider),
            mailer,
        })
    }
}

/// Creates the alert mailer, or a [`DisabledMailer`] when the API key or
/// sender address is missing.
///
/// # Errors
///
/// Returns [`NotifyError::Http`] if the HTTP client cannot be built.
pub fn create_mailer(config: &EmailConfig) -> Result<Arc<dyn Mailer>, NotifyError> {
    let (Some(api_key), Some(sender)) = (config.api_key.clone(), config.sender.clone()) else {
        log::warn!("Email API key or sender not configured; alert emails are disabled");
        return Ok(Arc::new(DisabledMailer));
    };

    Ok(Arc::new(BrevoMailer::new(
        api_key,
        config.base_url.clone(),
        sender,
        config.sender_name.clone(),
        Duration::from_secs(config.timeout_secs),
    )?))
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(handlers::json_error))
            .app_data(web::QueryConfig::default().error_handler(handlers::query_error))
            .app_data(web::FormConfig::default().error_handler(handlers::form_error))
            .route("/health", web::get().to(handlers::health))
            .route("/barangays", web::get().to(handlers::barangays))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/summary", web::get().to(handlers::summary))
            .route("/weather", web::get().to(handlers::weather))
            .route("/predictions", web::post().to(handlers::save_prediction))
            .route(
                "/predictions/predict",
                web::post().to(handlers::predict_cases),
            )
            .route("/predictions/fleet", web::get().to(handlers::fleet))
            .route(
                "/predictions/validation",
                web::get().to(handlers::validation),
            )
            .route(
                "/predictions/history",
                web::get().to(handlers::prediction_history),
            )
            .route("/chat", web::post().to(handlers::chat))
            .route("/chat/history", web::get().to(handlers::chat_history))
            .route("/alerts/notify", web::post().to(handlers::notify_alerts)),
    );
}

/// Starts the dengue watch API server.
///
/// This is a regular async function; the caller provides the runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if start-up fails or the HTTP server fails to
/// bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: AppConfig) -> Result<(), ServerError> {
    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;
    let static_dir = config.server.static_dir.clone();

    let state = web::Data::new(AppState::from_config(config).await?);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Compiled dashboard
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
