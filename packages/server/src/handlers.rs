//! HTTP handler functions for the dengue watch API.

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError, UrlencodedError};
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::NaiveDate;
use dengue_watch_ai::chat;
use dengue_watch_ai::context::build_context;
use dengue_watch_analytics::{AnalyticsError, alert_digest, build_snapshot};
use dengue_watch_database::queries;
use dengue_watch_database_models::NewPredictionRecord;
use dengue_watch_notify::{NotifyError, OutgoingEmail, Recipient};
use dengue_watch_prediction::{
    confidence_level, predict, predict_fleet, regions_from_history, validate,
};
use dengue_watch_prediction_models::WeatherReading;
use dengue_watch_server_models::{
    ApiHealth, ApiResponse, ChatForm, ChatResponse, DEFAULT_DAYS, DaysQuery, FleetResponse,
    LimitQuery, NotifyResponse, PredictRequest, PredictResponse, SavePredictionRequest,
    validate_input,
};
use dengue_watch_weather::{ForecastSource, WeatherDay, current_reading, describe_reading};

use crate::AppState;

const DATABASE_ERROR: &str = "Database error";

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn database_error(context: &str, e: &dyn std::fmt::Display) -> HttpResponse {
    log::error!("{context}: {e}");
    HttpResponse::InternalServerError().json(ApiResponse::<()>::error(DATABASE_ERROR))
}

fn bad_request(message: String) -> HttpResponse {
    log::warn!("Rejected request: {message}");
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
}

/// Wraps an extractor failure so it is answered with the JSON envelope
/// instead of actix's plain-text body.
fn rejected_input<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

/// Error handler for malformed JSON bodies.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected_input(err)
}

/// Error handler for malformed query strings.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected_input(err)
}

/// Error handler for malformed form bodies.
pub fn form_error(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    rejected_input(err)
}

/// Fetches the forecast, treating any failure as "no forecast".
async fn fetch_forecast(source: &dyn ForecastSource) -> Vec<WeatherDay> {
    match source.forecast().await {
        Ok(days) => days,
        Err(e) => {
            log::warn!("Weather forecast unavailable: {e}");
            Vec::new()
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/barangays`
///
/// Barangays with their latest known population and active case count.
pub async fn barangays(state: web::Data<AppState>) -> HttpResponse {
    match queries::list_barangay_directory(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(ApiResponse::ok(rows)),
        Err(e) => database_error("Failed to list barangays", &e),
    }
}

/// `GET /api/dashboard?days=`
///
/// Returns `{stats, alerts, cases, barangay_data}` for the window.
pub async fn dashboard(
    state: web::Data<AppState>,
    query: web::Query<DaysQuery>,
) -> HttpResponse {
    match dengue_watch_analytics::dashboard(state.db.as_ref(), today(), query.days()).await {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::ok(data)),
        Err(e) => database_error("Failed to build dashboard", &e),
    }
}

/// `GET /api/summary`
///
/// The full surveillance snapshot the chatbot context is built from.
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    let forecast = fetch_forecast(state.weather.as_ref()).await;

    match build_snapshot(state.db.as_ref(), today(), DEFAULT_DAYS, forecast).await {
        Ok(snapshot) => HttpResponse::Ok().json(ApiResponse::ok(snapshot)),
        Err(e) => database_error("Failed to build summary", &e),
    }
}

/// `GET /api/weather`
pub async fn weather(state: web::Data<AppState>) -> HttpResponse {
    let forecast = fetch_forecast(state.weather.as_ref()).await;
    HttpResponse::Ok().json(ApiResponse::ok(forecast))
}

/// `POST /api/predictions/predict`
///
/// Single prediction for a JSON `{population, temperature, humidity}`.
pub async fn predict_cases(body: web::Json<PredictRequest>) -> HttpResponse {
    let input = match body.into_inner().validate() {
        Ok(input) => input,
        Err(message) => return bad_request(message),
    };

    let prediction = predict(input);
    HttpResponse::Ok().json(ApiResponse::ok(PredictResponse {
        recommendation: prediction.risk_tier.recommendation().to_string(),
        prediction,
    }))
}

/// `GET /api/predictions/fleet`
///
/// Applies the current forecast reading (or the defaults) to every
/// barangay, highest predicted cases first.
pub async fn fleet(state: web::Data<AppState>) -> HttpResponse {
    let forecast = fetch_forecast(state.weather.as_ref()).await;
    let reading = current_reading(&forecast);

    let db = state.db.as_ref();
    let history = match queries::list_historical_observations(db).await {
        Ok(history) => history,
        Err(e) => return database_error("Failed to load historical records", &e),
    };
    let names = match queries::list_barangay_names(db).await {
        Ok(names) => names,
        Err(e) => return database_error("Failed to list barangays", &e),
    };

    let predictions = predict_fleet(&regions_from_history(&names, &history), reading);

    HttpResponse::Ok().json(ApiResponse::ok(FleetResponse {
        weather: reading,
        live_weather: !forecast.is_empty(),
        predictions,
    }))
}

/// `GET /api/predictions/validation`
///
/// Backtest of the model against every historical record.
pub async fn validation(state: web::Data<AppState>) -> HttpResponse {
    match queries::list_historical_observations(state.db.as_ref()).await {
        Ok(history) => HttpResponse::Ok().json(ApiResponse::ok(validate(&history))),
        Err(e) => database_error("Failed to load historical records", &e),
    }
}

/// `POST /api/predictions`
///
/// Predicts for the given population and persists the result. Missing
/// temperature or humidity is taken from the current forecast reading.
pub async fn save_prediction(
    state: web::Data<AppState>,
    body: web::Json<SavePredictionRequest>,
) -> HttpResponse {
    let body = body.into_inner();

    let reading = match (body.temperature, body.humidity) {
        (Some(temperature), Some(humidity)) => WeatherReading {
            temperature,
            humidity,
        },
        (temperature, humidity) => {
            let current = current_reading(&fetch_forecast(state.weather.as_ref()).await);
            WeatherReading {
                temperature: temperature.unwrap_or(current.temperature),
                humidity: humidity.unwrap_or(current.humidity),
            }
        }
    };

    let input = match validate_input(body.population, reading.temperature, reading.humidity) {
        Ok(input) => input,
        Err(message) => return bad_request(message),
    };
    let prediction = predict(input);

    let db = state.db.as_ref();
    let history = match queries::list_historical_observations(db).await {
        Ok(history) => history,
        Err(e) => return database_error("Failed to load historical records", &e),
    };

    let record = NewPredictionRecord {
        prediction_date: body.prediction_date.unwrap_or_else(today),
        predicted_cases: prediction.predicted_cases,
        confidence_level: confidence_level(&validate(&history).summary),
        risk_level: prediction.risk_tier,
        weather_factor: describe_reading(reading),
    };

    match queries::insert_prediction(db, &record).await {
        Ok(saved) => HttpResponse::Created().json(ApiResponse::ok(saved)),
        Err(e) => database_error("Failed to save prediction", &e),
    }
}

/// `GET /api/predictions/history?limit=`
pub async fn prediction_history(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
) -> HttpResponse {
    match queries::list_predictions(state.db.as_ref(), query.limit()).await {
        Ok(rows) => HttpResponse::Ok().json(ApiResponse::ok(rows)),
        Err(e) => database_error("Failed to list predictions", &e),
    }
}

/// `POST /api/chat`
///
/// Form-encoded `message`; returns `{response, timestamp}`. Blank messages
/// are answered with a fixed prompt without contacting the provider.
pub async fn chat(state: web::Data<AppState>, form: web::Form<ChatForm>) -> HttpResponse {
    let message = form.into_inner().message;
    let db = state.db.as_ref();
    let weather = state.weather.as_ref();
    let today = today();

    let load_context = move || async move {
        let forecast = fetch_forecast(weather).await;
        let snapshot = build_snapshot(db, today, DEFAULT_DAYS, forecast).await?;
        Ok::<_, AnalyticsError>(build_context(&snapshot))
    };

    let reply = chat::reply(state.provider.as_ref(), &message, load_context).await;

    if !message.trim().is_empty()
        && let Err(e) = queries::insert_chat_exchange(db, message.trim(), &reply.response).await
    {
        log::error!("Failed to store chat exchange: {e}");
    }

    HttpResponse::Ok().json(ChatResponse {
        response: reply.response,
        timestamp: reply.timestamp,
    })
}

/// `GET /api/chat/history?limit=`
pub async fn chat_history(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
) -> HttpResponse {
    match queries::list_chat_exchanges(state.db.as_ref(), query.limit()).await {
        Ok(rows) => HttpResponse::Ok().json(ApiResponse::ok(rows)),
        Err(e) => database_error("Failed to list chat history", &e),
    }
}

/// `POST /api/alerts/notify?days=`
///
/// Emails the current alerts to every official with an email address.
pub async fn notify_alerts(
    state: web::Data<AppState>,
    query: web::Query<DaysQuery>,
) -> HttpResponse {
    let days = query.days();
    let db = state.db.as_ref();

    let data = match dengue_watch_analytics::dashboard(db, today(), days).await {
        Ok(data) => data,
        Err(e) => return database_error("Failed to compute alerts", &e),
    };
    if data.alerts.is_empty() {
        log::info!("No alerts in the last {days} day(s); nothing to send");
        return HttpResponse::Ok().json(ApiResponse::ok(NotifyResponse {
            alerts: 0,
            recipients: 0,
        }));
    }

    let officials = match queries::list_officials(db).await {
        Ok(officials) => officials,
        Err(e) => return database_error("Failed to list officials", &e),
    };

    let mut to: Vec<Recipient> = Vec::new();
    for official in officials {
        let Some(email) = official.email.filter(|e| !e.trim().is_empty()) else {
            continue;
        };
        if to.iter().all(|r| !r.email.eq_ignore_ascii_case(&email)) {
            to.push(Recipient {
                email,
                name: Some(official.name),
            });
        }
    }

    if to.is_empty() {
        log::warn!(
            "{} alert(s) but no official has an email address",
            data.alerts.len()
        );
        return HttpResponse::Ok().json(ApiResponse::ok(NotifyResponse {
            alerts: data.alerts.len(),
            recipients: 0,
        }));
    }

    let (subject, text) = alert_digest(&data.alerts, days);
    let email = OutgoingEmail { to, subject, text };

    match state.mailer.send(&email).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::ok(NotifyResponse {
            alerts: data.alerts.len(),
            recipients: email.to.len(),
        })),
        Err(e @ NotifyError::NotConfigured { .. }) => {
            log::error!("Failed to send alert email: {e}");
            HttpResponse::ServiceUnavailable()
                .json(ApiResponse::<()>::error("Email delivery is not configured"))
        }
        Err(e) => {
            log::error!("Failed to send alert email: {e}");
            HttpResponse::BadGateway().json(ApiResponse::<()>::error("Failed to send alert email"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use actix_web::{App, test};
    use dengue_watch_ai::AiError;
    use dengue_watch_ai::chat::EMPTY_MESSAGE_REPLY;
    use dengue_watch_ai::providers::CompletionProvider;
    use dengue_watch_config::AppConfig;
    use dengue_watch_database_models::{
        CaseSeverity, CaseStatus, NewBarangay, NewCase, NewOfficial, NewPatient,
    };
    use dengue_watch_notify::Mailer;
    use dengue_watch_weather::WeatherError;
    use serde_json::Value;
    use switchy_database::Database;

    use super::*;
    use crate::configure_api;

    struct CannedWeather(Option<Vec<WeatherDay>>);

    #[async_trait::async_trait]
    impl ForecastSource for CannedWeather {
        async fn forecast(&self) -> Result<Vec<WeatherDay>, WeatherError> {
            self.0.clone().ok_or(WeatherError::Status { status: 503 })
        }
    }

    struct StubProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(&self, prompt: &str) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AiError::RateLimited);
            }
            assert!(prompt.contains("CASE OVERVIEW"));
            Ok("Poblacion needs attention.".to_string())
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait::async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    struct Harness {
        state: web::Data<AppState>,
        provider: Arc<StubProvider>,
        mailer: Arc<RecordingMailer>,
        path: PathBuf,
    }

    impl Drop for Harness {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    impl Harness {
        fn db(&self) -> &dyn Database {
            self.state.db.as_ref()
        }
    }

    fn sample_day() -> WeatherDay {
        WeatherDay {
            date: today(),
            temperature: 30.0,
            temperature_max: 33.0,
            temperature_min: 27.0,
            humidity: 75.0,
            rainfall_mm: 4.2,
            weather_code: Some(61),
            condition: "Slight rain".to_string(),
        }
    }

    async fn harness(weather: Option<Vec<WeatherDay>>, provider_fails: bool) -> Harness {
        let path = std::env::temp_dir().join(format!(
            "dengue_watch_server_{}.db",
            uuid::Uuid::new_v4().simple()
        ));
        let db = dengue_watch_database::db::open(&path).await.unwrap();
        let provider = Arc::new(StubProvider {
            calls: AtomicUsize::new(0),
            fail: provider_fails,
        });
        let mailer = Arc::new(RecordingMailer::default());

        let state = web::Data::new(AppState {
            db: Arc::from(db),
            config: AppConfig::default(),
            weather: Arc::new(CannedWeather(weather)),
            provider: provider.clone(),
            mailer: mailer.clone(),
        });

        Harness {
            state,
            provider,
            mailer,
            path,
        }
    }

    async fn seed_cases(db: &dyn Database, name: &str, count: usize) -> i64 {
        let barangay_id = queries::upsert_barangay(
            db,
            &NewBarangay {
                name: name.to_string(),
                district: None,
                latitude: None,
                longitude: None,
            },
        )
        .await
        .unwrap();

        for i in 0..count {
            let patient_id = queries::insert_patient(
                db,
                &NewPatient {
                    first_name: format!("Patient{i}"),
                    last_name: "Santos".to_string(),
                    age: Some(12),
                    sex: Some("F".to_string()),
                    barangay_id,
                    contact_number: None,
                },
            )
            .await
            .unwrap();
            queries::insert_case(
                db,
                &NewCase {
                    patient_id,
                    date_reported: today(),
                    status: CaseStatus::Active,
                    severity: CaseSeverity::Moderate,
                    hospitalized: false,
                },
            )
            .await
            .unwrap();
        }

        barangay_id
    }

    macro_rules! service {
        ($harness:expr) => {
            test::init_service(
                App::new()
                    .app_data($harness.state.clone())
                    .configure(configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let h = harness(None, false).await;
        let app = service!(h);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn predict_returns_prediction_and_recommendation() {
        let h = harness(None, false).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/predictions/predict")
            .set_json(serde_json::json!({"population": 5000, "temperature": 30, "humidity": 75}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["predicted_cases"], 40.24);
        assert_eq!(body["data"]["risk_tier"], "HIGH");
        assert!(body["data"]["recommendation"].as_str().unwrap().contains("fogging"));
    }

    #[actix_web::test]
    async fn predict_rejects_out_of_range_humidity() {
        let h = harness(None, false).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/predictions/predict")
            .set_json(serde_json::json!({"population": 5000, "temperature": 30, "humidity": 120}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "humidity must be between 0 and 100");
    }

    #[actix_web::test]
    async fn predict_missing_field_returns_json_error() {
        let h = harness(None, false).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/predictions/predict")
            .set_json(serde_json::json!({"population": 5000, "temperature": 30}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("humidity"));
    }

    #[actix_web::test]
    async fn non_numeric_days_returns_json_error() {
        let h = harness(None, false).await;
        let app = service!(h);

        let req = test::TestRequest::get()
            .uri("/api/dashboard?days=abc")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn chat_with_json_body_returns_json_error() {
        let h = harness(None, false).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(serde_json::json!({"message": "hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(h.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn dashboard_defaults_to_thirty_days() {
        let h = harness(None, false).await;
        seed_cases(h.db(), "Poblacion", 6).await;
        let app = service!(h);

        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["stats"]["days"], 30);
        assert_eq!(data["stats"]["cases_in_period"], 6);
        assert_eq!(data["alerts"][0]["barangay"], "Poblacion");
        assert_eq!(data["alerts"][0]["level"], "watch");
        assert_eq!(data["cases"].as_array().unwrap().len(), 6);
        assert_eq!(data["barangay_data"][0]["total"], 6);
    }

    #[actix_web::test]
    async fn fleet_uses_defaults_without_forecast() {
        let h = harness(None, false).await;
        seed_cases(h.db(), "Tambo", 1).await;
        let app = service!(h);

        let req = test::TestRequest::get()
            .uri("/api/predictions/fleet")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let data = &body["data"];
        assert_eq!(data["live_weather"], false);
        assert_eq!(data["weather"]["temperature"], 28.0);
        assert_eq!(data["weather"]["humidity"], 70.0);
        assert_eq!(data["predictions"][0]["barangay"], "Tambo");
        assert_eq!(data["predictions"][0]["population"], 5000);
        assert_eq!(data["predictions"][0]["population_estimated"], true);
    }

    #[actix_web::test]
    async fn weather_failure_yields_empty_list() {
        let h = harness(None, false).await;
        let app = service!(h);

        let req = test::TestRequest::get().uri("/api/weather").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn saved_prediction_uses_forecast_and_appears_in_history() {
        let h = harness(Some(vec![sample_day()]), false).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/predictions")
            .set_json(serde_json::json!({"prediction_date": "2024-07-01", "population": 5000}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["prediction_date"], "2024-07-01");
        assert_eq!(body["data"]["predicted_cases"], 40.24);
        assert_eq!(body["data"]["risk_level"], "HIGH");
        assert_eq!(body["data"]["confidence_level"], 0.0);
        assert_eq!(body["data"]["weather_factor"], "30.0°C, 75.0% humidity");

        let req = test::TestRequest::get()
            .uri("/api/predictions/history?limit=5")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn blank_chat_message_skips_provider() {
        let h = harness(None, false).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_form([("message", "   ")])
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["response"], EMPTY_MESSAGE_REPLY);
        assert!(body["timestamp"].is_string());
        assert_eq!(h.provider.calls.load(Ordering::SeqCst), 0);
        assert!(
            queries::list_chat_exchanges(h.db(), 10)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[actix_web::test]
    async fn chat_answers_and_records_history() {
        let h = harness(Some(vec![sample_day()]), false).await;
        seed_cases(h.db(), "Poblacion", 2).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_form([("message", "Which barangay has the most cases?")])
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["response"], "Poblacion needs attention.");
        assert_eq!(h.provider.calls.load(Ordering::SeqCst), 1);

        let req = test::TestRequest::get().uri("/api/chat/history").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["data"][0]["message"],
            "Which barangay has the most cases?"
        );
    }

    #[actix_web::test]
    async fn chat_provider_failure_returns_fixed_message() {
        let h = harness(None, true).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_form([("message", "hello")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["response"],
            dengue_watch_ai::ChatFailure::RateLimited.user_message()
        );
    }

    #[actix_web::test]
    async fn notify_emails_officials_with_addresses() {
        let h = harness(None, false).await;
        let barangay_id = seed_cases(h.db(), "Poblacion", 11).await;
        for (name, email) in [
            ("Maria Cruz", Some("maria@example.org")),
            ("Jose Reyes", None),
            ("Maria C.", Some("MARIA@example.org")),
        ] {
            queries::insert_official(
                h.db(),
                &NewOfficial {
                    name: name.to_string(),
                    position: "Kagawad".to_string(),
                    barangay_id: Some(barangay_id),
                    contact_number: None,
                    email: email.map(ToString::to_string),
                },
            )
            .await
            .unwrap();
        }
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/alerts/notify?days=7")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["alerts"], 1);
        assert_eq!(body["data"]["recipients"], 1);

        let sent = h.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Dengue alert for 1 barangay(s)");
        assert!(sent[0].text.contains("Poblacion [WARNING]: 11 case(s), 11 active"));
    }

    #[actix_web::test]
    async fn notify_without_alerts_sends_nothing() {
        let h = harness(None, false).await;
        seed_cases(h.db(), "Poblacion", 1).await;
        let app = service!(h);

        let req = test::TestRequest::post()
            .uri("/api/alerts/notify")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["recipients"], 0);
        assert!(h.mailer.sent.lock().unwrap().is_empty());
    }
}
