use crate::backend::AvailabilityBackend;
use crate::configuration::Configuration;
use crate::error::BookingError;
use crate::types::Developer;
use crate::AppState;
use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DaySelectionRequest {
    #[serde(rename = "developerId")]
    developer_id: String,
    #[serde(rename = "dayOfWeek")]
    day_of_week: u32,
    times: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct WeekQuery {
    developer: String,
    start: String,
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Fixed-window request budget per client IP.
#[derive(Clone)]
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    hits: Arc<Mutex<HashMap<IpAddr, (Instant, u32)>>>,
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn allow(&self, client: IpAddr) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap();
        // expired windows are dropped wholesale, so the map stays bounded
        // by the number of clients active within one window
        hits.retain(|_, (window_start, _)| now.duration_since(*window_start) < self.window);
        let entry = hits.entry(client).or_insert((now, 0));
        entry.1 += 1;
        entry.1 <= self.max_per_window
    }
}

async fn rate_limit(
    State(limiter): State<RateLimiter>,
    ConnectInfo(address): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    if !limiter.allow(address.ip()) {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorBody {
                error: "too many requests, retry later".into(),
            }),
        )
            .into_response());
    }
    Ok(next.run(request).await)
}

pub fn create_app<T: AvailabilityBackend>(backend: T, rate_limiter: RateLimiter) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState { backend };

    Router::new()
        .route(
            "/api/availability",
            get(get_availability).post(replace_availability),
        )
        .route("/api/availability/week", get(get_week_availability))
        .route("/api/availability/day", post(set_day_availability))
        .route("/api/book", post(book_slot))
        .route("/api/cancel", post(cancel_slot))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit))
        .with_state(state)
        .layer(cors)
}

pub async fn start_server<T: AvailabilityBackend>(backend: T, configuration: impl Configuration) {
    let rate_limiter = RateLimiter::new(
        configuration.rate_limit_per_minute(),
        Duration::from_secs(60),
    );
    let app = create_app(backend, rate_limiter);

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessable at:\n{}", address.clone());
    let listener = tokio::net::TcpListener::bind(address).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

async fn get_availability<T: AvailabilityBackend>(
    State(state): State<AppState<T>>,
) -> Result<impl IntoResponse, BookingError> {
    Ok(Json(state.backend.document()?))
}

// Missing or non-string fields fall through as empty strings so the engine
// reports the specific validation reason with a 400 instead of the
// extractor's generic rejection.
fn string_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field).and_then(Value::as_str).unwrap_or_default()
}

async fn book_slot<T: AvailabilityBackend>(
    State(state): State<AppState<T>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, BookingError> {
    let slot = state.backend.book_slot(
        string_field(&body, "date"),
        string_field(&body, "time"),
        string_field(&body, "clientName"),
    )?;
    info!(date = %slot.date, time = %slot.time, "slot booked");
    Ok(Json(json!({ "success": true, "slot": slot })))
}

async fn cancel_slot<T: AvailabilityBackend>(
    State(state): State<AppState<T>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, BookingError> {
    let date = string_field(&body, "date");
    let time = string_field(&body, "time");
    state.backend.cancel_slot(date, time)?;
    info!(%date, %time, "booking cancelled");
    Ok(Json(json!({ "success": true })))
}

async fn replace_availability<T: AvailabilityBackend>(
    State(state): State<AppState<T>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, BookingError> {
    let Some(developers) = body.get("developers").filter(|value| value.is_array()) else {
        return Err(BookingError::validation("developers must be a list"));
    };
    let developers: Vec<Developer> = serde_json::from_value(developers.clone())
        .map_err(|err| BookingError::validation(format!("invalid developers payload: {err}")))?;

    state.backend.replace_developers(developers)?;
    Ok(Json(json!({ "success": true })))
}

async fn set_day_availability<T: AvailabilityBackend>(
    State(state): State<AppState<T>>,
    Json(request): Json<DaySelectionRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let ranges = state.backend.set_day_availability(
        &request.developer_id,
        request.day_of_week,
        &request.times,
    )?;
    Ok(Json(json!({ "success": true, "slots": ranges })))
}

async fn get_week_availability<T: AvailabilityBackend>(
    State(state): State<AppState<T>>,
    Query(query): Query<WeekQuery>,
) -> Result<impl IntoResponse, BookingError> {
    let days = state
        .backend
        .week_availability(&query.developer, &query.start)?;
    Ok(Json(days))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "timestamp": Utc::now() }))
}
