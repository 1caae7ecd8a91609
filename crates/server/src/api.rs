//! JSON API over the front desk and the assistant.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use hotelier_agent::{AgentRuntime, Role};
use hotelier_core::booking::{parse_guest_count, parse_text_field, BookingRequest};
use hotelier_core::dates::parse_calendar_date;
use hotelier_core::errors::{ApplicationError, BookingError, InterfaceError};
use hotelier_core::reporting::{DailyStats, OccupancyRow, ScheduleRow};
use hotelier_db::{AvailabilityReport, BookingConfirmation, DailyReport, FrontDesk, GuestHistory};

use crate::documents::{Document, DocumentRenderer};
use crate::scheduler;

const DEFAULT_SESSION_ID: &str = "default";

#[derive(Clone)]
pub struct ApiState {
    pub desk: Arc<FrontDesk>,
    pub agent: Arc<AgentRuntime>,
    pub renderer: Arc<DocumentRenderer>,
    pub receipts_dir: PathBuf,
    pub output_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub kind: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    fn internal(kind: &str, detail: impl std::fmt::Display) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        error!(
            event_name = "api.internal_error",
            correlation_id = %correlation_id,
            kind,
            error = %detail,
            "request failed"
        );
        let interface = InterfaceError::Internal {
            message: detail.to_string(),
            correlation_id: correlation_id.clone(),
        };
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ApiErrorBody {
                error: interface.user_message().to_string(),
                kind: kind.to_string(),
                correlation_id,
            },
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        let kind = value.kind().to_string();
        if !matches!(value, ApplicationError::Booking(_)) {
            warn!(
                event_name = "api.request_failed",
                correlation_id = %correlation_id,
                kind = %kind,
                error = %value,
                "request failed"
            );
        }

        let interface = value.into_interface(correlation_id);
        let (status, error) = match &interface {
            InterfaceError::BadRequest { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
            InterfaceError::NotFound { message, .. } => (StatusCode::NOT_FOUND, message.clone()),
            InterfaceError::Conflict { message, .. } => (StatusCode::CONFLICT, message.clone()),
            InterfaceError::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, interface.user_message().to_string())
            }
            InterfaceError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, interface.user_message().to_string())
            }
        };

        Self {
            status,
            body: ApiErrorBody {
                error,
                kind,
                correlation_id: interface.correlation_id().to_string(),
            },
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(value: BookingError) -> Self {
        ApplicationError::from(value).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/availability", get(availability))
        .route("/api/v1/bookings", post(create_booking))
        .route("/api/v1/bookings/{booking_id}/receipt", get(booking_receipt))
        .route("/api/v1/guests/{email}", get(guest_history))
        .route("/api/v1/reports/stats", get(stats))
        .route("/api/v1/reports/occupancy", get(occupancy))
        .route("/api/v1/reports/check-ins", get(check_ins))
        .route("/api/v1/reports/schedule", get(schedule))
        .route("/api/v1/reports/daily", post(run_daily_report))
        .route("/api/v1/chat", post(chat))
        .route("/api/v1/chat/reset", post(reset_chat))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Front desk
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Fields stay untyped so a missing or mistyped value is reported as an
/// `invalid_argument` error instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct BookingBody {
    #[serde(default)]
    pub room_number: Option<Value>,
    #[serde(default, alias = "guest_name")]
    pub name: Option<Value>,
    #[serde(default, alias = "guest_email")]
    pub email: Option<Value>,
    #[serde(default)]
    pub start_date: Option<Value>,
    #[serde(default)]
    pub end_date: Option<Value>,
    #[serde(default)]
    pub adults: Option<Value>,
    #[serde(default)]
    pub children: Option<Value>,
}

impl BookingBody {
    fn into_request(self) -> Result<BookingRequest, BookingError> {
        Ok(BookingRequest {
            room_number: parse_text_field("room_number", self.room_number.as_ref())?,
            guest_name: parse_text_field("name", self.name.as_ref())?,
            guest_email: parse_text_field("email", self.email.as_ref())?,
            start_date: parse_text_field("start_date", self.start_date.as_ref())?,
            end_date: parse_text_field("end_date", self.end_date.as_ref())?,
            adults: parse_guest_count("adults", self.adults.as_ref(), 1)?,
            children: parse_guest_count("children", self.children.as_ref(), 0)?,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, BookingError> {
    value
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .ok_or(BookingError::InvalidArgument { field, reason: "is required".to_string() })
}

pub async fn availability(
    State(state): State<ApiState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<AvailabilityReport>> {
    let start_date = required("start_date", &query.start_date)?;
    let end_date = required("end_date", &query.end_date)?;
    Ok(Json(state.desk.check_availability(start_date, end_date).await?))
}

pub async fn create_booking(
    State(state): State<ApiState>,
    body: Result<Json<BookingBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BookingConfirmation>)> {
    let Json(body) = body.map_err(|rejection| BookingError::InvalidArgument {
        field: "body",
        reason: rejection.body_text(),
    })?;
    let request = body.into_request()?;
    let confirmation = state.desk.book_room(&request).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Renders the receipt and keeps a copy under the receipts directory.
pub async fn booking_receipt(
    State(state): State<ApiState>,
    Path(booking_id): Path<i64>,
) -> ApiResult<Document> {
    let receipt = state.desk.receipt(booking_id).await?;
    let document = state
        .renderer
        .render_receipt(&receipt)
        .await
        .map_err(|error| ApiError::internal("render", error))?;

    match document.save(&state.receipts_dir).await {
        Ok(path) => info!(
            event_name = "receipt.archived",
            booking_id,
            path = %path.display(),
            "receipt archived"
        ),
        Err(error) => warn!(
            event_name = "receipt.archive_failed",
            booking_id,
            error = %error,
            "receipt not archived"
        ),
    }
    Ok(document)
}

pub async fn guest_history(
    State(state): State<ApiState>,
    Path(email): Path<String>,
) -> ApiResult<Json<GuestHistory>> {
    Ok(Json(state.desk.guest_history(&email).await?))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub as_of: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub as_of: Option<String>,
    pub room_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyReportResponse {
    #[serde(flatten)]
    pub report: DailyReport,
    pub archived: Option<String>,
}

fn reference_day(desk: &FrontDesk, as_of: Option<&str>) -> Result<NaiveDate, BookingError> {
    match as_of.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_calendar_date("as_of", raw),
        None => Ok(desk.today()),
    }
}

pub async fn stats(
    State(state): State<ApiState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<DailyStats>> {
    let as_of = reference_day(&state.desk, query.as_of.as_deref())?;
    Ok(Json(state.desk.stats(as_of).await?))
}

pub async fn occupancy(
    State(state): State<ApiState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<OccupancyRow>>> {
    let as_of = reference_day(&state.desk, query.as_of.as_deref())?;
    Ok(Json(state.desk.occupancy(as_of).await?))
}

pub async fn check_ins(
    State(state): State<ApiState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<OccupancyRow>>> {
    let as_of = reference_day(&state.desk, query.as_of.as_deref())?;
    Ok(Json(state.desk.check_ins(as_of).await?))
}

pub async fn schedule(
    State(state): State<ApiState>,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Json<Vec<ScheduleRow>>> {
    let as_of = reference_day(&state.desk, query.as_of.as_deref())?;
    Ok(Json(state.desk.schedule(as_of, query.room_number.as_deref()).await?))
}

pub async fn run_daily_report(
    State(state): State<ApiState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<DailyReportResponse>> {
    let as_of = reference_day(&state.desk, query.as_of.as_deref())?;
    let run = scheduler::run_once(&state.desk, &state.renderer, &state.output_dir, as_of).await?;
    Ok(Json(DailyReportResponse {
        report: run.report,
        archived: run.archived.map(|path| path.display().to_string()),
    }))
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
    pub role: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub role: Role,
    pub reply: String,
    pub tools_used: Vec<String>,
    pub degraded: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResetBody {
    pub role: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub session_id: String,
    pub role: Role,
    pub reset: bool,
}

fn chat_role(raw: Option<&str>) -> Result<Role, BookingError> {
    match raw {
        None => Ok(Role::Guest),
        Some(raw) => Role::parse(raw).ok_or(BookingError::InvalidArgument {
            field: "role",
            reason: "must be `guest` or `manager`".to_string(),
        }),
    }
}

fn session_id(raw: Option<String>) -> String {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string())
}

pub async fn chat(
    State(state): State<ApiState>,
    Json(body): Json<ChatBody>,
) -> ApiResult<Json<ChatResponse>> {
    let role = chat_role(body.role.as_deref())?;
    if body.message.trim().is_empty() {
        return Err(BookingError::InvalidArgument {
            field: "message",
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    let session_id = session_id(body.session_id);

    let reply = state
        .agent
        .handle_message(&session_id, role, body.message.trim())
        .await
        .map_err(|error| ApiError::internal("agent", error))?;

    Ok(Json(ChatResponse {
        session_id,
        role,
        reply: reply.reply,
        tools_used: reply.tools_used,
        degraded: reply.degraded,
    }))
}

pub async fn reset_chat(
    State(state): State<ApiState>,
    Json(body): Json<ResetBody>,
) -> ApiResult<Json<ResetResponse>> {
    let role = chat_role(body.role.as_deref())?;
    let session_id = session_id(body.session_id);
    let reset = state.agent.reset_session(role, &session_id);
    Ok(Json(ResetResponse { session_id, role, reset }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::{Query, State},
        http::{header, Request, StatusCode},
        Router,
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use hotelier_agent::{AgentRuntime, LlmReply, ScriptedLlm, ToolRegistry};
    use hotelier_core::clock::FixedClock;
    use hotelier_core::notify::{ImmediateSink, MemoryNotifier};
    use hotelier_db::{
        connect_with_settings, migrations, FrontDesk, RoomInventory, SqlHotelRepository,
    };

    use super::{availability, router, ApiState, AvailabilityQuery};
    use crate::documents::DocumentRenderer;

    struct Harness {
        state: ApiState,
        _dir: tempfile::TempDir,
    }

    async fn harness(replies: Vec<LlmReply>) -> Harness {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        RoomInventory::load(&pool).await.expect("seed");

        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 1, 1).expect("date")));
        let desk = Arc::new(FrontDesk::new(
            Arc::new(SqlHotelRepository::new(pool)),
            clock.clone(),
            Arc::new(ImmediateSink::new(Arc::new(MemoryNotifier::new()))),
        ));
        let agent = AgentRuntime::new(
            Arc::new(ScriptedLlm::new(replies)),
            ToolRegistry::hotel(desk.clone()),
            clock,
        );
        let renderer =
            DocumentRenderer::embedded("Grand Hotel", "Rs.").expect("templates").html_only();
        let dir = tempfile::tempdir().expect("tempdir");

        Harness {
            state: ApiState {
                desk,
                agent: Arc::new(agent),
                renderer: Arc::new(renderer),
                receipts_dir: dir.path().join("receipts"),
                output_dir: dir.path().join("reports"),
            },
            _dir: dir,
        }
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");

        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, payload)
    }

    fn booking(room: &str, email: &str) -> Value {
        json!({
            "room_number": room,
            "name": "Alice Smith",
            "email": email,
            "start_date": "2025-01-10",
            "end_date": "2025-01-12",
            "adults": "2",
        })
    }

    #[tokio::test]
    async fn availability_requires_both_dates() {
        let harness = harness(Vec::new()).await;

        let error = availability(
            State(harness.state.clone()),
            Query(AvailabilityQuery { start_date: Some("2025-01-10".to_string()), end_date: None }),
        )
        .await
        .expect_err("missing end date");

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.body.kind, "invalid_argument");
    }

    #[tokio::test]
    async fn availability_lists_open_rooms() {
        let harness = harness(Vec::new()).await;
        let app = router(harness.state.clone());

        let (status, payload) = send(
            app,
            "GET",
            "/api/v1/availability?start_date=2025-01-10&end_date=2025-01-12",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["rooms"].as_array().map(Vec::len), Some(10));
    }

    #[tokio::test]
    async fn double_booking_is_a_conflict_with_correlation_id() {
        let harness = harness(Vec::new()).await;
        let app = router(harness.state.clone());

        let (status, payload) =
            send(app.clone(), "POST", "/api/v1/bookings", Some(booking("101", "a@x.com"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payload["room"]["room_number"], "101");
        assert_eq!(payload["booking"]["adults"], 2);

        let (status, payload) =
            send(app, "POST", "/api/v1/bookings", Some(booking("101", "b@x.com"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(payload["kind"], "room_unavailable");
        assert_eq!(payload["error"], "Error: Room 101 is already booked.");
        assert!(!payload["correlation_id"].as_str().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn validation_and_lookup_errors_map_to_status_codes() {
        let harness = harness(Vec::new()).await;
        let app = router(harness.state.clone());

        let (status, payload) =
            send(app.clone(), "POST", "/api/v1/bookings", Some(booking("999", "a@x.com"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["kind"], "room_not_found");

        let mut past = booking("101", "a@x.com");
        past["start_date"] = json!("2024-12-30");
        let (status, payload) = send(app.clone(), "POST", "/api/v1/bookings", Some(past)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["kind"], "past_date");

        let (status, _) = send(app.clone(), "GET", "/api/v1/guests/nobody@x.com", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, payload) = send(app, "GET", "/api/v1/reports/stats?as_of=2025-1-5", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["kind"], "date_format");
    }

    #[tokio::test]
    async fn malformed_booking_bodies_are_invalid_arguments() {
        let harness = harness(Vec::new()).await;
        let app = router(harness.state.clone());

        let mut missing_room = booking("101", "a@x.com");
        missing_room.as_object_mut().expect("object").remove("room_number");
        let (status, payload) =
            send(app.clone(), "POST", "/api/v1/bookings", Some(missing_room)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["kind"], "invalid_argument");
        assert!(payload["error"].as_str().unwrap_or_default().contains("room_number"));
        assert!(!payload["correlation_id"].as_str().unwrap_or_default().is_empty());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/bookings")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"room_number\": "))
            .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json error body");
        assert_eq!(payload["kind"], "invalid_argument");

        let (status, _) = send(app.clone(), "GET", "/api/v1/guests/a@x.com", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "rejected bodies must not create guests");
    }

    #[tokio::test]
    async fn booking_accepts_numeric_room_numbers_and_prefixed_guest_fields() {
        let harness = harness(Vec::new()).await;
        let app = router(harness.state.clone());

        let body = json!({
            "room_number": 102,
            "name": "Alice Smith",
            "email": "a@x.com",
            "start_date": "2025-01-10",
            "end_date": "2025-01-12",
            "adults": 1,
        });
        let (status, payload) = send(app.clone(), "POST", "/api/v1/bookings", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payload["room"]["room_number"], "102");
        assert_eq!(payload["guest"]["name"], "Alice Smith");

        let body = json!({
            "room_number": "103",
            "guest_name": "Bob Jones",
            "guest_email": "b@x.com",
            "start_date": "2025-01-10",
            "end_date": "2025-01-12",
        });
        let (status, payload) = send(app, "POST", "/api/v1/bookings", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payload["guest"]["email"], "b@x.com");
        assert_eq!(payload["booking"]["adults"], 1);
    }

    #[tokio::test]
    async fn receipt_is_served_and_archived() {
        let harness = harness(Vec::new()).await;
        let app = router(harness.state.clone());

        let (status, payload) =
            send(app.clone(), "POST", "/api/v1/bookings", Some(booking("108", "a@x.com"))).await;
        assert_eq!(status, StatusCode::CREATED);
        let booking_id = payload["booking"]["id"].as_i64().expect("booking id");

        let request = Request::builder()
            .uri(format!("/api/v1/bookings/{booking_id}/receipt"))
            .body(Body::empty())
            .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let html = String::from_utf8(bytes.to_vec()).expect("utf-8");
        assert!(html.contains("Rs. 8400.00"));

        let archived = harness
            .state
            .receipts_dir
            .join(format!("receipt_Alice_Smith_{booking_id}.html"));
        assert!(archived.exists());

        let (status, payload) = send(app, "GET", "/api/v1/bookings/9999/receipt", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["kind"], "booking_not_found");
    }

    #[tokio::test]
    async fn reports_use_the_reference_day() {
        let harness = harness(Vec::new()).await;
        let app = router(harness.state.clone());
        send(app.clone(), "POST", "/api/v1/bookings", Some(booking("105", "a@x.com"))).await;

        let (status, payload) =
            send(app.clone(), "GET", "/api/v1/reports/stats?as_of=2025-01-10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["occupied_rooms"], 1);
        assert_eq!(payload["guests_in_house"], 2);

        let (_, payload) =
            send(app.clone(), "GET", "/api/v1/reports/check-ins?as_of=2025-01-10", None).await;
        assert_eq!(payload.as_array().map(Vec::len), Some(1));

        let (_, payload) =
            send(app.clone(), "GET", "/api/v1/reports/schedule?room_number=101", None).await;
        assert_eq!(payload.as_array().map(Vec::len), Some(0));

        let (status, payload) =
            send(app, "POST", "/api/v1/reports/daily?as_of=2025-01-10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["stats"]["occupied_rooms"], 1);
        assert!(payload["archived"].as_str().unwrap_or_default().ends_with(".html"));
    }

    #[tokio::test]
    async fn chat_replies_and_rejects_unknown_roles() {
        let harness = harness(vec![LlmReply::Text("Welcome to Grand Hotel!".to_string())]).await;
        let app = router(harness.state.clone());

        let (status, payload) =
            send(app.clone(), "POST", "/api/v1/chat", Some(json!({"message": "Hi"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["reply"], "Welcome to Grand Hotel!");
        assert_eq!(payload["role"], "guest");
        assert_eq!(payload["session_id"], "default");
        assert_eq!(payload["degraded"], false);

        let (status, payload) = send(
            app.clone(),
            "POST",
            "/api/v1/chat",
            Some(json!({"message": "Hi", "role": "owner"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["kind"], "invalid_argument");

        let (status, payload) =
            send(app, "POST", "/api/v1/chat/reset", Some(json!({"role": "guest"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["reset"], true);
    }
}
