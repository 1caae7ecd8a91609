use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use hotelier_core::booking::{parse_guest_count, parse_text_field, BookingRequest};
use hotelier_core::errors::{ApplicationError, BookingError};
use hotelier_core::format_date;
use hotelier_db::FrontDesk;

use crate::guardrails::{GuardrailPolicy, Role, ToolKind};

#[async_trait]
pub trait Tool: Send + Sync {
    fn kind(&self) -> ToolKind;
    fn description(&self) -> &'static str;
    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<Value>;

    fn name(&self) -> &'static str {
        self.kind().tool_name()
    }
}

/// What the model is told about a tool.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Every hotel tool, backed by one front desk.
    pub fn hotel(desk: Arc<FrontDesk>) -> Self {
        let mut registry = Self::default();
        registry.register(CheckAvailabilityTool { desk: Arc::clone(&desk) });
        registry.register(BookRoomTool { desk: Arc::clone(&desk) });
        registry.register(GuestHistoryTool { desk: Arc::clone(&desk) });
        registry.register(HotelStatsTool { desk: Arc::clone(&desk) });
        registry.register(OccupancyTool { desk: Arc::clone(&desk) });
        registry.register(CheckInsTool { desk: Arc::clone(&desk) });
        registry.register(ScheduleTool { desk });
        registry
    }

    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Definitions of the registered tools `role` may call, in a stable order.
    pub fn definitions_for(&self, role: Role, policy: &GuardrailPolicy) -> Vec<ToolDefinition> {
        policy
            .allowed_tools(role)
            .into_iter()
            .filter_map(|kind| self.get(kind.tool_name()))
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// `{status: "ok", message, data}`
pub fn success(message: impl Into<String>, data: impl Serialize) -> Result<Value> {
    Ok(json!({
        "status": "ok",
        "message": message.into(),
        "data": serde_json::to_value(data)?,
    }))
}

/// `{status: "error", message, error_kind}`
pub fn failure(message: impl Into<String>, error_kind: &str) -> Value {
    json!({
        "status": "error",
        "message": message.into(),
        "error_kind": error_kind,
    })
}

fn rejected(error: &ApplicationError) -> Value {
    failure(error.user_message(), error.kind())
}

fn text_arg(input: &Value, field: &'static str) -> Result<String, BookingError> {
    parse_text_field(field, input.get(field))
}

fn date_args(input: &Value) -> Result<(String, String), BookingError> {
    Ok((text_arg(input, "start_date")?, text_arg(input, "end_date")?))
}

fn optional_text_arg(input: &Value, field: &str) -> Option<String> {
    match input.get(field) {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

fn date_range_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "start_date": { "type": "string", "description": "Check-in date, YYYY-MM-DD" },
            "end_date": { "type": "string", "description": "Check-out date, YYYY-MM-DD" }
        },
        "required": ["start_date", "end_date"]
    })
}

fn no_arguments_schema() -> Value {
    json!({ "type": "object", "properties": {} })
}

struct CheckAvailabilityTool {
    desk: Arc<FrontDesk>,
}

#[async_trait]
impl Tool for CheckAvailabilityTool {
    fn kind(&self) -> ToolKind {
        ToolKind::CheckAvailability
    }

    fn description(&self) -> &'static str {
        "Checks room availability for given dates. Dates must be YYYY-MM-DD."
    }

    fn parameters(&self) -> Value {
        date_range_schema()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let (start, end) = match date_args(&input) {
            Ok(args) => args,
            Err(error) => return Ok(rejected(&ApplicationError::from(error))),
        };

        let report = match self.desk.check_availability(&start, &end).await {
            Ok(report) => report,
            Err(error) => return Ok(rejected(&error)),
        };

        let message = if report.rooms.is_empty() {
            "No rooms available for these dates.".to_string()
        } else {
            report
                .rooms
                .iter()
                .map(|room| {
                    format!(
                        "- Room {} ({}) - {} {} (Cap: {})",
                        room.room_number,
                        room.room_type,
                        self.desk.currency(),
                        room.nightly_rate,
                        room.capacity
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        success(message, &report)
    }
}

struct BookRoomTool {
    desk: Arc<FrontDesk>,
}

impl BookRoomTool {
    fn request(input: &Value) -> Result<BookingRequest, BookingError> {
        Ok(BookingRequest {
            room_number: text_arg(input, "room_number")?,
            guest_name: text_arg(input, "name")?,
            guest_email: text_arg(input, "email")?,
            start_date: text_arg(input, "start_date")?,
            end_date: text_arg(input, "end_date")?,
            adults: parse_guest_count("adults", input.get("adults"), 1)?,
            children: parse_guest_count("children", input.get("children"), 0)?,
        })
    }
}

#[async_trait]
impl Tool for BookRoomTool {
    fn kind(&self) -> ToolKind {
        ToolKind::BookRoom
    }

    fn description(&self) -> &'static str {
        "Books a room for a guest. Requires room number, guest name, email, dates (YYYY-MM-DD) and guest counts."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "room_number": { "type": "string", "description": "Room number, e.g. \"101\"" },
                "name": { "type": "string" },
                "email": { "type": "string" },
                "start_date": { "type": "string", "description": "YYYY-MM-DD" },
                "end_date": { "type": "string", "description": "YYYY-MM-DD" },
                "adults": { "type": "string", "description": "Number of adults, e.g. \"2\"" },
                "children": { "type": "string", "description": "Number of children, e.g. \"0\"" }
            },
            "required": ["room_number", "name", "email", "start_date", "end_date"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let request = match Self::request(&input) {
            Ok(request) => request,
            Err(error) => return Ok(rejected(&ApplicationError::from(error))),
        };

        match self.desk.book_room(&request).await {
            Ok(confirmation) => {
                let mut message = confirmation.message();
                if confirmation.delivery.is_degraded() {
                    message.push_str(" The confirmation email could not be sent.");
                }
                success(message, &confirmation)
            }
            Err(error) => Ok(rejected(&error)),
        }
    }
}

struct GuestHistoryTool {
    desk: Arc<FrontDesk>,
}

#[async_trait]
impl Tool for GuestHistoryTool {
    fn kind(&self) -> ToolKind {
        ToolKind::GuestHistory
    }

    fn description(&self) -> &'static str {
        "Fetches a guest's profile and booking history by email."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "email": { "type": "string" } },
            "required": ["email"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let email = match text_arg(&input, "email") {
            Ok(email) => email,
            Err(error) => return Ok(rejected(&ApplicationError::from(error))),
        };
        let history = match self.desk.guest_history(&email).await {
            Ok(history) => history,
            Err(error) => return Ok(rejected(&error)),
        };

        let stays = if history.stays.is_empty() {
            "No history".to_string()
        } else {
            history
                .stays
                .iter()
                .map(|record| {
                    format!(
                        "- Booking #{} | Room {}: {} to {} ({})",
                        record.booking.id,
                        record.room.room_number,
                        format_date(record.booking.stay.check_in()),
                        format_date(record.booking.stay.check_out()),
                        record.booking.status.as_str()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        let message = format!(
            "Name: {}\nEmail: {}\nPhone: {}\nBooking History:\n{stays}",
            history.guest.name, history.guest.email, history.guest.phone
        );
        success(message, &history)
    }
}

struct HotelStatsTool {
    desk: Arc<FrontDesk>,
}

#[async_trait]
impl Tool for HotelStatsTool {
    fn kind(&self) -> ToolKind {
        ToolKind::HotelStats
    }

    fn description(&self) -> &'static str {
        "Daily status report: occupancy rate, run-rate revenue, guests in-house and totals. Use for 'status', 'revenue' or 'occupancy' questions."
    }

    fn parameters(&self) -> Value {
        no_arguments_schema()
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        match self.desk.stats(self.desk.today()).await {
            Ok(stats) => success(stats.render_text(self.desk.currency()), &stats),
            Err(error) => Ok(rejected(&error)),
        }
    }
}

struct OccupancyTool {
    desk: Arc<FrontDesk>,
}

#[async_trait]
impl Tool for OccupancyTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Occupancy
    }

    fn description(&self) -> &'static str {
        "Lists guests staying tonight, marking those checking in today."
    }

    fn parameters(&self) -> Value {
        no_arguments_schema()
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        let rows = match self.desk.occupancy(self.desk.today()).await {
            Ok(rows) => rows,
            Err(error) => return Ok(rejected(&error)),
        };

        let message = if rows.is_empty() {
            "No guests in-house tonight.".to_string()
        } else {
            rows.iter()
                .map(|row| {
                    format!(
                        "- Room {}: {} ({} adults, {} children) until {} [{}]",
                        row.room_number,
                        row.guest_name,
                        row.adults,
                        row.children,
                        format_date(row.check_out),
                        row.status.label()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        success(message, &rows)
    }
}

struct CheckInsTool {
    desk: Arc<FrontDesk>,
}

#[async_trait]
impl Tool for CheckInsTool {
    fn kind(&self) -> ToolKind {
        ToolKind::CheckIns
    }

    fn description(&self) -> &'static str {
        "Lists guests checking in today."
    }

    fn parameters(&self) -> Value {
        no_arguments_schema()
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        let rows = match self.desk.check_ins(self.desk.today()).await {
            Ok(rows) => rows,
            Err(error) => return Ok(rejected(&error)),
        };

        let message = if rows.is_empty() {
            "No check-ins today.".to_string()
        } else {
            rows.iter()
                .map(|row| {
                    format!(
                        "- Room {}: {} ({} adults, {} children), leaving {}",
                        row.room_number,
                        row.guest_name,
                        row.adults,
                        row.children,
                        format_date(row.check_out)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        success(message, &rows)
    }
}

struct ScheduleTool {
    desk: Arc<FrontDesk>,
}

#[async_trait]
impl Tool for ScheduleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Schedule
    }

    fn description(&self) -> &'static str {
        "Active and upcoming bookings. With room_number, only that room's schedule."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "room_number": { "type": "string", "description": "Optional room filter, e.g. \"101\"" }
            }
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let room_number = optional_text_arg(&input, "room_number");
        let rows = match self.desk.schedule(self.desk.today(), room_number.as_deref()).await {
            Ok(rows) => rows,
            Err(error) => return Ok(rejected(&error)),
        };

        if rows.is_empty() {
            return success("No active or upcoming bookings found.", &rows);
        }

        let header = match &room_number {
            Some(room) => format!("Schedule for Room {room}"),
            None => "All Active & Upcoming Bookings".to_string(),
        };
        let lines = rows.iter().map(|row| {
            format!(
                "- {} to {}: Room {} ({}) | Guest: {} ({}) | Status: {}",
                format_date(row.check_in),
                format_date(row.check_out),
                row.room_number,
                row.room_type,
                row.guest_name,
                row.guest_email,
                row.status.label()
            )
        });
        let message = std::iter::once(header).chain(lines).collect::<Vec<_>>().join("\n");
        success(message, &rows)
    }
}
