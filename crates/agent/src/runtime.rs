use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use hotelier_core::clock::Clock;
use hotelier_core::format_date;

use crate::conversation::{SessionLog, Speaker, Turn};
use crate::guardrails::{GuardrailDecision, GuardrailPolicy, Role, ToolKind};
use crate::llm::{ChatMessage, ChatRequest, LlmClient, LlmReply, ToolCall};
use crate::tools::{failure, ToolRegistry};

/// Model round trips allowed for one user message.
pub const MAX_TOOL_ROUNDS: usize = 6;

const UNAVAILABLE_REPLY: &str = "I'm experiencing high traffic. Please try again.";
const EXHAUSTED_REPLY: &str =
    "I could not finish that request. Could you rephrase it or give me the details again?";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AgentReply {
    pub reply: String,
    /// Tools that actually ran, in call order.
    pub tools_used: Vec<String>,
    pub degraded: bool,
}

pub struct AgentRuntime {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    guardrails: GuardrailPolicy,
    sessions: SessionLog,
    clock: Arc<dyn Clock>,
    hotel_name: String,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry, clock: Arc<dyn Clock>) -> Self {
        Self {
            llm,
            tools,
            guardrails: GuardrailPolicy,
            sessions: SessionLog::default(),
            clock,
            hotel_name: "Grand Hotel".to_string(),
        }
    }

    pub fn with_hotel_name(mut self, hotel_name: impl Into<String>) -> Self {
        self.hotel_name = hotel_name.into();
        self
    }

    pub fn with_sessions(mut self, sessions: SessionLog) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }

    pub fn reset_session(&self, role: Role, session_id: &str) -> bool {
        self.sessions.reset(role, session_id)
    }

    pub async fn handle_message(
        &self,
        session_id: &str,
        role: Role,
        text: &str,
    ) -> Result<AgentReply> {
        let mut messages = vec![ChatMessage::System(self.system_prompt(role))];
        messages.extend(self.sessions.history(role, session_id).into_iter().map(|turn| {
            match turn.speaker {
                Speaker::User => ChatMessage::User(turn.content),
                Speaker::Assistant => ChatMessage::Assistant(turn.content),
            }
        }));
        messages.push(ChatMessage::User(text.to_string()));

        let tools = self.tools.definitions_for(role, &self.guardrails);
        let mut tools_used = Vec::new();
        let mut outcome = None;

        for _ in 0..MAX_TOOL_ROUNDS {
            let request = ChatRequest { messages: messages.clone(), tools: tools.clone() };
            match self.llm.complete(&request).await {
                Ok(LlmReply::Text(reply)) => {
                    outcome = Some((reply, false));
                    break;
                }
                Ok(LlmReply::ToolCalls(calls)) => {
                    messages.push(ChatMessage::AssistantToolCalls(calls.clone()));
                    for call in &calls {
                        let content = self.dispatch(role, call, &mut tools_used).await;
                        let call_id = call.id.clone();
                        messages.push(ChatMessage::ToolResult { call_id, content });
                    }
                }
                Err(error) => {
                    warn!(
                        event_name = "agent.llm_failed",
                        role = role.as_str(),
                        error = %error,
                        "llm completion failed"
                    );
                    outcome = Some((UNAVAILABLE_REPLY.to_string(), true));
                    break;
                }
            }
        }

        let (reply, degraded) = outcome.unwrap_or_else(|| {
            warn!(
                event_name = "agent.rounds_exhausted",
                role = role.as_str(),
                "tool rounds exhausted"
            );
            (EXHAUSTED_REPLY.to_string(), true)
        });

        if !degraded {
            self.sessions.append(role, session_id, [Turn::user(text), Turn::assistant(&reply)]);
        }
        Ok(AgentReply { reply, tools_used, degraded })
    }

    /// Runs one tool call and returns the JSON text handed back to the model.
    async fn dispatch(&self, role: Role, call: &ToolCall, tools_used: &mut Vec<String>) -> String {
        let Some(kind) = ToolKind::parse(&call.name) else {
            return failure(format!("Unknown tool `{}`.", call.name), "unknown_tool").to_string();
        };

        if let GuardrailDecision::Deny { reason_code, user_message, fallback_path } =
            self.guardrails.evaluate(role, kind)
        {
            info!(
                event_name = "agent.tool_denied",
                role = role.as_str(),
                tool = kind.tool_name(),
                reason_code,
                fallback_path,
                "tool call denied"
            );
            return failure(user_message, reason_code).to_string();
        }

        let Some(tool) = self.tools.get(kind.tool_name()) else {
            return failure("That action is not available right now.", "tool_unavailable")
                .to_string();
        };

        tools_used.push(kind.tool_name().to_string());
        match tool.execute(call.arguments.clone()).await {
            Ok(result) => {
                info!(
                    event_name = "agent.tool_executed",
                    role = role.as_str(),
                    tool = kind.tool_name(),
                    status = result["status"].as_str().unwrap_or("unknown"),
                    "tool executed"
                );
                result.to_string()
            }
            Err(error) => {
                warn!(
                    event_name = "agent.tool_failed",
                    tool = kind.tool_name(),
                    error = %error,
                    "tool execution failed"
                );
                failure("Something went wrong while processing that request.", "tool_failure")
                    .to_string()
            }
        }
    }

    fn system_prompt(&self, role: Role) -> String {
        let today = format_date(self.clock.today());
        match role {
            Role::Manager => format!(
                "You are the {hotel} Executive Assistant. Today is {today}.\n\
                 PROTOCOL:\n\
                 1. If asked about status, occupancy or revenue, run `hotel_stats`.\n\
                 2. If asked about a guest, run `get_guest_info` with their email.\n\
                 3. For who is in the house or arriving, use `get_occupancy`, `todays_check_ins` or `get_booking_schedule`.\n\
                 4. Summarize the data clearly and concisely.\n\
                 STRICT: Do not book rooms. You are an analyst.",
                hotel = self.hotel_name,
            ),
            Role::Guest => format!(
                "You are the {hotel} Concierge. Warm, professional and precise. Today is {today}.\n\
                 GOAL: Help the user book a room. Collect dates, room, guest count, name and email.\n\
                 PROTOCOL:\n\
                 1. If you do not have both check-in and check-out dates, ask for them. Never call `check_availability` without valid dates.\n\
                 2. Once you have dates, run `check_availability` and show the rooms that fit the party.\n\
                 3. Ask for the number of adults and children.\n\
                 4. Ask for name and email, then run `book_room`.\n\
                 RULES:\n\
                 - Never call a tool with placeholders like 'YYYY-MM-DD'. If a parameter is missing, ask.\n\
                 - One guest (same email) may book several rooms.\n\
                 - Once `book_room` succeeds, stop and say: 'Booking confirmed! Check your email.'\n\
                 - If the user gives every detail at once, book immediately.",
                hotel = self.hotel_name,
            ),
        }
    }
}
