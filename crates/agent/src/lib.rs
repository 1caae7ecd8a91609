//! Conversational front desk.
//!
//! The agent lets guests search and book rooms and lets managers query the
//! day's numbers, all through the same `FrontDesk` operations the HTTP API uses:
//! - `guardrails` fixes which tools each `Role` may call
//! - `tools` wraps front desk operations as JSON-in/JSON-out tools
//! - `conversation` keeps bounded per-session history
//! - `llm` talks to an OpenAI-compatible chat-completions endpoint
//! - `runtime` loops model and tools for one user message
//!
//! The model only chooses which tool to call and phrases the answer. Dates,
//! capacity, availability and prices are always decided by the booking core.

pub mod conversation;
pub mod guardrails;
pub mod llm;
pub mod runtime;
pub mod tools;

pub use conversation::{SessionLog, Turn};
pub use guardrails::{GuardrailDecision, GuardrailPolicy, Role, ToolKind};
pub use llm::{LlmClient, LlmReply, OpenAiCompatibleClient, ScriptedLlm};
pub use runtime::{AgentReply, AgentRuntime};
pub use tools::ToolRegistry;
