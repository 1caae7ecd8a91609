use serde::{Deserialize, Serialize};

/// Who is on the other end of the conversation. Each role sees a fixed tool set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Manager => "manager",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "guest" => Some(Self::Guest),
            "manager" => Some(Self::Manager),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    CheckAvailability,
    BookRoom,
    GuestHistory,
    HotelStats,
    Occupancy,
    CheckIns,
    Schedule,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        Self::CheckAvailability,
        Self::BookRoom,
        Self::GuestHistory,
        Self::HotelStats,
        Self::Occupancy,
        Self::CheckIns,
        Self::Schedule,
    ];

    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::CheckAvailability => "check_availability",
            Self::BookRoom => "book_room",
            Self::GuestHistory => "get_guest_info",
            Self::HotelStats => "hotel_stats",
            Self::Occupancy => "get_occupancy",
            Self::CheckIns => "todays_check_ins",
            Self::Schedule => "get_booking_schedule",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tool_name() == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allow,
    Deny { reason_code: &'static str, user_message: String, fallback_path: &'static str },
}

impl GuardrailDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Role-to-tool permissions. Managers never book; guests only search and book.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardrailPolicy;

impl GuardrailPolicy {
    pub fn evaluate(&self, role: Role, tool: ToolKind) -> GuardrailDecision {
        match (role, tool) {
            (Role::Guest, ToolKind::CheckAvailability | ToolKind::BookRoom) => {
                GuardrailDecision::Allow
            }
            (Role::Guest, _) => GuardrailDecision::Deny {
                reason_code: "guest_tool_disallowed",
                user_message:
                    "I can only check availability and book rooms here. Please contact the front desk for anything else."
                        .to_string(),
                fallback_path: "front_desk",
            },
            (Role::Manager, ToolKind::BookRoom) => GuardrailDecision::Deny {
                reason_code: "manager_booking_disallowed",
                user_message:
                    "Managers cannot book rooms from the assistant. Please use the guest booking flow."
                        .to_string(),
                fallback_path: "guest_booking_flow",
            },
            (Role::Manager, _) => GuardrailDecision::Allow,
        }
    }

    pub fn allowed_tools(&self, role: Role) -> Vec<ToolKind> {
        ToolKind::ALL.into_iter().filter(|tool| self.evaluate(role, *tool).is_allowed()).collect()
    }
}
