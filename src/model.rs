use serde::{Deserialize, Serialize};

/// Trip parameters collected by the form and submitted to the planner API.
///
/// Built fresh per submission and never mutated afterwards. Field names match
/// the planner's request schema.
#[derive(Debug, Clone, Serialize)]
pub struct TravelRequest {
    pub destination_city: String,
    pub destination_country: String,
    pub depart_date: String,
    pub return_date: String,
    pub priority: Priority,
    pub budget_level: BudgetLevel,
    pub departure_airport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_airport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_preferences: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Food,
    Culture,
    History,
    Adventure,
    Relaxation,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Food,
        Priority::Culture,
        Priority::History,
        Priority::Adventure,
        Priority::Relaxation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Food => "food",
            Priority::Culture => "culture",
            Priority::History => "history",
            Priority::Adventure => "adventure",
            Priority::Relaxation => "relaxation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Budget,
    Moderate,
    Flexible,
    Luxury,
}

impl BudgetLevel {
    pub const ALL: [BudgetLevel; 4] = [
        BudgetLevel::Budget,
        BudgetLevel::Moderate,
        BudgetLevel::Flexible,
        BudgetLevel::Luxury,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BudgetLevel::Budget => "budget",
            BudgetLevel::Moderate => "moderate",
            BudgetLevel::Flexible => "flexible",
            BudgetLevel::Luxury => "luxury",
        }
    }
}

/// One incremental event from the planner's NDJSON stream.
///
/// The wire field is `type`; later `markdown_update`/`final` messages carry
/// the full document, not a delta, so arrival order matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_count: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Progress,
    MarkdownUpdate,
    Final,
    Error,
}

/// Per-agent status summary derived from the message stream.
#[derive(Debug, Clone)]
pub struct AgentActivity {
    pub agent: String,
    pub last_activity: String,
    pub status: AgentStatus,
    pub task_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Active,
    Completed,
    Idle,
}

impl AgentStatus {
    pub fn label(self) -> &'static str {
        match self {
            AgentStatus::Active => "active",
            AgentStatus::Completed => "completed",
            AgentStatus::Idle => "idle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_message_parses_wire_format() {
        let raw = r##"{"type":"markdown_update","agent":"Flights","content":"# Day 1","timestamp":"2026-08-25T10:00:00","character_count":7}"##;
        let msg: StreamMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.kind, MessageKind::MarkdownUpdate);
        assert_eq!(msg.agent.as_deref(), Some("Flights"));
        assert_eq!(msg.content, "# Day 1");
        assert_eq!(msg.character_count, Some(7));
    }

    #[test]
    fn stream_message_optionals_default() {
        let raw = r#"{"type":"progress","content":"Searching flights...","timestamp":"2026-08-25T10:00:00"}"#;
        let msg: StreamMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.kind, MessageKind::Progress);
        assert!(msg.agent.is_none());
        assert!(msg.character_count.is_none());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = r#"{"type":"heartbeat","content":"","timestamp":""}"#;
        assert!(serde_json::from_str::<StreamMessage>(raw).is_err());
    }

    #[test]
    fn request_serializes_with_wire_field_names() {
        let req = TravelRequest {
            destination_city: "Tokyo".into(),
            destination_country: "Japan".into(),
            depart_date: "2026-10-10".into(),
            return_date: "2026-10-17".into(),
            priority: Priority::Food,
            budget_level: BudgetLevel::Flexible,
            departure_airport: "LHR".into(),
            destination_airport: None,
            additional_preferences: Some("temples".into()),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["destination_city"], "Tokyo");
        assert_eq!(value["priority"], "food");
        assert_eq!(value["budget_level"], "flexible");
        assert_eq!(value["additional_preferences"], "temples");
        assert!(value.get("destination_airport").is_none());
    }
}
