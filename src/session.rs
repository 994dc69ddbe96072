//! Per-submission streaming state: the message log, agent activity records,
//! and the accumulated itinerary document.
//!
//! Everything here is a plain reducer over [`StreamMessage`] values so it can
//! be exercised without a terminal or a live planner.

use crate::model::{AgentActivity, AgentStatus, MessageKind, StreamMessage};
use std::time::{Duration, Instant};

/// Snippet length for the per-agent "last activity" line.
const SNIPPET_CHARS: usize = 50;

/// How long the document's "updating" indicator stays lit after a
/// content-bearing message.
const UPDATING_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Streaming,
    Completed,
    Failed,
}

/// The accumulated itinerary document. Text is replaced wholesale on every
/// `markdown_update`/`final` message — the planner streams full documents,
/// not deltas.
#[derive(Debug)]
pub struct DocumentState {
    pub text: String,
    pub character_count: usize,
    pub last_update: String,
    updating_until: Option<Instant>,
}

impl DocumentState {
    fn new() -> Self {
        Self {
            text: String::new(),
            character_count: 0,
            last_update: String::new(),
            updating_until: None,
        }
    }

    /// True while the post-update indicator window is still open. Re-armed
    /// by every content-bearing message, so overlapping updates simply keep
    /// the indicator lit.
    pub fn is_updating(&self) -> bool {
        self.updating_until.map_or(false, |t| Instant::now() < t)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug)]
pub struct PlanSession {
    pub phase: SessionPhase,
    pub messages: Vec<StreamMessage>,
    pub agents: Vec<AgentActivity>,
    pub document: DocumentState,
    /// User-visible error for a failed submission. Stream `error` content is
    /// surfaced verbatim; transport failures get a generic message.
    pub error: Option<String>,
}

impl PlanSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            messages: Vec::new(),
            agents: Vec::new(),
            document: DocumentState::new(),
            error: None,
        }
    }

    /// Clear all accumulated state and enter the Streaming phase. Called at
    /// the start of every submission, before the first message arrives.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.agents.clear();
        self.document = DocumentState::new();
        self.error = None;
        self.phase = SessionPhase::Streaming;
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SessionPhase::Completed | SessionPhase::Failed)
    }

    /// Apply one stream message, in arrival order.
    pub fn apply(&mut self, msg: &StreamMessage) {
        self.messages.push(msg.clone());
        self.track_agent(msg);

        match msg.kind {
            MessageKind::MarkdownUpdate | MessageKind::Final => self.update_document(msg),
            MessageKind::Error => {
                // The document is left exactly as it was before this message.
                self.error = Some(msg.content.clone());
                self.phase = SessionPhase::Failed;
            }
            MessageKind::Progress => {}
        }

        if msg.kind == MessageKind::Final {
            // A final message closes the whole session, so every agent is
            // marked completed regardless of who sent it.
            for agent in &mut self.agents {
                agent.status = AgentStatus::Completed;
            }
            self.phase = SessionPhase::Completed;
        }
    }

    /// Terminate the session with a transport-level failure. Accumulated
    /// document/agent state stays visible — no rollback.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.phase = SessionPhase::Failed;
    }

    /// The stream ended cleanly without a `final` message. Whatever state
    /// accumulated stays on screen; agents keep their last status.
    pub fn end_of_stream(&mut self) {
        if self.phase == SessionPhase::Streaming {
            self.phase = SessionPhase::Completed;
        }
    }

    pub fn active_agents(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.status == AgentStatus::Active)
            .count()
    }

    fn track_agent(&mut self, msg: &StreamMessage) {
        let Some(name) = msg.agent.as_deref() else {
            return;
        };

        let snippet = activity_snippet(&msg.content);
        if let Some(existing) = self.agents.iter_mut().find(|a| a.agent == name) {
            existing.last_activity = snippet;
            existing.status = if msg.kind == MessageKind::Final {
                AgentStatus::Completed
            } else {
                AgentStatus::Active
            };
            existing.task_count += 1;
        } else {
            self.agents.push(AgentActivity {
                agent: name.to_string(),
                last_activity: snippet,
                status: AgentStatus::Active,
                task_count: 1,
            });
        }
    }

    fn update_document(&mut self, msg: &StreamMessage) {
        self.document.text = msg.content.clone();
        self.document.character_count = msg.character_count.unwrap_or(msg.content.chars().count());
        self.document.last_update = relative_from_now(&msg.timestamp);
        self.document.updating_until = Some(Instant::now() + UPDATING_WINDOW);
    }
}

/// Truncate message content to a short activity snippet: at most
/// `SNIPPET_CHARS` characters, with a `...` marker iff anything was cut.
pub fn activity_snippet(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Render a message timestamp as a relative "Ns ago" label at the moment of
/// processing. The planner emits naive local ISO timestamps, so both RFC 3339
/// and offset-less forms are accepted; unparseable input degrades to
/// "just now" rather than failing the message.
pub fn relative_from_now(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(t) => {
            let delta = chrono::Local::now().signed_duration_since(t);
            relative_label(delta.num_seconds())
        }
        None => "just now".to_string(),
    }
}

fn parse_timestamp(timestamp: &str) -> Option<chrono::DateTime<chrono::Local>> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.with_timezone(&chrono::Local));
    }
    chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| naive.and_local_timezone(chrono::Local).single())
}

fn relative_label(delta_secs: i64) -> String {
    if delta_secs < 5 {
        "just now".to_string()
    } else if delta_secs < 60 {
        format!("{delta_secs}s ago")
    } else if delta_secs < 3600 {
        format!("{}m ago", delta_secs / 60)
    } else if delta_secs < 86_400 {
        format!("{}h ago", delta_secs / 3600)
    } else {
        format!("{}d ago", delta_secs / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageKind;

    fn msg(kind: MessageKind, agent: Option<&str>, content: &str) -> StreamMessage {
        StreamMessage {
            kind,
            agent: agent.map(String::from),
            content: content.to_string(),
            timestamp: "2026-08-25T10:00:00".to_string(),
            character_count: None,
        }
    }

    #[test]
    fn agentless_message_leaves_agents_unchanged() {
        let mut session = PlanSession::new();
        session.reset();
        session.apply(&msg(MessageKind::Progress, None, "warming up"));
        assert!(session.agents.is_empty());
        assert_eq!(session.messages.len(), 1);
    }

    #[test]
    fn task_counts_match_messages_per_agent() {
        let mut session = PlanSession::new();
        session.reset();
        for _ in 0..3 {
            session.apply(&msg(MessageKind::Progress, Some("Flights"), "searching"));
        }
        session.apply(&msg(MessageKind::Progress, Some("Hotels"), "searching"));

        assert_eq!(session.agents.len(), 2);
        assert_eq!(session.agents[0].agent, "Flights");
        assert_eq!(session.agents[0].task_count, 3);
        assert_eq!(session.agents[0].status, AgentStatus::Active);
        assert_eq!(session.agents[1].task_count, 1);
    }

    #[test]
    fn final_completes_all_agents() {
        let mut session = PlanSession::new();
        session.reset();
        session.apply(&msg(MessageKind::Progress, Some("Flights"), "searching"));
        session.apply(&msg(MessageKind::Progress, Some("Hotels"), "searching"));
        // Final comes from a third agent entirely.
        session.apply(&msg(MessageKind::Final, Some("Supervisor"), "# Plan"));

        assert!(session
            .agents
            .iter()
            .all(|a| a.status == AgentStatus::Completed));
        assert_eq!(session.phase, SessionPhase::Completed);
    }

    #[test]
    fn document_is_replaced_not_appended() {
        let mut session = PlanSession::new();
        session.reset();
        session.apply(&msg(MessageKind::MarkdownUpdate, Some("Writer"), "# Day 1"));
        session.apply(&msg(
            MessageKind::MarkdownUpdate,
            Some("Writer"),
            "# Day 1\n## Day 2",
        ));
        assert_eq!(session.document.text, "# Day 1\n## Day 2");
    }

    #[test]
    fn character_count_falls_back_to_content_length() {
        let mut session = PlanSession::new();
        session.reset();
        session.apply(&msg(MessageKind::MarkdownUpdate, None, "# Day 1"));
        assert_eq!(session.document.character_count, 7);

        let mut with_count = msg(MessageKind::Final, None, "# Day 1");
        with_count.character_count = Some(42);
        session.apply(&with_count);
        assert_eq!(session.document.character_count, 42);
    }

    #[test]
    fn progress_messages_do_not_touch_document() {
        let mut session = PlanSession::new();
        session.reset();
        session.apply(&msg(MessageKind::MarkdownUpdate, None, "# Day 1"));
        session.apply(&msg(MessageKind::Progress, Some("Hotels"), "still looking"));
        assert_eq!(session.document.text, "# Day 1");
    }

    #[test]
    fn error_fails_session_and_preserves_document() {
        let mut session = PlanSession::new();
        session.reset();
        session.apply(&msg(MessageKind::MarkdownUpdate, None, "# Day 1"));
        session.apply(&msg(MessageKind::Error, None, "rate limited"));

        assert_eq!(session.phase, SessionPhase::Failed);
        assert_eq!(session.error.as_deref(), Some("rate limited"));
        assert_eq!(session.document.text, "# Day 1");
    }

    #[test]
    fn update_marks_document_as_updating() {
        let mut session = PlanSession::new();
        session.reset();
        assert!(!session.document.is_updating());
        session.apply(&msg(MessageKind::MarkdownUpdate, None, "# Day 1"));
        assert!(session.document.is_updating());
    }

    #[test]
    fn scenario_from_planner_stream() {
        let mut session = PlanSession::new();
        session.reset();

        session.apply(&msg(MessageKind::Progress, Some("Flights"), "searching"));
        session.apply(&msg(
            MessageKind::MarkdownUpdate,
            Some("Flights"),
            "# Day 1",
        ));
        let mut fin = msg(MessageKind::Final, Some("Hotels"), "# Day 1\n## Day 2");
        fin.character_count = Some(17);
        session.apply(&fin);

        assert_eq!(session.document.text, "# Day 1\n## Day 2");
        assert_eq!(session.document.character_count, 17);
        let flights = session.agents.iter().find(|a| a.agent == "Flights").unwrap();
        let hotels = session.agents.iter().find(|a| a.agent == "Hotels").unwrap();
        assert_eq!(flights.status, AgentStatus::Completed);
        assert_eq!(flights.task_count, 2);
        assert_eq!(hotels.status, AgentStatus::Completed);
        assert_eq!(hotels.task_count, 1);
    }

    #[test]
    fn reset_clears_previous_run() {
        let mut session = PlanSession::new();
        session.reset();
        session.apply(&msg(MessageKind::MarkdownUpdate, Some("Writer"), "# Day 1"));
        session.apply(&msg(MessageKind::Error, None, "boom"));

        session.reset();
        assert!(session.messages.is_empty());
        assert!(session.agents.is_empty());
        assert!(session.document.is_empty());
        assert!(session.error.is_none());
        assert_eq!(session.phase, SessionPhase::Streaming);
    }

    #[test]
    fn snippet_truncates_past_fifty_chars() {
        let short = "a".repeat(50);
        assert_eq!(activity_snippet(&short), short);
        assert!(!activity_snippet(&short).contains("..."));

        let long = "b".repeat(80);
        let snippet = activity_snippet(&long);
        assert_eq!(snippet.chars().count(), 53);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let multibyte = "東".repeat(60);
        let snippet = activity_snippet(&multibyte);
        assert_eq!(snippet.chars().count(), 53);
        assert!(snippet.starts_with('東'));
    }

    #[test]
    fn relative_labels_bucket_by_magnitude() {
        assert_eq!(relative_label(0), "just now");
        assert_eq!(relative_label(-30), "just now");
        assert_eq!(relative_label(12), "12s ago");
        assert_eq!(relative_label(90), "1m ago");
        assert_eq!(relative_label(7200), "2h ago");
        assert_eq!(relative_label(200_000), "2d ago");
    }

    #[test]
    fn naive_timestamps_are_accepted() {
        let now = chrono::Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();
        assert_eq!(relative_from_now(&now), "just now");
        assert_eq!(relative_from_now("not a timestamp"), "just now");
    }
}
