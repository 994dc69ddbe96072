//! Line-building helpers for the results view: agent activity rows and the
//! itinerary document header.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{AgentActivity, AgentStatus};
use crate::session::{DocumentState, PlanSession};

/// Agent activity panel: totals line plus one row pair per agent.
pub fn agent_lines(session: &PlanSession) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Agent Activity",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} messages · {} active",
                session.messages.len(),
                session.active_agents()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    if session.agents.is_empty() {
        lines.push(Line::from(Span::styled(
            "Waiting for agents...",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    for agent in &session.agents {
        lines.push(agent_row(agent));
        lines.push(Line::from(Span::styled(
            format!("    {}", agent.last_activity),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn agent_row(agent: &AgentActivity) -> Line<'static> {
    let (glyph, color) = match agent.status {
        AgentStatus::Active => ("●", Color::Green),
        AgentStatus::Completed => ("✓", Color::Cyan),
        AgentStatus::Idle => ("○", Color::DarkGray),
    };
    Line::from(vec![
        Span::styled(format!("  {glyph} "), Style::default().fg(color)),
        Span::styled(
            agent.agent.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} · {} tasks", agent.status.label(), agent.task_count),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Header above the markdown panel: title, character count, last update,
/// and the transient updating indicator.
pub fn document_header(doc: &DocumentState) -> Vec<Line<'static>> {
    let mut spans = vec![Span::styled(
        "Itinerary",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if !doc.is_empty() {
        spans.push(Span::styled(
            format!("  {} chars", doc.character_count),
            Style::default().fg(Color::DarkGray),
        ));
        if !doc.last_update.is_empty() {
            spans.push(Span::styled(
                format!("  updated {}", doc.last_update),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    if doc.is_updating() {
        spans.push(Span::styled(
            "  ⟳ updating",
            Style::default().fg(Color::Green),
        ));
    }
    vec![Line::from(spans), Line::from("")]
}

pub fn document_placeholder() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Your travel plan will appear here...",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

pub fn error_line(message: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            " ✗ ",
            Style::default().fg(Color::White).bg(Color::Red),
        ),
        Span::raw(" "),
        Span::styled(message.to_string(), Style::default().fg(Color::Red)),
    ])
}

pub fn connectivity_banner(base_url: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                " ! ",
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            Span::styled(
                format!(" Cannot reach the planner API at {base_url}"),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(Span::styled(
            "   Make sure the server is running, then press Ctrl+R to retry.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MessageKind, StreamMessage};

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn agent_panel_shows_counts_and_rows() {
        let mut session = PlanSession::new();
        session.reset();
        session.apply(&StreamMessage {
            kind: MessageKind::Progress,
            agent: Some("Flights".into()),
            content: "searching JL routes".into(),
            timestamp: String::new(),
            character_count: None,
        });

        let lines = agent_lines(&session);
        assert_eq!(text_of(&lines[1]), "1 messages · 1 active");
        assert!(text_of(&lines[3]).contains("Flights"));
        assert!(text_of(&lines[3]).contains("1 tasks"));
        assert!(text_of(&lines[4]).contains("searching JL routes"));
    }

    #[test]
    fn empty_panel_shows_waiting_line() {
        let mut session = PlanSession::new();
        session.reset();
        let lines = agent_lines(&session);
        assert!(text_of(lines.last().unwrap()).contains("Waiting"));
    }
}
