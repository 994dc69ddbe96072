use super::{App, Connectivity, Mode};
use crate::session::SessionPhase;
use crate::tui::form::FormField;
use crate::tui::{markdown, render};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

impl App {
    pub fn render(&mut self, f: &mut ratatui::Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        match self.mode {
            Mode::Form => self.render_form(f, chunks[0]),
            Mode::Results => self.render_results(f, chunks[0]),
        }
        self.render_status_bar(f, chunks[1]);
    }

    fn render_form(&self, f: &mut ratatui::Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let logo_style = Style::default().fg(Color::Cyan);
        let accent = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let [logo_1, logo_2, logo_3] = App::logo();
        let version = env!("CARGO_PKG_VERSION");
        let mut lines: Vec<Line<'static>> = vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {logo_1}"), logo_style)),
            Line::from(vec![
                Span::styled(format!("  {logo_2}"), logo_style),
                Span::styled(format!("   v{version}"), dim),
            ]),
            Line::from(vec![
                Span::styled(format!("  {logo_3}"), logo_style),
                Span::styled("   AI Travel Planner", accent),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Planner API  ", dim),
                Span::styled(
                    self.client.base_url().to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
        ];

        match self.connectivity {
            Connectivity::Unhealthy => {
                lines.extend(render::connectivity_banner(self.client.base_url()));
            }
            Connectivity::Unknown => {
                lines.push(Line::from(Span::styled(
                    "  Checking planner connectivity...",
                    dim,
                )));
                lines.push(Line::from(""));
            }
            Connectivity::Healthy => {}
        }

        for (i, field) in FormField::ORDER.iter().enumerate() {
            lines.push(self.form_field_line(*field, i == self.form.focus));
        }

        lines.push(Line::from(""));
        if let Some(err) = &self.form.error {
            lines.push(render::error_line(err));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "  Tab/↑↓ move · ←→ change choice · Enter plan the trip · Ctrl+C quit",
            dim,
        )));

        f.render_widget(Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }), area);
    }

    fn form_field_line(&self, field: FormField, focused: bool) -> Line<'static> {
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let value = self.form.value(field);
        let mut spans = vec![
            Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled(format!("{:<24}", field.label()), label_style),
        ];
        if field.is_choice() {
            let shown = if focused {
                format!("◂ {value} ▸")
            } else {
                value
            };
            spans.push(Span::styled(shown, Style::default().fg(Color::Magenta)));
        } else {
            spans.push(Span::styled(value, Style::default().fg(Color::White)));
            if focused {
                spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
            }
        }
        Line::from(spans)
    }

    fn render_results(&mut self, f: &mut ratatui::Frame, area: Rect) {
        // Agents take the left third, the document the rest — mirrors the
        // planner's reference layout.
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
            .split(area);

        let agents = Paragraph::new(Text::from(render::agent_lines(&self.session)))
            .wrap(Wrap { trim: false });
        f.render_widget(agents, columns[0]);

        self.render_document(f, columns[1]);
    }

    fn render_document(&mut self, f: &mut ratatui::Frame, area: Rect) {
        let mut lines = render::document_header(&self.session.document);
        if self.session.document.is_empty() {
            lines.extend(render::document_placeholder());
        } else {
            lines.extend(markdown::markdown_to_lines(&self.session.document.text));
        }
        if let Some(err) = &self.session.error {
            lines.push(Line::from(""));
            lines.push(render::error_line(err));
        }

        // Follow the tail as the document grows; scrolling up pins the view.
        let width = area.width.max(1) as usize;
        let total_wrapped: usize = lines
            .iter()
            .map(|line| {
                let w = line.width();
                if w == 0 {
                    1
                } else {
                    (w + width - 1) / width
                }
            })
            .sum();
        let max_scroll = total_wrapped.saturating_sub(area.height as usize);
        self.scroll_offset = self.scroll_offset.min(max_scroll);
        let scroll_y = max_scroll.saturating_sub(self.scroll_offset);

        let doc = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((scroll_y as u16, 0));
        f.render_widget(doc, area);
    }

    fn render_status_bar(&self, f: &mut ratatui::Frame, area: Rect) {
        let (phase_label, phase_color) = match (self.mode, self.session.phase) {
            (Mode::Form, _) => ("plan a trip", Color::DarkGray),
            (Mode::Results, SessionPhase::Streaming) => ("streaming", Color::Green),
            (Mode::Results, SessionPhase::Completed) => ("completed", Color::Cyan),
            (Mode::Results, SessionPhase::Failed) => ("failed", Color::Red),
            (Mode::Results, SessionPhase::Idle) => ("idle", Color::DarkGray),
        };

        let mut spans = vec![
            Span::styled(
                " tripdeck ",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw("  "),
            Span::styled(
                format!(" {phase_label} "),
                Style::default().fg(Color::White).bg(phase_color),
            ),
        ];
        if self.mode == Mode::Results {
            spans.push(Span::styled(
                format!("  {} messages", self.session.messages.len()),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::styled(
                "  ↑↓ scroll · n new trip",
                Style::default().fg(Color::DarkGray),
            ));
        }
        if self.connectivity == Connectivity::Unhealthy {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                " OFFLINE ",
                Style::default().fg(Color::White).bg(Color::Red),
            ));
        }

        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
