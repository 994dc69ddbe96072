//! Minimal markdown to ratatui conversion for the itinerary document.
//!
//! Covers what the planner actually emits: headers, bullet and numbered
//! lists, blockquotes, code fences, and inline bold/italic/code. Not a
//! CommonMark implementation.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub fn markdown_to_lines(input: &str) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    let mut in_fence = false;

    for raw in input.lines() {
        if raw.trim_start().starts_with("```") {
            in_fence = !in_fence;
            out.push(Line::from(Span::styled(
                if in_fence { "  ╭───" } else { "  ╰───" },
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }
        if in_fence {
            out.push(Line::from(vec![
                Span::styled("  │ ", Style::default().fg(Color::DarkGray)),
                Span::styled(raw.to_string(), Style::default().fg(Color::Yellow)),
            ]));
            continue;
        }
        out.push(block_line(raw.trim_end()));
    }

    out
}

fn block_line(line: &str) -> Line<'static> {
    let trimmed = line.trim_start();

    // Headers: level sets indent and weight.
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return Line::from(Span::styled(
            format!("   {rest}"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return Line::from(Span::styled(
            format!("  {rest}"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
    }
    if let Some(rest) = trimmed.strip_prefix("# ") {
        return Line::from(Span::styled(
            rest.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
    }

    if let Some(rest) = trimmed.strip_prefix("> ") {
        let mut spans = vec![Span::styled("  ▎ ", Style::default().fg(Color::DarkGray))];
        spans.extend(inline_spans(rest));
        return Line::from(spans);
    }

    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        let mut spans = vec![Span::styled("  • ", Style::default().fg(Color::DarkGray))];
        spans.extend(inline_spans(rest));
        return Line::from(spans);
    }

    if let Some((num, rest)) = split_numbered(trimmed) {
        let mut spans = vec![Span::styled(
            format!("  {num}. "),
            Style::default().fg(Color::DarkGray),
        )];
        spans.extend(inline_spans(rest));
        return Line::from(spans);
    }

    if trimmed.is_empty() {
        return Line::from("");
    }

    let mut spans = vec![Span::raw("  ")];
    spans.extend(inline_spans(trimmed));
    Line::from(spans)
}

/// "2. text" → ("2", "text"), for purely numeric prefixes only.
fn split_numbered(line: &str) -> Option<(&str, &str)> {
    let dot = line.find(". ")?;
    let prefix = &line[..dot];
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((prefix, &line[dot + 2..]))
}

/// Split inline text at `**bold**`, `*italic*`, and `` `code` `` markers.
/// Unclosed markers are treated as literal text.
fn inline_spans(input: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let next_marker = ["**", "*", "`"]
            .iter()
            .filter_map(|m| rest.find(m).map(|i| (i, *m)))
            .min_by_key(|(i, m)| (*i, std::cmp::Reverse(m.len())));

        let Some((start, marker)) = next_marker else {
            spans.push(Span::raw(rest.to_string()));
            break;
        };

        let Some(len) = rest[start + marker.len()..].find(marker) else {
            // No closing marker — emit everything as plain text.
            spans.push(Span::raw(rest.to_string()));
            break;
        };

        if start > 0 {
            spans.push(Span::raw(rest[..start].to_string()));
        }
        let body = &rest[start + marker.len()..start + marker.len() + len];
        spans.push(Span::styled(body.to_string(), marker_style(marker)));
        rest = &rest[start + marker.len() + len + marker.len()..];
    }

    if spans.is_empty() {
        spans.push(Span::raw(String::new()));
    }
    spans
}

fn marker_style(marker: &str) -> Style {
    match marker {
        "**" => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        "*" => Style::default().add_modifier(Modifier::ITALIC),
        _ => Style::default().fg(Color::Yellow),
    }
}
