use crate::model::{StreamMessage, TravelRequest};
use futures_util::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// One event delivered to the TUI from an active plan stream.
#[derive(Debug)]
pub enum StreamEvent {
    Message(StreamMessage),
    /// The transport failed mid-stream. Carries a user-presentable reason.
    TransportError(String),
    /// The server closed the stream body.
    Closed,
}

pub struct PlannerClient {
    base_url: String,
    client: Client,
}

impl PlannerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One-shot health probe against the planner.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Submit a trip request and stream the planner's NDJSON response.
    ///
    /// The body is consumed in a background task that forwards one
    /// [`StreamEvent`] per parsed line. The task exits promptly when `cancel`
    /// fires or the receiver is dropped, releasing the connection. There is
    /// no automatic retry — a failed stream ends the submission.
    pub fn stream_plan(
        &self,
        request: &TravelRequest,
        cancel: CancellationToken,
    ) -> mpsc::UnboundedReceiver<StreamEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.client.clone();
        let url = format!("{}/generate-travel-plan", self.base_url);
        let request = request.clone();

        tokio::spawn(async move {
            let sent = tokio::select! {
                _ = cancel.cancelled() => return,
                resp = client.post(&url).json(&request).send() => resp,
            };

            let resp = match sent {
                Ok(r) if r.status().is_success() => r,
                Ok(r) => {
                    warn!("plan request rejected: {}", r.status());
                    let _ = tx.send(StreamEvent::TransportError(format!(
                        "The planner rejected the request ({})",
                        r.status()
                    )));
                    return;
                }
                Err(e) => {
                    warn!("plan request failed: {}", e);
                    let _ = tx.send(StreamEvent::TransportError(
                        "Could not reach the planner API".to_string(),
                    ));
                    return;
                }
            };

            let mut body = resp.bytes_stream();
            let mut buf = String::new();

            loop {
                let chunk = tokio::select! {
                    _ = cancel.cancelled() => return,
                    chunk = body.next() => chunk,
                };
                match chunk {
                    Some(Ok(bytes)) => {
                        buf.push_str(&String::from_utf8_lossy(&bytes));
                        // One JSON message per newline-terminated line.
                        while let Some(pos) = buf.find('\n') {
                            let line: String = buf.drain(..=pos).collect();
                            if let Some(msg) = parse_stream_line(&line) {
                                if tx.send(StreamEvent::Message(msg)).is_err() {
                                    return; // receiver dropped
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!("plan stream interrupted: {}", e);
                        let _ = tx.send(StreamEvent::TransportError(
                            "The connection to the planner was interrupted".to_string(),
                        ));
                        return;
                    }
                    None => break,
                }
            }

            // A final message without a trailing newline still counts.
            if let Some(msg) = parse_stream_line(&buf) {
                let _ = tx.send(StreamEvent::Message(msg));
            }
            let _ = tx.send(StreamEvent::Closed);
        });

        rx
    }
}

/// Parse one NDJSON line into a message. Blank lines yield nothing;
/// malformed lines are skipped with a warning rather than killing the stream.
fn parse_stream_line(line: &str) -> Option<StreamMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<StreamMessage>(line) {
        Ok(msg) => Some(msg),
        Err(e) => {
            warn!("skipping malformed stream line: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageKind;

    #[test]
    fn parses_a_valid_line() {
        let line = r#"{"type":"progress","agent":"Flights","content":"searching","timestamp":"2026-08-25T10:00:00"}"#;
        let msg = parse_stream_line(line).unwrap();
        assert_eq!(msg.kind, MessageKind::Progress);
        assert_eq!(msg.agent.as_deref(), Some("Flights"));
    }

    #[test]
    fn blank_and_malformed_lines_are_skipped() {
        assert!(parse_stream_line("").is_none());
        assert!(parse_stream_line("   \n").is_none());
        assert!(parse_stream_line("{not json").is_none());
        assert!(parse_stream_line(r#"{"type":"unknown_kind","content":""}"#).is_none());
    }

    #[test]
    fn base_url_is_normalized() {
        let client = PlannerClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
