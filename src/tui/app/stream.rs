use super::App;
use crate::api::StreamEvent;
use tracing::{debug, warn};

impl App {
    /// Drain everything already buffered on the active stream before a
    /// render pass, so the frame reflects the newest state.
    pub fn drain_stream_events(&mut self) {
        loop {
            let Some(rx) = self.stream_rx.as_mut() else {
                return;
            };
            match rx.try_recv() {
                Ok(ev) => self.handle_stream_event(ev),
                Err(_) => return,
            }
        }
    }

    /// Apply one event from the plan stream. Terminal messages (`final`,
    /// `error`) and transport failures end the stream; the session is left
    /// showing whatever accumulated.
    pub fn handle_stream_event(&mut self, ev: StreamEvent) {
        match ev {
            StreamEvent::Message(msg) => {
                debug!(kind = ?msg.kind, agent = ?msg.agent, "stream message");
                self.session.apply(&msg);
                if self.session.is_terminal() {
                    self.finish_stream();
                }
            }
            StreamEvent::TransportError(reason) => {
                warn!("stream transport failed: {}", reason);
                self.session.fail(reason);
                self.finish_stream();
            }
            StreamEvent::Closed => {
                // Server ended the body without a final message.
                self.session.end_of_stream();
                self.finish_stream();
            }
        }
    }

    fn finish_stream(&mut self) {
        self.abandon_stream();
    }
}
