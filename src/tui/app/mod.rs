mod input;
mod rendering;
mod stream;

use crate::api::{PlannerClient, StreamEvent};
use crate::config::TripDefaults;
use crate::session::PlanSession;
use crate::tui::form::TripForm;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

// Compact box-drawing logo (Calvin S figlet style)
const LOGO_1: &str = "╺┳╸┏━┓╻┏━┓╺┳┓┏━╸┏━╸╻┏ ";
const LOGO_2: &str = " ┃ ┣┳┛┃┣━┛ ┃┃┣╸ ┃  ┣┻┓";
const LOGO_3: &str = " ╹ ╹┗╸╹╹  ╺┻┛┗━╸┗━╸╹ ╹";

/// Which presentation the app is in: the trip form, or the streaming
/// results (agents + document).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Form,
    Results,
}

/// Result of the one-shot health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Unknown,
    Healthy,
    Unhealthy,
}

pub struct App {
    pub client: Arc<PlannerClient>,
    pub mode: Mode,
    pub form: TripForm,
    pub session: PlanSession,
    pub connectivity: Connectivity,
    /// Shared slot for the spawned probe task to write its result back.
    probe_slot: Arc<StdMutex<Option<bool>>>,
    probe_in_flight: bool,
    /// Receiver for the currently active plan stream, if any.
    pub stream_rx: Option<mpsc::UnboundedReceiver<StreamEvent>>,
    /// Cancellation token for the active stream's reader task.
    cancel: Option<CancellationToken>,
    /// Scroll offset from the bottom of the document. 0 = follow tail.
    pub scroll_offset: usize,
}

impl App {
    pub fn new(client: Arc<PlannerClient>, defaults: &TripDefaults) -> Self {
        Self {
            client,
            mode: Mode::Form,
            form: TripForm::from_defaults(defaults),
            session: PlanSession::new(),
            connectivity: Connectivity::Unknown,
            probe_slot: Arc::new(StdMutex::new(None)),
            probe_in_flight: false,
            stream_rx: None,
            cancel: None,
            scroll_offset: 0,
        }
    }

    pub fn logo() -> [&'static str; 3] {
        [LOGO_1, LOGO_2, LOGO_3]
    }

    /// Kick off the health probe in the background. Exactly one probe runs
    /// per call; repeated requests while one is in flight are ignored.
    pub fn probe_connectivity(&mut self) {
        if self.probe_in_flight {
            return;
        }
        self.probe_in_flight = true;
        let client = self.client.clone();
        let slot = self.probe_slot.clone();
        tokio::spawn(async move {
            let healthy = client.health_check().await;
            *slot.lock().unwrap() = Some(healthy);
        });
    }

    /// Pick up a finished probe result, if one landed since last tick.
    pub fn poll_connectivity(&mut self) {
        let result = self.probe_slot.lock().unwrap().take();
        if let Some(healthy) = result {
            self.probe_in_flight = false;
            self.connectivity = if healthy {
                Connectivity::Healthy
            } else {
                Connectivity::Unhealthy
            };
            info!("planner health probe: healthy={}", healthy);
        }
    }

    /// Validate the form and start streaming a new plan. Any previous stream
    /// is cancelled and its state cleared before the first new message.
    pub fn submit(&mut self) {
        let request = match self.form.build_request() {
            Ok(req) => req,
            Err(reason) => {
                self.form.error = Some(reason);
                return;
            }
        };
        info!(
            "submitting plan request for {}, {}",
            request.destination_city, request.destination_country
        );

        self.abandon_stream();
        self.session.reset();
        let token = CancellationToken::new();
        self.stream_rx = Some(self.client.stream_plan(&request, token.clone()));
        self.cancel = Some(token);
        self.mode = Mode::Results;
        self.scroll_offset = 0;
    }

    /// Return to the form, abandoning any in-flight stream. Accumulated
    /// results stay in the session until the next submit resets them.
    pub fn back_to_form(&mut self) {
        self.abandon_stream();
        self.mode = Mode::Form;
        self.form.error = None;
    }

    /// Cancel the active reader task and drop its receiver so messages from
    /// a superseded stream can never be applied.
    pub(super) fn abandon_stream(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.stream_rx = None;
    }

    /// Cleanup on exit.
    pub fn shutdown(&mut self) {
        self.abandon_stream();
    }
}
