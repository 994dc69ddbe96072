pub mod app;
pub mod form;
pub mod markdown;
pub mod render;

use crate::api::{PlannerClient, StreamEvent};
use crate::config::TripDefaults;
use anyhow::Result;
use crossterm::event::{Event, EventStream};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::{Terminal, TerminalOptions, Viewport};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub async fn run_tui(base_url: &str, defaults: &TripDefaults) -> Result<()> {
    let client = Arc::new(PlannerClient::new(base_url));
    let mut terminal = setup_terminal()?;
    let mut app = app::App::new(client, defaults);

    // One-shot connectivity probe on mount; the user can retry manually.
    app.probe_connectivity();

    let tick_rate = Duration::from_millis(50);
    let mut event_stream = EventStream::new();

    loop {
        app.poll_connectivity();
        // Drain buffered stream events so each frame shows the newest state.
        app.drain_stream_events();

        terminal.draw(|f| app.render(f))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    if app.handle_key(key)? {
                        app.shutdown();
                        restore_terminal(terminal)?;
                        return Ok(());
                    }
                }
            }
            Some(ev) = next_stream_event(&mut app.stream_rx) => {
                app.handle_stream_event(ev);
            }
            _ = tokio::time::sleep(tick_rate) => {}
        }
    }
}

/// Await the next event from the active stream, or park forever when no
/// stream is running so the other select arms stay in charge.
async fn next_stream_event(
    rx: &mut Option<mpsc::UnboundedReceiver<StreamEvent>>,
) -> Option<StreamEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let (_, rows) = crossterm::terminal::size()?;
    let terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(rows),
        },
    )?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.show_cursor()?;
    Ok(())
}
