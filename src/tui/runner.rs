//! TUI runner: main loop that wires everything together.
//!
//! Creates terminal, spawns API calls, runs main TEA loop.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, warn};

use super::app::TuiApp;
use super::event::{Request, TuiMessage};
use super::layout;

/// Start whatever the last update queued.
pub fn start_requests(app: &mut TuiApp, tx: &mpsc::UnboundedSender<TuiMessage>) {
    for request in app.drain_requests() {
        match request {
            Request::Submit => match app.controller.prepare_submit() {
                Ok(submission) => {
                    app.in_flight += 1;
                    let call = app.controller.dispatch(submission);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(TuiMessage::CallCompleted(call.await));
                    });
                }
                Err(e) => app.status = Some(e.to_string()),
            },
            Request::RefreshTree => {
                let fetch = app.controller.start_tree_refresh(&mut app.results);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(TuiMessage::TreeLoaded(fetch.await));
                });
            }
        }
    }
}

/// Only key presses reach the app.
pub fn key_message(event: Event) -> Option<TuiMessage> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(TuiMessage::Input(key)),
        _ => None,
    }
}

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(mut app: TuiApp) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();

    let transport = app.controller.transport();
    let name_tx = tx.clone();
    tokio::spawn(async move {
        let name = match transport.database_name().await {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "cannot fetch database name");
                None
            }
        };
        let _ = name_tx.send(TuiMessage::DatabaseName(name));
    });

    start_requests(&mut app, &tx);

    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps
    let mut events = EventStream::new();

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            _ = render_interval.tick() => {
                if let Err(e) = terminal.draw(|f| layout::draw(f, &mut app)) {
                    break Err(e.into());
                }
            }
            Some(msg) = rx.recv() => {
                debug!(?msg, "tui message");
                app.update(msg);
            }
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => {
                    if let Some(msg) = key_message(event) {
                        app.update(msg);
                    }
                }
                Some(Err(e)) => break Err(e.into()),
                None => break Ok(()),
            },
        }

        start_requests(&mut app, &tx);

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}
