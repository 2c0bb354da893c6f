//! Terminal lifecycle and the async event stream.
//!
//! Wraps `ratatui` + `crossterm`: raw mode and the alternate screen are
//! entered on `enter` and restored on `exit` (and on drop, so a panic
//! doesn't leave the terminal wedged). A background task multiplexes
//! crossterm input with tick and render intervals into one channel, which
//! keeps the whole application single-queue: one event is fully handled
//! before the next is looked at.

use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type Frame<'a> = ratatui::Frame<'a>;

const TICK_RATE: Duration = Duration::from_millis(250);
const FRAME_RATE: Duration = Duration::from_millis(33);

/// Events delivered to the application loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Tick,
    Render,
    Key(KeyEvent),
    Resize(u16, u16),
    Quit,
}

/// Result of offering an event to a pane: pass it on, or stop with an
/// action.
pub enum EventResponse<T> {
    Continue(T),
    Stop(T),
}

pub struct Tui {
    terminal: ratatui::Terminal<CrosstermBackend<Stdout>>,
    task: Option<JoinHandle<()>>,
    event_rx: mpsc::UnboundedReceiver<Event>,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: ratatui::Terminal::new(CrosstermBackend::new(stdout()))?,
            task: None,
            event_rx,
            event_tx,
        })
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.start();
        Ok(())
    }

    fn start(&mut self) {
        let tx = self.event_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(TICK_RATE);
            let mut render = tokio::time::interval(FRAME_RATE);
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    _ = render.tick() => {
                        if tx.send(Event::Render).is_err() {
                            break;
                        }
                    }
                    maybe = reader.next() => {
                        match maybe {
                            Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                                if tx.send(Event::Key(key)).is_err() {
                                    break;
                                }
                            }
                            Some(Ok(CrosstermEvent::Resize(w, h))) => {
                                let _ = tx.send(Event::Resize(w, h));
                            }
                            Some(Ok(_)) => {}
                            Some(Err(_)) | None => {
                                let _ = tx.send(Event::Quit);
                                break;
                            }
                        }
                    }
                }
            }
        }));
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop();
        if crossterm::terminal::is_raw_mode_enabled()? {
            crossterm::execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
