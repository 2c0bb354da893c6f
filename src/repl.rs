//! Plain line-oriented client.
//!
//! The no-TUI front-end: reads lines from stdin, prints streamed reply
//! fragments as they arrive, and shows a spinner while a turn is pending.
//! Drives exactly the same session state machine as the TUI, so the login
//! flow, `quit`, and all error handling behave identically.

use std::collections::VecDeque;
use std::io::Write;

use anyhow::Result;
use indicatif::ProgressBar;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::gateway::{ClientFrame, GatewayLink, LinkEvent};
use crate::session::{self, Effect, RenderAction, Session, SessionEvent, SessionState};
use crate::theme;

pub async fn run(config: Config, debug_frames: bool) -> Result<()> {
    let url = config.gateway_endpoint()?;
    println!("{}", theme::info(&format!("Connecting to {url}…")));

    let (link_tx, mut link_rx) = mpsc::unbounded_channel();
    let mut link = GatewayLink::new();
    let mut session = Session::new();
    let mut printer = Printer::new(debug_frames);

    apply(
        &mut session,
        &mut link,
        &mut printer,
        SessionEvent::ConnectRequested,
    )
    .await;
    link.connect(&url, link_tx.clone()).await;

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let stdin_task = tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            maybe_event = link_rx.recv() => {
                let Some(event) = maybe_event else { break };
                if printer.debug_frames {
                    printer.raw_in(&event);
                }
                let terminal = matches!(
                    event,
                    LinkEvent::Closed { .. } | LinkEvent::TransportError(_)
                );
                apply(&mut session, &mut link, &mut printer, event.into()).await;
                if terminal {
                    break;
                }
            }
            maybe_line = input_rx.recv() => {
                let Some(line) = maybe_line else { break };
                apply(&mut session, &mut link, &mut printer, SessionEvent::Input(line)).await;
                if session.state() == SessionState::Terminated && !link.is_open() {
                    break;
                }
            }
        }
        printer.maybe_prompt(&session);
    }

    stdin_task.abort();
    link.shutdown();
    printer.clear_spinner();
    println!("{}", theme::warn("Disconnected."));
    Ok(())
}

/// Run one event through the state machine and execute the effects.
async fn apply(
    session: &mut Session,
    link: &mut GatewayLink,
    printer: &mut Printer,
    event: SessionEvent,
) {
    let mut queue: VecDeque<Effect> = session::dispatch(session, event).into();

    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::Render(action) => printer.render(action),
            Effect::Send(frame) => {
                if printer.debug_frames {
                    printer.raw_out(&frame);
                }
                if let Err(err) = link.send(&frame).await {
                    queue.extend(session::dispatch(
                        session,
                        SessionEvent::TransportError(err.to_string()),
                    ));
                }
            }
            Effect::Close => link.close().await,
        }
    }

    printer.sync_spinner(session);
}

/// Console output state: streamed-reply formatting, the processing
/// spinner, and prompt reprinting.
struct Printer {
    debug_frames: bool,
    /// Mid streamed reply: fragments are being printed without newlines.
    speaking: bool,
    spinner: Option<ProgressBar>,
    prompt_shown: bool,
}

impl Printer {
    fn new(debug_frames: bool) -> Self {
        Self {
            debug_frames,
            speaking: false,
            spinner: None,
            prompt_shown: false,
        }
    }

    fn render(&mut self, action: RenderAction) {
        self.clear_spinner();
        self.prompt_shown = false;

        match action {
            RenderAction::Info(text) => println!("{}", theme::info(&text)),
            RenderAction::Success(text) => println!("{}", theme::success(&text)),
            RenderAction::Warning(text) => println!("{}", theme::warn(&text)),
            RenderAction::Error(text) => self.break_reply_then(|| {
                println!("{}", theme::error(&text));
            }),
            RenderAction::Status { message, tool } => self.break_reply_then(|| {
                match tool {
                    Some(tool) => println!("{}", theme::warn(&format!("· {message} [{tool}]"))),
                    None => println!("{}", theme::warn(&format!("· {message}"))),
                }
            }),
            // The terminal already echoes what the user typed.
            RenderAction::User(_) => {}
            RenderAction::ReplyDelta(delta) => {
                if !self.speaking {
                    println!();
                    println!("{}", theme::heading("assistant:"));
                    self.speaking = true;
                }
                print!("{}", theme::info(&delta));
                let _ = std::io::stdout().flush();
            }
            RenderAction::CloseReply => {
                if self.speaking {
                    println!();
                    self.speaking = false;
                }
            }
            RenderAction::Raw(raw) => println!("{}", theme::muted(&raw)),
        }
    }

    /// Finish the streamed-reply line before printing a block line.
    fn break_reply_then(&mut self, print: impl FnOnce()) {
        if self.speaking {
            println!();
            self.speaking = false;
        }
        print();
    }

    /// Show the spinner while the session is waiting on the gateway with
    /// nothing streaming yet.
    fn sync_spinner(&mut self, session: &Session) {
        let waiting = session.state() == SessionState::Authenticating
            || (session.turn_pending() && !self.speaking);
        if waiting && self.spinner.is_none() {
            self.spinner = Some(theme::spinner("Processing…"));
        } else if !waiting {
            self.clear_spinner();
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Reprint the prompt once whenever input is accepted again.
    fn maybe_prompt(&mut self, session: &Session) {
        if session.input_enabled() && !self.prompt_shown && self.spinner.is_none() {
            print!("{} ", theme::accent(">>>"));
            let _ = std::io::stdout().flush();
            self.prompt_shown = true;
        }
    }

    fn raw_in(&mut self, event: &LinkEvent) {
        self.clear_spinner();
        println!("{}", theme::dim(&format!("RAW <<< {event:?}")));
    }

    fn raw_out(&mut self, frame: &ClientFrame) {
        if let Ok(json) = frame.encode() {
            println!("{}", theme::dim(&format!("RAW >>> {json}")));
        }
    }
}
