use crate::config::Config;
use crate::panes::InputMode;
use crate::session::{Session, SessionState};
use crate::theme::SPINNER_FRAMES;
use crate::transcript::Transcript;

pub struct SharedState {
    pub config: Config,
    pub session: Session,
    pub transcript: Transcript,
    pub input_mode: InputMode,
    /// Advances on every tick; drives the waiting-line spinner.
    pub loading_tick: usize,
}

impl SharedState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: Session::new(),
            transcript: Transcript::new(),
            input_mode: InputMode::default(),
            loading_tick: 0,
        }
    }

    /// The animated waiting line, when something is worth waiting for:
    /// the auth handshake, or a sent chat message with no reply text yet.
    pub fn loading_line(&self) -> Option<String> {
        let label = if self.session.state() == SessionState::Authenticating {
            "Authenticating…"
        } else if self.session.turn_pending() && !self.transcript.reply_open() {
            "Waiting for reply…"
        } else {
            return None;
        };
        let frame = SPINNER_FRAMES[self.loading_tick % SPINNER_FRAMES.len()];
        Some(format!("{frame} {label}"))
    }

    pub fn pane_state(&self) -> crate::panes::PaneState<'_> {
        crate::panes::PaneState {
            config: &self.config,
            session: &self.session,
            transcript: &self.transcript,
            input_mode: self.input_mode,
            loading_line: self.loading_line(),
        }
    }
}
