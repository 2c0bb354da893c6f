//! Session state machine.
//!
//! Tracks where the conversation stands, from first connect through login
//! to chatting, and decides how each piece of user input and each inbound
//! event is interpreted. All decisions go through [`dispatch`], which is
//! deterministic and does no I/O: it mutates the [`Session`] and returns a
//! list of [`Effect`]s for the caller to execute (render something, send a
//! frame, close the connection). Both the TUI and the plain-mode client
//! drive the same function, and tests drive it without any transport.
//!
//! State diagram:
//!
//! ```text
//! Disconnected → Connecting → AwaitingLogin ⇄ Authenticating → Authenticated
//!                                                                  │ "quit"
//!      any state ── closed / transport error ──────────────→ Terminated
//! ```
//!
//! `Terminated` is absorbing: there is no automatic reconnect, a new run
//! is the way back.

use strum::Display;

use crate::gateway::{ClientFrame, ServerEvent};

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    AwaitingLogin,
    Authenticating,
    Authenticated,
    Terminated,
}

impl SessionState {
    /// Short label for status displays.
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting…",
            SessionState::AwaitingLogin => "log in",
            SessionState::Authenticating => "authenticating…",
            SessionState::Authenticated => "connected",
            SessionState::Terminated => "terminated",
        }
    }
}

/// Mutable session record. Owned by the front-end event loop; touched only
/// through [`dispatch`].
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    session_id: Option<String>,
    /// A chat message is in flight and its turn has not ended yet.
    turn_pending: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn turn_pending(&self) -> bool {
        self.turn_pending
    }

    /// Input is accepted while waiting for credentials, or while chatting
    /// with no turn in flight.
    pub fn input_enabled(&self) -> bool {
        match self.state {
            SessionState::AwaitingLogin => true,
            SessionState::Authenticated => !self.turn_pending,
            _ => false,
        }
    }
}

/// Everything that can happen to a session: connection lifecycle, inbound
/// frames, and user input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The front-end asked to open the connection.
    ConnectRequested,
    /// The transport finished its handshake.
    Opened,
    /// The transport closed (either side).
    Closed { code: u16, reason: String },
    /// The transport failed to open or died mid-flight.
    TransportError(String),
    /// A decoded inbound frame.
    Frame(ServerEvent),
    /// An inbound frame that failed to decode.
    Malformed(String),
    /// A line submitted by the user.
    Input(String),
}

impl From<crate::gateway::LinkEvent> for SessionEvent {
    fn from(event: crate::gateway::LinkEvent) -> Self {
        use crate::gateway::LinkEvent;
        match event {
            LinkEvent::Opened => SessionEvent::Opened,
            LinkEvent::Frame(frame) => SessionEvent::Frame(frame),
            LinkEvent::Malformed(detail) => SessionEvent::Malformed(detail),
            LinkEvent::Closed { code, reason } => SessionEvent::Closed { code, reason },
            LinkEvent::TransportError(err) => SessionEvent::TransportError(err),
        }
    }
}

/// Instructions for the message renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderAction {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
    /// Informational progress line, optionally naming a backend tool.
    Status { message: String, tool: Option<String> },
    /// Echo of the user's own message.
    User(String),
    /// Append a fragment to the streamed assistant reply, opening one if
    /// none is open.
    ReplyDelta(String),
    /// Finalize the open streamed reply, if any.
    CloseReply,
    /// An unrecognized frame, displayed verbatim.
    Raw(String),
}

/// Side effects requested by [`dispatch`], executed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Render(RenderAction),
    Send(ClientFrame),
    /// Close the connection (user quit).
    Close,
}

/// Advance the session by one event.
///
/// Rejected inputs (empty text, too few login tokens, input while nothing
/// is connected) never produce a `Send` and never change state.
pub fn dispatch(session: &mut Session, event: SessionEvent) -> Vec<Effect> {
    match event {
        SessionEvent::ConnectRequested => match session.state {
            SessionState::Disconnected => {
                session.state = SessionState::Connecting;
                vec![render(RenderAction::Info("Connecting to gateway…".into()))]
            }
            // A transport already exists or the session is over; nothing to do.
            _ => Vec::new(),
        },

        SessionEvent::Opened => match session.state {
            SessionState::Connecting => {
                session.state = SessionState::AwaitingLogin;
                vec![
                    render(RenderAction::Success("Connected.".into())),
                    render(RenderAction::Info(
                        "Log in with: <email> <password>".into(),
                    )),
                ]
            }
            _ => Vec::new(),
        },

        SessionEvent::Closed { code, reason } => {
            let message = if reason.is_empty() {
                format!("Disconnected (code {code}).")
            } else {
                format!("Disconnected (code {code}): {reason}")
            };
            terminate(session, RenderAction::Warning(message))
        }

        SessionEvent::TransportError(err) => {
            terminate(session, RenderAction::Error(format!("Connection error: {err}")))
        }

        SessionEvent::Frame(frame) => handle_frame(session, frame),

        SessionEvent::Malformed(detail) => {
            // Protocol error: report it and treat it as turn-end so the
            // prompt comes back.
            session.turn_pending = false;
            vec![
                render(RenderAction::CloseReply),
                render(RenderAction::Error(format!(
                    "Unreadable frame from gateway: {detail}"
                ))),
            ]
        }

        SessionEvent::Input(text) => handle_input(session, text),
    }
}

fn render(action: RenderAction) -> Effect {
    Effect::Render(action)
}

/// Move to `Terminated` and surface `notice`, unless the session is
/// already over (a close after a user quit stays quiet).
fn terminate(session: &mut Session, notice: RenderAction) -> Vec<Effect> {
    if session.state == SessionState::Terminated {
        return Vec::new();
    }
    session.state = SessionState::Terminated;
    session.turn_pending = false;
    vec![render(RenderAction::CloseReply), render(notice)]
}

fn handle_frame(session: &mut Session, frame: ServerEvent) -> Vec<Effect> {
    match frame {
        ServerEvent::Text { content } => {
            vec![render(RenderAction::ReplyDelta(content))]
        }

        ServerEvent::Status { message, tool } => {
            session.turn_pending = false;
            vec![
                render(RenderAction::CloseReply),
                render(RenderAction::Status { message, tool }),
            ]
        }

        ServerEvent::Error { message } => {
            session.turn_pending = false;
            vec![
                render(RenderAction::CloseReply),
                render(RenderAction::Error(message)),
            ]
        }

        ServerEvent::End => {
            session.turn_pending = false;
            vec![render(RenderAction::CloseReply)]
        }

        ServerEvent::AuthSuccess { session_id } => {
            session.turn_pending = false;
            if session.state != SessionState::Terminated {
                session.state = SessionState::Authenticated;
            }
            session.session_id = Some(session_id.clone());
            vec![
                render(RenderAction::CloseReply),
                render(RenderAction::Success(format!(
                    "Authenticated. Session {session_id}."
                ))),
            ]
        }

        ServerEvent::AuthFailed { message } => {
            session.turn_pending = false;
            if session.state != SessionState::Terminated {
                session.state = SessionState::AwaitingLogin;
            }
            vec![
                render(RenderAction::CloseReply),
                render(RenderAction::Error(format!("Login failed: {message}"))),
            ]
        }

        // Superseded by auth_success; nothing to show.
        ServerEvent::Connection { .. } => {
            vec![render(RenderAction::CloseReply)]
        }

        ServerEvent::Unknown { raw, .. } => {
            vec![render(RenderAction::CloseReply), render(RenderAction::Raw(raw))]
        }
    }
}

fn handle_input(session: &mut Session, text: String) -> Vec<Effect> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    match session.state {
        SessionState::AwaitingLogin => {
            let tokens: Vec<&str> = text.split_whitespace().collect();
            if tokens.len() < 2 {
                return vec![render(RenderAction::Error(
                    "Enter your email and password separated by spaces.".into(),
                ))];
            }
            let email = tokens[0].to_string();
            let password = tokens[1..].join(" ");
            session.state = SessionState::Authenticating;
            vec![
                render(RenderAction::Info(format!("Signing in as {email}…"))),
                Effect::Send(ClientFrame::auth(email, password)),
            ]
        }

        SessionState::Authenticated => {
            if session.turn_pending {
                // Input is disabled while a turn is in flight; the UI gates
                // this too.
                return Vec::new();
            }
            if text.eq_ignore_ascii_case("quit") {
                session.state = SessionState::Terminated;
                return vec![
                    render(RenderAction::Info("Disconnecting…".into())),
                    Effect::Close,
                ];
            }
            session.turn_pending = true;
            vec![
                render(RenderAction::CloseReply),
                render(RenderAction::User(text.to_string())),
                Effect::Send(ClientFrame::chat(text)),
            ]
        }

        // Waiting for the auth result; typed text is dropped.
        SessionState::Authenticating => Vec::new(),

        SessionState::Disconnected | SessionState::Connecting | SessionState::Terminated => {
            vec![render(RenderAction::Warning(
                "Cannot send: gateway not connected.".into(),
            ))]
        }
    }
}
