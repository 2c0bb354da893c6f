//! Gateway glue for the TUI: the single connection attempt on startup and
//! the execution of session effects (render / send / close).

use std::collections::VecDeque;

use tracing::debug;

use crate::app::App;
use crate::session::{self, Effect, SessionEvent};
use crate::transcript::DisplayMessage;

impl App {
    /// Open the gateway connection. Safe to call again: while a transport
    /// exists this is a no-op.
    pub async fn connect_gateway(&mut self) {
        if self.link.is_open() {
            self.state
                .transcript
                .push(DisplayMessage::info("Already connected to gateway."));
            return;
        }

        let url = match self.state.config.gateway_endpoint() {
            Ok(url) => url,
            Err(err) => {
                self.apply_session_event(SessionEvent::TransportError(err.to_string()))
                    .await;
                return;
            }
        };

        debug!(%url, "connecting to gateway");
        self.apply_session_event(SessionEvent::ConnectRequested).await;
        let events = self.link_tx.clone();
        self.link.connect(&url, events).await;
    }

    /// Run one event through the session state machine and execute the
    /// resulting effects. A failed send feeds back in as a transport
    /// error, which terminates the session.
    pub async fn apply_session_event(&mut self, event: SessionEvent) {
        let mut queue: VecDeque<Effect> =
            session::dispatch(&mut self.state.session, event).into();

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Render(action) => self.state.transcript.apply(action),
                Effect::Send(frame) => {
                    if let Err(err) = self.link.send(&frame).await {
                        queue.extend(session::dispatch(
                            &mut self.state.session,
                            SessionEvent::TransportError(err.to_string()),
                        ));
                    }
                }
                Effect::Close => self.link.close().await,
            }
        }
    }
}
