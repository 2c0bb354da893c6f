pub mod footer;
pub mod header;
pub mod messages;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Rect};

use crate::action::Action;
use crate::config::Config;
use crate::session::Session;
use crate::transcript::Transcript;
use crate::tui::{Event, EventResponse, Frame};

/// Whether keystrokes feed the input bar or navigate the transcript.
#[derive(Default, PartialEq, Eq, Clone, Copy)]
pub enum InputMode {
    /// Navigation keys are active (input bar is empty / not typing)
    #[default]
    Normal,
    /// User is typing in the input bar
    Input,
}

/// Shared state passed to every pane during update and draw.
pub struct PaneState<'a> {
    pub config: &'a Config,
    pub session: &'a Session,
    pub transcript: &'a Transcript,
    pub input_mode: InputMode,
    /// Animated waiting line shown below the newest message.
    pub loading_line: Option<String>,
}

/// A focusable, drawable pane — mirrors openapi-tui's `Pane` trait.
pub trait Pane {
    fn height_constraint(&self) -> Constraint;

    fn handle_events(
        &mut self,
        event: Event,
        state: &mut PaneState<'_>,
    ) -> Result<Option<EventResponse<Action>>> {
        match event {
            Event::Key(key) => self.handle_key_events(key, state),
            _ => Ok(None),
        }
    }

    #[allow(unused_variables)]
    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        state: &mut PaneState<'_>,
    ) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    #[allow(unused_variables)]
    fn update(&mut self, action: Action, state: &mut PaneState<'_>) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, state: &PaneState<'_>) -> Result<()>;
}
