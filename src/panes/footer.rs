use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Alignment, prelude::*, widgets::Paragraph};
use tui_input::{Input, backend::crossterm::EventHandler};
use unicode_width::UnicodeWidthStr;

use crate::action::Action;
use crate::panes::{InputMode, Pane, PaneState};
use crate::session::SessionState;
use crate::theme::tui_palette as tp;
use crate::tui::{EventResponse, Frame};

const PROMPT: &str = " > ";

/// Always-visible input bar at the bottom of the screen.
///
/// Typed lines are interpreted by the session state machine: credentials
/// while logging in, chat afterwards. The bar goes inert whenever the
/// session is not accepting input (turn in flight, terminated).
pub struct FooterPane {
    input: Input,
    input_history: Vec<String>,
    history_index: Option<usize>,
}

impl Default for FooterPane {
    fn default() -> Self {
        Self {
            input: Input::default(),
            input_history: Vec::new(),
            history_index: None,
        }
    }
}

impl FooterPane {
    pub fn new() -> Self {
        Self::default()
    }

    fn hint(state: &PaneState<'_>) -> &'static str {
        match state.session.state() {
            SessionState::AwaitingLogin | SessionState::Authenticating => {
                "<email> <password> → log in · ctrl-c → exit"
            }
            SessionState::Authenticated => "enter → send · quit → disconnect · ctrl-c → exit",
            SessionState::Terminated => "session over · ctrl-c → exit",
            _ => "ctrl-c → exit",
        }
    }
}

impl Pane for FooterPane {
    fn height_constraint(&self) -> Constraint {
        // 1 row for the status line, 1 row for the input line
        Constraint::Length(2)
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        state: &mut PaneState<'_>,
    ) -> Result<Option<EventResponse<Action>>> {
        // Ctrl-C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(EventResponse::Stop(Action::Quit)));
        }

        if !state.session.input_enabled() {
            // Swallow editing keys while inert, let everything else fall
            // through for scrolling.
            return match key.code {
                KeyCode::Char(_) | KeyCode::Enter | KeyCode::Backspace => {
                    Ok(Some(EventResponse::Stop(Action::Noop)))
                }
                _ => Ok(None),
            };
        }

        match state.input_mode {
            InputMode::Input => match key.code {
                KeyCode::Enter => {
                    let value = self.input.value().to_string();
                    self.input.reset();
                    self.history_index = None;
                    state.input_mode = InputMode::Normal;
                    if value.is_empty() {
                        return Ok(Some(EventResponse::Stop(Action::Noop)));
                    }
                    self.input_history.push(value.clone());
                    Ok(Some(EventResponse::Stop(Action::InputSubmit(value))))
                }
                KeyCode::Esc => {
                    self.input.reset();
                    self.history_index = None;
                    state.input_mode = InputMode::Normal;
                    Ok(Some(EventResponse::Stop(Action::Noop)))
                }
                KeyCode::Up => {
                    if !self.input_history.is_empty() {
                        let idx = match self.history_index {
                            Some(i) => i.saturating_sub(1),
                            None => self.input_history.len() - 1,
                        };
                        self.history_index = Some(idx);
                        self.input = Input::new(self.input_history[idx].clone());
                    }
                    Ok(Some(EventResponse::Stop(Action::Noop)))
                }
                KeyCode::Down => {
                    if let Some(idx) = self.history_index {
                        if idx + 1 < self.input_history.len() {
                            self.history_index = Some(idx + 1);
                            self.input = Input::new(self.input_history[idx + 1].clone());
                        } else {
                            self.history_index = None;
                            self.input.reset();
                        }
                    }
                    Ok(Some(EventResponse::Stop(Action::Noop)))
                }
                _ => {
                    self.input.handle_event(&CrosstermEvent::Key(key));
                    Ok(Some(EventResponse::Stop(Action::Noop)))
                }
            },
            InputMode::Normal => {
                // Any printable character starts typing
                if let KeyCode::Char(_) = key.code {
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT)
                    {
                        state.input_mode = InputMode::Input;
                        self.input.handle_event(&CrosstermEvent::Key(key));
                        return Ok(Some(EventResponse::Stop(Action::Noop)));
                    }
                }
                // Don't consume other keys in Normal mode
                Ok(None)
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, state: &PaneState<'_>) -> Result<()> {
        let status_area = Rect::new(area.x, area.y, area.width, 1);
        let input_area = Rect::new(area.x, area.y + 1, area.width, 1);

        let status = Paragraph::new(Line::from(Span::styled(
            format!(" {}", state.session.state().label()),
            Style::default().fg(tp::MUTED),
        )));
        frame.render_widget(status, status_area);

        let hint = Paragraph::new(Line::from(Span::styled(
            format!("{} ", Self::hint(state)),
            Style::default().fg(tp::MUTED),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(hint, status_area);

        let enabled = state.session.input_enabled();
        let input_style = if enabled {
            Style::default().fg(tp::TEXT)
        } else {
            Style::default().fg(tp::MUTED)
        };

        let prompt_width = PROMPT.width() as u16;
        let text_width = area.width.saturating_sub(prompt_width + 1);
        let scroll = self.input.visual_scroll(text_width as usize);

        frame.render_widget(
            Paragraph::new(Span::styled(PROMPT, Style::default().fg(tp::ACCENT))),
            Rect::new(input_area.x, input_area.y, prompt_width, 1),
        );
        frame.render_widget(
            Paragraph::new(Span::styled(self.input.value().to_string(), input_style))
                .scroll((0, scroll as u16)),
            Rect::new(input_area.x + prompt_width, input_area.y, text_width, 1),
        );

        if enabled && state.input_mode == InputMode::Input {
            let cursor_x = input_area.x
                + prompt_width
                + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x, input_area.y));
        }

        Ok(())
    }
}
