use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::action::Action;
use crate::markdown;
use crate::panes::{InputMode, Pane, PaneState};
use crate::theme::tui_palette as tp;
use crate::transcript::{DisplayMessage, MessageRole};
use crate::tui::{EventResponse, Frame};

pub struct MessagesPane {
    /// Vertical scroll offset in visual (wrapped) lines from the bottom.
    /// `usize::MAX` = pinned to the newest content (auto-scroll).
    scroll_offset: usize,
}

impl MessagesPane {
    pub fn new() -> Self {
        Self {
            scroll_offset: usize::MAX,
        }
    }

    /// Map a [`MessageRole`] to its foreground colour.
    fn role_color(role: MessageRole) -> Color {
        match role {
            MessageRole::User => tp::ACCENT_BRIGHT,
            MessageRole::Assistant => tp::TEXT,
            MessageRole::Info => tp::INFO,
            MessageRole::Success => tp::SUCCESS,
            MessageRole::Warning => tp::WARN,
            MessageRole::Error => tp::ERROR,
            MessageRole::Status => tp::WARN,
        }
    }

    /// Build the styled display lines for one message, with an optional
    /// full-width background per line.
    fn build_lines(msg: &DisplayMessage) -> Vec<(Line<'static>, Option<Color>)> {
        let color = Self::role_color(msg.role);

        match msg.role {
            // Assistant replies re-render as markdown after every append.
            MessageRole::Assistant => markdown::render_markdown(&msg.content, color)
                .into_iter()
                .map(|line| {
                    let mut spans = vec![Span::raw(" ")];
                    spans.extend(line.spans);
                    (Line::from(spans), Some(tp::BG_ASSISTANT))
                })
                .collect(),

            MessageRole::User => msg
                .content
                .lines()
                .map(|text| {
                    let line = Line::from(vec![
                        Span::raw(" "),
                        Span::styled(text.to_string(), Style::default().fg(color)),
                    ]);
                    (line, Some(tp::BG_USER))
                })
                .collect(),

            // Backend progress renders as an italic informational line.
            MessageRole::Status => {
                let line = Line::from(vec![
                    Span::raw(" "),
                    Span::styled(
                        format!("{} {}", msg.role.icon(), msg.content),
                        Style::default().fg(color).add_modifier(Modifier::ITALIC),
                    ),
                ]);
                vec![(line, None)]
            }

            _ => {
                let line = Line::from(vec![
                    Span::raw(" "),
                    Span::styled(
                        format!("{} ", msg.role.icon()),
                        Style::default().fg(color),
                    ),
                    Span::styled(msg.content.clone(), Style::default().fg(color)),
                ]);
                vec![(line, None)]
            }
        }
    }

    /// Count how many visual (wrapped) rows a `Line` occupies at `width`.
    fn visual_line_count(line: &Line<'_>, width: u16) -> u16 {
        if width == 0 {
            return 1;
        }
        let w = width as usize;
        let text_width: usize = line.width();
        if text_width == 0 {
            return 1;
        }
        text_width.div_ceil(w) as u16
    }
}

impl Pane for MessagesPane {
    fn height_constraint(&self) -> Constraint {
        Constraint::Fill(1)
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        state: &mut PaneState<'_>,
    ) -> Result<Option<EventResponse<Action>>> {
        if state.input_mode == InputMode::Input {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
            KeyCode::PageUp => Action::ScrollUp,
            KeyCode::PageDown => Action::ScrollDown,
            _ => return Ok(None),
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn update(&mut self, action: Action, _state: &mut PaneState<'_>) -> Result<Option<Action>> {
        match action {
            Action::ScrollDown => {
                if self.scroll_offset != usize::MAX {
                    self.scroll_offset = self.scroll_offset.saturating_sub(1);
                }
            }
            Action::ScrollUp => {
                if self.scroll_offset == usize::MAX {
                    self.scroll_offset = 0;
                }
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            Action::Update => {
                // Auto-scroll to bottom on new content
                self.scroll_offset = usize::MAX;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, state: &PaneState<'_>) -> Result<()> {
        let width = area.width;
        if width == 0 || area.height == 0 {
            return Ok(());
        }

        // ── Build entries with pre-computed visual heights ───────────

        struct Entry<'a> {
            line: Line<'a>,
            bg: Option<Color>,
            height: u16,
        }

        let spacing = state.config.message_spacing;

        let mut entries: Vec<Entry<'_>> = Vec::new();
        for (i, msg) in state.transcript.messages().iter().enumerate() {
            if i > 0 && spacing > 0 {
                entries.push(Entry {
                    line: Line::from(""),
                    bg: None,
                    height: spacing,
                });
            }
            for (line, bg) in Self::build_lines(msg) {
                let h = Self::visual_line_count(&line, width);
                entries.push(Entry { line, bg, height: h });
            }
        }

        // Append the waiting line if a turn is in flight
        if let Some(ref loading) = state.loading_line {
            let line = Line::from(Span::styled(
                format!(" {loading}"),
                Style::default().fg(tp::ACCENT_BRIGHT),
            ));
            let h = Self::visual_line_count(&line, width);
            entries.push(Entry {
                line,
                bg: None,
                height: h,
            });
        }

        let total_visual: usize = entries.iter().map(|e| e.height as usize).sum();
        let viewport = area.height as usize;

        // ── Resolve scroll position ─────────────────────────────────
        // `scroll_offset` is "lines from the bottom":
        //   usize::MAX or 0 → pinned to the newest content
        //   >0 → scrolled up by that many visual lines

        let max_scroll = total_visual.saturating_sub(viewport);

        let from_bottom = if self.scroll_offset == usize::MAX {
            0
        } else {
            self.scroll_offset.min(max_scroll)
        };
        // Persist the clamped value so Up/Down work correctly.
        if self.scroll_offset != usize::MAX {
            self.scroll_offset = from_bottom;
        }

        // `scroll_top` = number of visual lines to skip from the top.
        let scroll_top = max_scroll - from_bottom;

        // ── Determine which entries are visible ─────────────────────

        let mut skipped: usize = 0;
        let mut render_start: usize = 0;
        let mut first_skip_rows: u16 = 0;

        for (i, entry) in entries.iter().enumerate() {
            let h = entry.height as usize;
            if skipped + h <= scroll_top {
                skipped += h;
                render_start = i + 1;
            } else {
                first_skip_rows = (scroll_top - skipped) as u16;
                render_start = i;
                break;
            }
        }

        // ── Render visible entries ──────────────────────────────────

        let mut y = area.y;
        let mut remaining = area.height;

        for (idx, entry) in entries.iter().enumerate() {
            if idx < render_start || remaining == 0 {
                continue;
            }

            let skip = if idx == render_start {
                first_skip_rows
            } else {
                0
            };

            let visible_h = (entry.height - skip).min(remaining);

            // Paint the background across the full width
            if let Some(bg) = entry.bg {
                for row in y..y + visible_h {
                    frame.render_widget(
                        Paragraph::new("").style(Style::default().bg(bg)),
                        Rect::new(area.x, row, area.width, 1),
                    );
                }
            }

            // Render the wrapped text
            let mut para = Paragraph::new(entry.line.clone())
                .wrap(Wrap { trim: false })
                .scroll((skip, 0));

            if let Some(bg) = entry.bg {
                para = para.style(Style::default().bg(bg));
            }

            frame.render_widget(para, Rect::new(area.x, y, area.width, visible_h));

            y += visible_h;
            remaining -= visible_h;
        }

        Ok(())
    }
}
