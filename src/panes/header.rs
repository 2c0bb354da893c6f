use anyhow::Result;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    prelude::*,
    widgets::Paragraph,
};

use crate::panes::{Pane, PaneState};
use crate::theme::tui_palette as tp;
use crate::tui::Frame;

/// One-line status header: app name on the left, session state (and the
/// server-assigned session id, once known) on the right.
pub struct HeaderPane;

impl HeaderPane {
    pub fn new() -> Self {
        Self
    }
}

impl Pane for HeaderPane {
    fn height_constraint(&self) -> Constraint {
        Constraint::Length(1)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, state: &PaneState<'_>) -> Result<()> {
        let title = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(
                "wireline",
                Style::default().fg(tp::ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]))
        .style(Style::default().bg(tp::SURFACE));
        frame.render_widget(title, area);

        let mut right: Vec<Span<'_>> = Vec::new();
        if let Some(id) = state.session.session_id() {
            right.push(Span::styled(
                format!("session {id}  "),
                Style::default().fg(tp::MUTED),
            ));
        }
        right.push(Span::styled(
            state.session.state().label(),
            Style::default().fg(tp::INFO),
        ));
        right.push(Span::raw(" "));

        let status = Paragraph::new(Line::from(right))
            .alignment(Alignment::Right)
            .style(Style::default().bg(tp::SURFACE));
        frame.render_widget(status, area);

        Ok(())
    }
}
