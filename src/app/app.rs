use anyhow::Result;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::config::Config;
use crate::gateway::{GatewayLink, LinkEvent};
use crate::panes::footer::FooterPane;
use crate::panes::header::HeaderPane;
use crate::panes::messages::MessagesPane;
use crate::panes::Pane;
use crate::session::SessionState;
use crate::transcript::DisplayMessage;
use crate::tui::{Event, EventResponse, Frame, Tui};

pub struct App {
    pub state: crate::app::SharedState,
    header: HeaderPane,
    messages: MessagesPane,
    footer: FooterPane,
    pub should_quit: bool,
    pub link: GatewayLink,
    pub link_tx: mpsc::UnboundedSender<LinkEvent>,
    link_rx: mpsc::UnboundedReceiver<LinkEvent>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let (link_tx, link_rx) = mpsc::unbounded_channel();

        let mut state = crate::app::SharedState::new(config);
        state
            .transcript
            .push(DisplayMessage::info("Welcome to wireline."));

        Ok(Self {
            state,
            header: HeaderPane::new(),
            messages: MessagesPane::new(),
            footer: FooterPane::new(),
            should_quit: false,
            link: GatewayLink::new(),
            link_tx,
            link_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.connect_gateway().await;

        loop {
            tokio::select! {
                maybe_event = tui.next() => {
                    let Some(event) = maybe_event else { break };
                    self.handle_event(event, &mut tui).await?;
                }
                Some(link_event) = self.link_rx.recv() => {
                    self.apply_session_event(link_event.into()).await;
                    self.dispatch_action(Action::Update).await?;
                }
            }

            if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn handle_event(&mut self, event: Event, tui: &mut Tui) -> Result<()> {
        match event {
            Event::Render => {
                self.draw(tui)?;
                return Ok(());
            }
            Event::Quit => {
                self.should_quit = true;
                return Ok(());
            }
            Event::Tick => {
                return self.dispatch_action(Action::Tick).await.map(|_| ());
            }
            Event::Resize(w, h) => {
                return self.dispatch_action(Action::Resize(w, h)).await.map(|_| ());
            }
            Event::Key(_) => {}
        }

        // Key events: the footer gets first refusal, then the transcript.
        let mut action = {
            let mut ps = self.state.pane_state();
            match self.footer.handle_events(event.clone(), &mut ps)? {
                Some(EventResponse::Stop(a)) => {
                    self.state.input_mode = ps.input_mode;
                    Some(a)
                }
                _ => {
                    self.state.input_mode = ps.input_mode;
                    let mut ps = self.state.pane_state();
                    match self.messages.handle_events(event, &mut ps)? {
                        Some(EventResponse::Stop(a)) => Some(a),
                        _ => None,
                    }
                }
            }
        };

        while let Some(a) = action {
            action = self.dispatch_action(a).await?;
        }
        Ok(())
    }

    pub async fn dispatch_action(&mut self, action: Action) -> Result<Option<Action>> {
        match &action {
            Action::Quit => {
                self.should_quit = true;
                return Ok(None);
            }
            Action::Noop | Action::Render | Action::Resize(_, _) => {
                return Ok(None);
            }
            Action::Tick => {
                self.state.loading_tick = self.state.loading_tick.wrapping_add(1);
            }
            Action::InputSubmit(text) => {
                let text = text.clone();
                self.apply_session_event(crate::session::SessionEvent::Input(text))
                    .await;
                // Quitting ends the program once the session is over.
                if self.state.session.state() == SessionState::Terminated
                    && !self.link.is_open()
                {
                    self.should_quit = true;
                }
                return Ok(Some(Action::Update));
            }
            Action::Update | Action::ScrollUp | Action::ScrollDown => {}
        }

        let follow = {
            let mut ps = self.state.pane_state();
            let r = self.messages.update(action, &mut ps)?;
            self.state.input_mode = ps.input_mode;
            r
        };
        Ok(follow)
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let mut result = Ok(());
        let header = &mut self.header;
        let messages = &mut self.messages;
        let footer = &mut self.footer;
        let ps = self.state.pane_state();
        tui.draw(|frame: &mut Frame<'_>| {
            let area = frame.area();
            let layout = ratatui::layout::Layout::default()
                .direction(ratatui::layout::Direction::Vertical)
                .constraints([
                    header.height_constraint(),
                    messages.height_constraint(),
                    footer.height_constraint(),
                ])
                .split(area);

            result = header
                .draw(frame, layout[0], &ps)
                .and_then(|()| messages.draw(frame, layout[1], &ps))
                .and_then(|()| footer.draw(frame, layout[2], &ps));
        })?;
        result
    }
}
