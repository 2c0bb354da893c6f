use strum::Display;

/// Actions that drive the application, inspired by openapi-tui.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    Update,
    Noop,
    /// The user submitted a line from the input bar
    InputSubmit(String),
    /// Scroll the transcript up / down one visual line
    ScrollUp,
    ScrollDown,
}
