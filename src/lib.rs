#[cfg(feature = "tui")]
pub mod action;
#[cfg(feature = "tui")]
pub mod app;
pub mod args;
pub mod config;
pub mod gateway;
pub mod logging;
#[cfg(feature = "tui")]
pub mod markdown;
#[cfg(feature = "tui")]
pub mod panes;
pub mod repl;
pub mod session;
pub mod theme;
pub mod transcript;
#[cfg(feature = "tui")]
pub mod tui;

// Re-export the core types at crate root for convenience
pub use gateway::{ClientFrame, LinkEvent, ServerEvent};
pub use session::{Effect, RenderAction, Session, SessionEvent, SessionState, dispatch};
