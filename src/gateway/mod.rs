//! Gateway transport: wire protocol types and the WebSocket connection
//! manager.

pub mod client;
pub mod protocol;

pub use client::{GatewayLink, LinkEvent, endpoint_url};
pub use protocol::{ClientFrame, ProtocolError, ServerEvent, parse_server_frame};
