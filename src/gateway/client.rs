//! Gateway connection manager.
//!
//! Owns the WebSocket transport: one connection attempt, a background
//! reader task that decodes inbound frames, and a write half gated on the
//! socket actually being open. There is no reconnect policy: when the
//! link drops, the transport reference is released and the failure is
//! surfaced as a [`LinkEvent`]; a fresh `connect` call is the only way
//! back.

use anyhow::{Context, Result, anyhow, bail};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use crate::gateway::protocol::{ENDPOINT_PATH, ClientFrame, parse_server_frame};
use crate::gateway::ServerEvent;

pub type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
pub type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Close code reported when the peer vanishes without a close frame.
const ABNORMAL_CLOSE: u16 = 1006;
/// Close code reported when a close frame carried no status.
const NO_STATUS_CLOSE: u16 = 1005;

/// Events the connection manager surfaces to the session layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// The socket finished its handshake and is open.
    Opened,
    /// A decoded inbound frame.
    Frame(ServerEvent),
    /// An inbound frame that failed to decode; carries the parse error text.
    Malformed(String),
    /// The socket closed, cleanly or not.
    Closed { code: u16, reason: String },
    /// The connection attempt or the open socket failed.
    TransportError(String),
}

/// Derive the gateway WebSocket endpoint from a configured base URL.
///
/// The scheme follows the base (`http` → `ws`, `https` → `wss`, `ws`/`wss`
/// kept as-is), host and port are preserved, and the path is forced to the
/// fixed endpoint. This keeps deployments same-origin without hardcoding
/// addresses.
pub fn endpoint_url(base: &Url) -> Result<Url> {
    let mut url = base.clone();
    let scheme = match base.scheme() {
        "ws" | "wss" => None,
        "http" => Some("ws"),
        "https" => Some("wss"),
        other => bail!("unsupported gateway URL scheme `{other}`"),
    };
    if let Some(scheme) = scheme {
        url.set_scheme(scheme)
            .map_err(|_| anyhow!("cannot derive websocket scheme from `{base}`"))?;
    }
    url.set_path(ENDPOINT_PATH);
    Ok(url)
}

/// Handle to the write half of the gateway socket plus its reader task.
#[derive(Default)]
pub struct GatewayLink {
    sink: Option<WsSink>,
    reader: Option<JoinHandle<()>>,
}

impl GatewayLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transport currently exists (open or mid-handshake).
    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Open the socket and start the reader task. Events arrive on
    /// `events`, including the failure of this very attempt.
    ///
    /// Calling this while a transport already exists is a no-op.
    pub async fn connect(&mut self, url: &Url, events: mpsc::UnboundedSender<LinkEvent>) {
        if self.sink.is_some() {
            debug!(%url, "connect ignored: transport already present");
            return;
        }

        match tokio_tungstenite::connect_async(url.as_str()).await {
            Ok((ws_stream, _)) => {
                let (sink, stream) = ws_stream.split();
                self.sink = Some(sink);
                let _ = events.send(LinkEvent::Opened);
                self.reader = Some(tokio::spawn(reader_loop(stream, events)));
            }
            Err(err) => {
                let _ = events.send(LinkEvent::TransportError(err.to_string()));
            }
        }
    }

    /// Send one frame. Fails without touching the network when no transport
    /// is open; a failed write releases the transport.
    pub async fn send(&mut self, frame: &ClientFrame) -> Result<()> {
        let Some(sink) = self.sink.as_mut() else {
            bail!("gateway not connected");
        };
        let text = frame.encode().context("failed to serialize frame")?;
        if let Err(err) = sink.send(Message::text(text)).await {
            self.sink = None;
            return Err(err).context("failed to send frame");
        }
        Ok(())
    }

    /// Close the connection from our side. The reader task observes the
    /// close handshake and reports it as a normal [`LinkEvent::Closed`].
    pub async fn close(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            let _ = sink.send(Message::Close(None)).await;
            let _ = sink.close().await;
        }
    }

    /// Drop the transport and stop the reader without a close handshake.
    pub fn shutdown(&mut self) {
        self.sink = None;
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Pump the read half until the socket dies, decoding each text frame.
async fn reader_loop(mut stream: WsStream, events: mpsc::UnboundedSender<LinkEvent>) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let event = match parse_server_frame(text.as_str()) {
                    Ok(ServerEvent::Unknown { kind, raw }) => {
                        warn!(%kind, "unrecognized frame type from gateway");
                        LinkEvent::Frame(ServerEvent::Unknown { kind, raw })
                    }
                    Ok(event) => LinkEvent::Frame(event),
                    Err(err) => LinkEvent::Malformed(err.to_string()),
                };
                if events.send(event).is_err() {
                    return;
                }
            }
            Ok(Message::Close(frame)) => {
                let (code, reason) = match frame {
                    Some(f) => (u16::from(f.code), f.reason.to_string()),
                    None => (NO_STATUS_CLOSE, String::new()),
                };
                let _ = events.send(LinkEvent::Closed { code, reason });
                return;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(other) => {
                debug!(?other, "ignoring non-text frame");
            }
            Err(err) => {
                let _ = events.send(LinkEvent::TransportError(err.to_string()));
                return;
            }
        }
    }
    // Stream ended without a close frame.
    let _ = events.send(LinkEvent::Closed {
        code: ABNORMAL_CLOSE,
        reason: "abnormal closure".into(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived(base: &str) -> String {
        endpoint_url(&Url::parse(base).unwrap()).unwrap().to_string()
    }

    #[test]
    fn endpoint_mirrors_page_scheme() {
        assert_eq!(derived("http://localhost:8765"), "ws://localhost:8765/ws");
        assert_eq!(
            derived("https://chat.example.com"),
            "wss://chat.example.com/ws"
        );
    }

    #[test]
    fn endpoint_keeps_explicit_ws_schemes() {
        assert_eq!(derived("ws://10.0.0.5:9001"), "ws://10.0.0.5:9001/ws");
        assert_eq!(derived("wss://gw.example.com"), "wss://gw.example.com/ws");
    }

    #[test]
    fn endpoint_replaces_any_path() {
        assert_eq!(
            derived("https://host:8443/some/page"),
            "wss://host:8443/ws"
        );
    }

    #[test]
    fn endpoint_rejects_foreign_schemes() {
        assert!(endpoint_url(&Url::parse("ftp://host").unwrap()).is_err());
    }

    #[test]
    fn send_without_transport_is_rejected() {
        let mut link = GatewayLink::new();
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let err = rt
            .block_on(link.send(&ClientFrame::chat("hi")))
            .unwrap_err();
        assert!(err.to_string().contains("not connected"));
    }
}
