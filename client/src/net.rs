//! Websocket event loop.
//!
//! One connection per open room. [`connect`] authenticates with the bearer
//! token at upgrade time and announces membership; [`run`] then merges the
//! two event sources — frames from the relay and commands from the host —
//! into the session's single ordered queue, forwarding the session's
//! outputs to the socket and the host notice channel.
//!
//! Connection loss is terminal for the session: `run` returns and the host
//! decides whether to build a fresh session (no automatic reconnect).

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use wire::Message;

use crate::session::{Event, HostNotice, Output, Session};

/// Errors surfaced by the sync client. Everything here ends the session;
/// per-frame problems (malformed payloads, unknown ids) are swallowed
/// before they get this far.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket transport failed: {0}")]
    Ws(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("frame encode failed: {0}")]
    Encode(#[from] wire::CodecError),
    #[error("history request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("history response missing `messages` array")]
    MalformedHistory,
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open, joined relay connection.
pub struct SyncConnection {
    socket: WsStream,
}

/// Connect to the relay, presenting the bearer token as the `token` query
/// parameter, and announce membership in the session's room.
///
/// # Errors
///
/// Returns [`SyncError::WsConnect`] if the upgrade fails (including a
/// rejected token) and [`SyncError::Ws`] if the join announcement
/// cannot be sent.
pub async fn connect(
    relay_url: &str,
    token: &str,
    session: &Session,
) -> Result<SyncConnection, SyncError> {
    let url = format!("{relay_url}?token={token}");
    let (mut socket, _) = connect_async(&url)
        .await
        .map_err(|e| SyncError::WsConnect(Box::new(e)))?;

    let join = session.join_message().encode()?;
    socket
        .send(WsMessage::text(join))
        .await
        .map_err(|e| SyncError::Ws(Box::new(e)))?;

    Ok(SyncConnection { socket })
}

impl SyncConnection {
    /// Drive the session until the connection drops or the host closes its
    /// command channel.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::WsClosed`] when the relay closes the socket and
    /// [`SyncError::Ws`] when an outbound frame cannot be written. Both
    /// are terminal.
    pub async fn run(
        mut self,
        session: &mut Session,
        mut commands: mpsc::Receiver<Event>,
        notices: mpsc::Sender<HostNotice>,
    ) -> Result<(), SyncError> {
        loop {
            let outputs = tokio::select! {
                frame = self.socket.next() => {
                    let Some(frame) = frame else {
                        return Err(SyncError::WsClosed);
                    };
                    let frame = frame.map_err(|e| SyncError::Ws(Box::new(e)))?;
                    match frame {
                        WsMessage::Text(text) => match Message::decode(text.as_str()) {
                            Ok(message) => session.handle(Event::Wire(message)),
                            // The relay already filters rooms; anything
                            // unparseable here is dropped like any other
                            // malformed frame.
                            Err(_) => Vec::new(),
                        },
                        WsMessage::Close(_) => return Err(SyncError::WsClosed),
                        _ => Vec::new(),
                    }
                }
                command = commands.recv() => {
                    // Host hung up; the session ends cleanly.
                    let Some(event) = command else {
                        return Ok(());
                    };
                    session.handle(event)
                }
            };

            for output in outputs {
                match output {
                    Output::Send(message) => {
                        let text = message.encode()?;
                        self.socket
                            .send(WsMessage::text(text))
                            .await
                            .map_err(|e| SyncError::Ws(Box::new(e)))?;
                    }
                    Output::Render => {
                        // Renders are coalescable; a full channel already
                        // holds a pending redraw.
                        if let Err(e) = notices.try_send(HostNotice::Render) {
                            if matches!(e, mpsc::error::TrySendError::Closed(_)) {
                                return Ok(());
                            }
                        }
                    }
                    Output::OpenTextEditor { id } => {
                        if notices.send(HostNotice::OpenTextEditor { id }).await.is_err() {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
