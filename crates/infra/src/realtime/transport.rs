//! WebSocket push transport
//!
//! Adapts tokio-tungstenite to the [`PushTransport`] / [`PushConnection`]
//! ports. The connection remembers its terminal event so callers polling
//! after a close keep seeing `Closed` instead of hitting a dead stream.

use async_trait::async_trait;
use caresync_core::realtime::{PushConnection, PushTransport, TransportEvent, ABNORMAL_CLOSE};
use caresync_domain::{CareSyncError, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::errors::InfraError;

/// Close code reported when the peer's close frame carries no status.
const NO_STATUS_CLOSE: u16 = 1005;

fn map_ws_error(err: WsError) -> CareSyncError {
    let infra: InfraError = err.into();
    CareSyncError::from(infra)
}

/// `PushTransport` backed by tokio-tungstenite
#[derive(Debug, Default, Clone, Copy)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PushTransport for WsTransport {
    async fn connect(&self, url: &str) -> Result<Box<dyn PushConnection>> {
        let (stream, response) = connect_async(url).await.map_err(map_ws_error)?;
        debug!(status = %response.status(), "websocket handshake complete");
        Ok(Box::new(WsConnection { stream, terminal: None }))
    }
}

struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Set once the stream ends; replayed on every later poll.
    terminal: Option<TransportEvent>,
}

#[async_trait]
impl PushConnection for WsConnection {
    async fn next_event(&mut self) -> TransportEvent {
        if let Some(event) = &self.terminal {
            return event.clone();
        }

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return TransportEvent::Message(text),
                Some(Ok(Message::Close(frame))) => {
                    let code = frame.map_or(NO_STATUS_CLOSE, |frame| u16::from(frame.code));
                    let event = TransportEvent::Closed { code, clean: true };
                    self.terminal = Some(event.clone());
                    return event;
                }
                // Ping, pong and binary frames carry no push payloads.
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    self.terminal =
                        Some(TransportEvent::Closed { code: ABNORMAL_CLOSE, clean: false });
                    return TransportEvent::Error(err.to_string());
                }
                None => {
                    let event = TransportEvent::Closed { code: ABNORMAL_CLOSE, clean: false };
                    self.terminal = Some(event.clone());
                    return event;
                }
            }
        }
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        self.stream.send(Message::Text(text.to_string())).await.map_err(map_ws_error)
    }

    async fn close(&mut self) {
        // Closing an already-closed stream reports AlreadyClosed; nothing
        // useful remains to do with it either way.
        if let Err(err) = self.stream.close(None).await {
            debug!(error = %err, "websocket close failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
    use tokio_tungstenite::tungstenite::protocol::CloseFrame;

    use super::*;

    async fn ws_server<F, Fut>(handler: F) -> String
    where
        F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws = accept_async(stream).await.unwrap();
            handler(ws).await;
        });
        format!("ws://{addr}")
    }

    #[tokio::test]
    async fn connect_delivers_text_messages() {
        let url = ws_server(|mut ws| async move {
            ws.send(Message::Ping(vec![1])).await.unwrap();
            ws.send(Message::Text("hola".to_string())).await.unwrap();
            ws.close(None).await.unwrap();
            while ws.next().await.is_some() {}
        })
        .await;

        let mut connection = WsTransport::new().connect(&url).await.unwrap();

        // The ping is skipped; only the text frame surfaces.
        assert_eq!(connection.next_event().await, TransportEvent::Message("hola".to_string()));

        let closed = connection.next_event().await;
        assert_eq!(closed, TransportEvent::Closed { code: NO_STATUS_CLOSE, clean: true });
        // The terminal event replays on later polls.
        assert_eq!(connection.next_event().await, closed);
    }

    #[tokio::test]
    async fn close_frame_code_is_surfaced() {
        let url = ws_server(|mut ws| async move {
            ws.close(Some(CloseFrame { code: CloseCode::Normal, reason: "".into() }))
                .await
                .unwrap();
            while ws.next().await.is_some() {}
        })
        .await;

        let mut connection = WsTransport::new().connect(&url).await.unwrap();

        let event = connection.next_event().await;
        assert_eq!(event, TransportEvent::Closed { code: 1000, clean: true });
        assert_eq!(connection.next_event().await, event);
    }

    #[tokio::test]
    async fn dropped_connection_reports_abnormal_close() {
        let url = ws_server(|ws| async move {
            drop(ws);
        })
        .await;

        let mut connection = WsTransport::new().connect(&url).await.unwrap();

        match connection.next_event().await {
            TransportEvent::Error(_) => {}
            other => panic!("expected a transport error, got {:?}", other),
        }
        assert_eq!(
            connection.next_event().await,
            TransportEvent::Closed { code: ABNORMAL_CLOSE, clean: false }
        );
    }

    #[tokio::test]
    async fn send_reaches_server() {
        let url = ws_server(|mut ws| async move {
            while let Some(Ok(message)) = ws.next().await {
                if message.is_text() {
                    ws.send(message).await.unwrap();
                }
            }
        })
        .await;

        let mut connection = WsTransport::new().connect(&url).await.unwrap();
        connection.send("ping").await.unwrap();

        assert_eq!(connection.next_event().await, TransportEvent::Message("ping".to_string()));

        connection.close().await;
    }

    #[tokio::test]
    async fn transport_error_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = WsTransport::new().connect(&format!("ws://{addr}")).await;

        assert!(matches!(result, Err(CareSyncError::Network(_))));
    }
}
