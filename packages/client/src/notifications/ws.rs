use super::channel::{Connection, Connector};
use super::ChannelError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Connects over `ws://` or `wss://`
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

pub struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Connection>, ChannelError> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|err| ChannelError::Connect(err.to_string()))?;
        tracing::debug!(status = %response.status(), "websocket handshake complete");

        Ok(Box::new(WsConnection { stream }))
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn send(&mut self, text: String) -> Result<(), ChannelError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|err| ChannelError::Transport(err.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<String, ChannelError>> {
        loop {
            let frame = match self.stream.next().await? {
                Ok(frame) => frame,
                Err(err) => return Some(Err(ChannelError::Transport(err.to_string()))),
            };

            match frame {
                Message::Text(text) => return Some(Ok(text)),
                Message::Binary(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => tracing::debug!("skipping non-utf8 binary frame"),
                },
                Message::Close(_) => return None,
                // Pings are answered by tungstenite itself.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn close(&mut self) {
        if let Err(err) = self.stream.close(None).await {
            tracing::debug!(error = %err, "websocket close failed");
        }
    }
}
