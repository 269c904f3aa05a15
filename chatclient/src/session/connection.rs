use futures_util::{stream::SplitStream, SinkExt, StreamExt};
use log::{debug, warn};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub enum Inbound {
    Text(String),
    Closed,
}

/// WebSocket to the chat server.
///
/// Writes go through an unbounded channel to a writer task so sending never
/// waits on the socket. Dropping the connection ends the writer, which closes
/// the socket.
pub struct Connection {
    outbound_tx: mpsc::UnboundedSender<Message>,
    inbound: SplitStream<WsStream>,
}

impl Connection {
    pub async fn open(url: &str) -> Result<Self, ClientError> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        let (mut sink, inbound) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                if let Err(e) = sink.send(message).await {
                    warn!("[-] Failed to write to server: {e}");
                    break;
                }
            }

            let _ = sink.close().await;
            debug!("[*] Writer task finished");
        });

        Ok(Self {
            outbound_tx,
            inbound,
        })
    }

    pub fn is_open(&self) -> bool {
        !self.outbound_tx.is_closed()
    }

    pub fn send(&self, message: Message) -> Result<(), ClientError> {
        self.outbound_tx
            .send(message)
            .map_err(|_| ClientError::SendRejected("connection closed"))
    }

    pub async fn recv(&mut self) -> Inbound {
        loop {
            match self.inbound.next().await {
                Some(Ok(Message::Text(text))) => return Inbound::Text(text.as_str().to_owned()),
                Some(Ok(Message::Close(_))) | None => return Inbound::Closed,
                Some(Ok(other)) => {
                    debug!("[*] Ignoring non-text frame ({} bytes)", other.len());
                }
                Some(Err(e)) => {
                    warn!("[-] Connection error: {e}");
                    return Inbound::Closed;
                }
            }
        }
    }
}
