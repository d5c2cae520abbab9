//! TestServer - in-process WebSocket server with scripted behavior
//!
//! Accepts a single connection on a random port and records every text
//! frame it receives. The behavior modes cover the scenarios the client
//! must survive: a cooperative echo server, a chatty burst server, a
//! silent server, and a peer that drops the connection abruptly.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// How the server behaves once a client connects
#[derive(Debug, Clone, Copy)]
pub enum ServerBehavior {
    /// Echo every inbound text frame back to the client
    Echo,
    /// On the first inbound frame, send this many messages back to back,
    /// then keep reading without responding
    Burst(usize),
    /// Accept the connection and read frames, but never send anything
    Silent,
    /// On the first inbound frame, send one greeting and then initiate the
    /// close handshake
    GreetThenClose,
    /// Read one frame, then drop the TCP stream without a close handshake
    Hangup,
}

/// In-process WebSocket server for one test connection
pub struct TestServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Bind a random port and serve one connection with the given behavior
    pub async fn start(behavior: ServerBehavior) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let frames = received.clone();

        let handle = tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
                return;
            };
            serve(ws, behavior, frames).await;
        });

        Ok(Self {
            addr,
            received,
            handle,
        })
    }

    /// WebSocket URL for the server
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Text frames received so far, in arrival order
    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    mut ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    behavior: ServerBehavior,
    frames: Arc<Mutex<Vec<String>>>,
) {
    let mut burst_sent = false;

    while let Some(Ok(msg)) = ws.next().await {
        match msg {
            Message::Text(text) => {
                frames.lock().await.push(text.as_str().to_string());
                match behavior {
                    ServerBehavior::Echo => {
                        if ws.send(Message::Text(text)).await.is_err() {
                            return;
                        }
                    }
                    ServerBehavior::Burst(count) if !burst_sent => {
                        burst_sent = true;
                        for i in 0..count {
                            let line = format!("line {}", i);
                            if ws.send(Message::Text(line.into())).await.is_err() {
                                return;
                            }
                        }
                    }
                    ServerBehavior::GreetThenClose => {
                        if ws
                            .send(Message::Text("Welcome, adventurer".into()))
                            .await
                            .is_err()
                        {
                            return;
                        }
                        break;
                    }
                    ServerBehavior::Hangup => {
                        // Abrupt drop, no close handshake
                        return;
                    }
                    _ => {}
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Flush the close reply, then wait for EOF so the client observes the
    // handshake before the stream drops
    let _ = ws.close(None).await;
    while ws.next().await.is_some() {}
}
