//! Presence relay
//!
//! WebSocket endpoint that tells every connected game who else is online.
//! Inbound client messages are only logged; nothing is forwarded.

#[cfg(not(target_arch = "wasm32"))]
mod relay {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use anyhow::Context;
    use axum::{
        Router,
        extract::{
            State,
            ws::{Message, WebSocket, WebSocketUpgrade},
        },
        response::Response,
        routing::get,
    };
    use clap::Parser;
    use futures_util::{SinkExt, StreamExt};
    use tokio::sync::{Mutex, mpsc};
    use uuid::Uuid;

    use tinyball::presence::{PresenceMessage, Roster};

    /// Outbound queue depth per client
    const CLIENT_QUEUE: usize = 32;

    #[derive(Parser, Debug)]
    #[command(name = "presence-relay", about = "Tinyball presence relay")]
    pub struct Cli {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 3000)]
        pub port: u16,

        /// Address to bind
        #[arg(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
        pub host: String,
    }

    #[derive(Default)]
    struct Peers {
        roster: Roster,
        senders: HashMap<String, mpsc::Sender<String>>,
    }

    /// Shared connection registry
    #[derive(Clone, Default)]
    pub struct Relay {
        peers: Arc<Mutex<Peers>>,
    }

    impl Relay {
        /// Register a client: welcome it and tell everyone else
        pub async fn join(&self, id: &str, sender: mpsc::Sender<String>) {
            let mut peers = self.peers.lock().await;
            let arrival = peers.roster.connect(id);
            peers.senders.insert(id.to_string(), sender.clone());

            send(&sender, &arrival.welcome);
            broadcast(&peers, &arrival.join, Some(id));
            log::info!("Client connected: {} Total clients: {}", id, peers.roster.len());
        }

        /// Forget a client and tell the rest
        pub async fn leave(&self, id: &str) {
            let mut peers = self.peers.lock().await;
            peers.senders.remove(id);
            if let Some(leave) = peers.roster.disconnect(id) {
                broadcast(&peers, &leave, None);
            }
            log::info!("Client disconnected: {} Total clients: {}", id, peers.roster.len());
            if peers.roster.is_empty() {
                log::info!("No clients connected");
            }
        }
    }

    fn send(sender: &mpsc::Sender<String>, message: &PresenceMessage) {
        match message.to_json() {
            Ok(json) => {
                // A full or closed queue only means this client misses an update
                let _ = sender.try_send(json);
            }
            Err(e) => log::error!("Failed to encode {:?}: {}", message, e),
        }
    }

    fn broadcast(peers: &Peers, message: &PresenceMessage, except: Option<&str>) {
        for (id, sender) in &peers.senders {
            if Some(id.as_str()) != except {
                send(sender, message);
            }
        }
    }

    async fn websocket_handler(ws: WebSocketUpgrade, State(relay): State<Relay>) -> Response {
        ws.on_upgrade(move |socket| handle_socket(socket, relay))
    }

    async fn handle_socket(socket: WebSocket, relay: Relay) {
        let id = Uuid::new_v4().to_string();
        let (mut ws_sender, mut ws_receiver) = socket.split();
        let (tx, mut rx) = mpsc::channel::<String>(CLIENT_QUEUE);

        relay.join(&id, tx).await;

        let outgoing = tokio::spawn(async move {
            while let Some(json) = rx.recv().await {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        });

        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => log::info!("{}: {}", id, text.as_str()),
                Ok(Message::Binary(bin)) => log::info!("{}: {} bytes", id, bin.len()),
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    log::warn!("WebSocket error from {}: {}", id, e);
                    break;
                }
                _ => {}
            }
        }

        relay.leave(&id).await;
        outgoing.abort();
    }

    pub fn router(relay: Relay) -> Router {
        Router::new().route("/", get(websocket_handler)).with_state(relay)
    }

    pub async fn run(cli: Cli) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", cli.host, cli.port))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        log::info!("WebSocket server is running on port {}", cli.port);
        axum::serve(listener, router(Relay::default()))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                log::info!("Shutting down");
            })
            .await
            .context("server error")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        async fn recv(rx: &mut mpsc::Receiver<String>) -> PresenceMessage {
            let json = rx.recv().await.unwrap();
            PresenceMessage::from_json(&json).unwrap()
        }

        #[tokio::test]
        async fn test_join_and_leave_notifications() {
            let relay = Relay::default();
            let (tx_a, mut rx_a) = mpsc::channel(8);
            let (tx_b, mut rx_b) = mpsc::channel(8);

            relay.join("a", tx_a).await;
            assert!(matches!(recv(&mut rx_a).await, PresenceMessage::Welcome { .. }));

            relay.join("b", tx_b).await;
            let welcome = recv(&mut rx_b).await;
            assert_eq!(welcome.client_id(), "b");
            assert_eq!(welcome.clients(), &["a".to_string(), "b".to_string()]);
            let join = recv(&mut rx_a).await;
            assert!(matches!(join, PresenceMessage::Join { ref client_id, .. } if client_id == "b"));

            relay.leave("a").await;
            let leave = recv(&mut rx_b).await;
            assert_eq!(
                leave,
                PresenceMessage::Leave {
                    client_id: "a".into(),
                    clients: vec!["b".into()],
                }
            );
            assert!(rx_b.try_recv().is_err());

            relay.leave("b").await;
            assert!(relay.peers.lock().await.roster.is_empty());
        }

        #[test]
        fn test_cli_defaults() {
            let cli = Cli::try_parse_from(["presence-relay"]).unwrap();
            assert_eq!(cli.host, "0.0.0.0");
            let cli = Cli::try_parse_from(["presence-relay", "--port", "4100"]).unwrap();
            assert_eq!(cli.port, 4100);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    relay::run(relay::Cli::parse()).await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The relay is a native server
}
