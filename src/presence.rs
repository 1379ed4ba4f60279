//! Multiplayer presence
//!
//! Best-effort: clients learn who else is connected, nothing about their
//! games is exchanged. Messages are JSON objects tagged by `event`.

use serde::{Deserialize, Serialize};

/// Server to client presence notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum PresenceMessage {
    /// Sent to a newcomer only
    Welcome { client_id: String, clients: Vec<String> },
    /// Broadcast to everyone else when a client connects
    Join { client_id: String, clients: Vec<String> },
    /// Broadcast to the remaining clients when one disconnects
    Leave { client_id: String, clients: Vec<String> },
}

impl PresenceMessage {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Id of the client the message is about
    pub fn client_id(&self) -> &str {
        match self {
            Self::Welcome { client_id, .. }
            | Self::Join { client_id, .. }
            | Self::Leave { client_id, .. } => client_id,
        }
    }

    /// Connected clients after the event
    pub fn clients(&self) -> &[String] {
        match self {
            Self::Welcome { clients, .. } | Self::Join { clients, .. } | Self::Leave { clients, .. } => {
                clients
            }
        }
    }
}

/// Messages produced when a client connects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    /// For the newcomer
    pub welcome: PresenceMessage,
    /// For everyone else
    pub join: PresenceMessage,
}

/// Connected clients in arrival order (relay side)
#[derive(Debug, Clone, Default)]
pub struct Roster {
    clients: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clients(&self) -> &[String] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.clients.iter().any(|c| c == id)
    }

    /// Register a client; a repeated id is not added twice
    pub fn connect(&mut self, id: &str) -> Arrival {
        if !self.contains(id) {
            self.clients.push(id.to_string());
        }
        Arrival {
            welcome: PresenceMessage::Welcome {
                client_id: id.to_string(),
                clients: self.clients.clone(),
            },
            join: PresenceMessage::Join {
                client_id: id.to_string(),
                clients: self.clients.clone(),
            },
        }
    }

    /// Drop a client, returning the leave notice for the rest
    pub fn disconnect(&mut self, id: &str) -> Option<PresenceMessage> {
        let index = self.clients.iter().position(|c| c == id)?;
        self.clients.remove(index);
        Some(PresenceMessage::Leave {
            client_id: id.to_string(),
            clients: self.clients.clone(),
        })
    }
}

/// What a client knows about the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceView {
    /// Our own id, assigned by the welcome message
    pub client_id: Option<String>,
    pub clients: Vec<String>,
}

impl PresenceView {
    pub fn apply(&mut self, message: &PresenceMessage) {
        if let PresenceMessage::Welcome { client_id, .. } = message {
            self.client_id = Some(client_id.clone());
        }
        self.clients = message.clients().to_vec();
    }

    /// Connected clients other than ourselves
    pub fn others(&self) -> usize {
        self.clients
            .iter()
            .filter(|c| Some(c.as_str()) != self.client_id.as_deref())
            .count()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::PresenceClient;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

    use super::{PresenceMessage, PresenceView};

    /// Browser side of the presence channel
    pub struct PresenceClient {
        /// Owned for the client's lifetime; callbacks hold the rest
        _socket: WebSocket,
        view: Rc<RefCell<PresenceView>>,
    }

    impl PresenceClient {
        /// Open the socket; failures are logged and never stop the game
        pub fn connect(url: &str) -> Result<Self, JsValue> {
            let socket = WebSocket::new(url)?;
            let view = Rc::new(RefCell::new(PresenceView::default()));

            {
                let url = url.to_string();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    log::info!("Presence connected to {}", url);
                });
                socket.set_onopen(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            {
                let view = view.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
                    let Some(text) = event.data().as_string() else {
                        return;
                    };
                    match PresenceMessage::from_json(&text) {
                        Ok(message) => {
                            log::info!(
                                "Presence {:?}: {} client(s)",
                                message.client_id(),
                                message.clients().len()
                            );
                            view.borrow_mut().apply(&message);
                        }
                        Err(e) => log::warn!("Ignoring presence message: {}", e),
                    }
                });
                socket.set_onmessage(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            {
                let closure = Closure::<dyn FnMut(_)>::new(move |event: CloseEvent| {
                    log::info!("Presence closed ({})", event.code());
                });
                socket.set_onclose(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            {
                let closure = Closure::<dyn FnMut(_)>::new(move |event: ErrorEvent| {
                    log::warn!("Presence error: {}", event.message());
                });
                socket.set_onerror(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            Ok(Self { _socket: socket, view })
        }

        pub fn view(&self) -> PresenceView {
            self.view.borrow().clone()
        }
    }
}
