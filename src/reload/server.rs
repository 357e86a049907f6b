//! WebSocket server for live reload.
//!
//! An acceptor thread performs the handshake and registers clients; the dev
//! loop broadcasts through [`HotChannel::send`]. The latest build error is
//! kept and replayed to clients that connect while the build is broken.

use std::net::{IpAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::hot::HotChannel;
use super::message::HotPayload;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// A stalled client must not block the dev loop for longer than this.
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// Broadcasts hot payloads to every connected WebSocket client.
pub struct WsBroadcaster {
    clients: Clients,
    /// Error overlay to replay to new clients.
    pending_error: Arc<Mutex<Option<HotPayload>>>,
    port: u16,
}

impl WsBroadcaster {
    /// Bind `interface:base_port` (or the next free port) and start accepting clients.
    pub fn bind(interface: IpAddr, base_port: u16) -> Result<Self> {
        let (listener, port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;

        let clients: Clients = Arc::new(Mutex::new(Vec::new()));
        let pending_error = Arc::new(Mutex::new(None));

        let accept_clients = Arc::clone(&clients);
        let accept_pending = Arc::clone(&pending_error);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => add_client(&accept_clients, &accept_pending, stream),
                    Err(e) => crate::log!("ws"; "accept error: {}", e),
                }
            }
        });

        Ok(Self {
            clients,
            pending_error,
            port,
        })
    }

    /// Port actually bound.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Keep an error for clients that connect later, without broadcasting it.
    pub fn remember_error(&self, payload: HotPayload) {
        *self.pending_error.lock() = Some(payload);
    }

    fn broadcast(&self, msg: Message) {
        let mut clients = self.clients.lock();
        if clients.is_empty() {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        clients.retain_mut(|ws| match ws.send(msg.clone()) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("ws"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("ws"; "broadcast to {} client(s)", clients.len());
    }
}

impl HotChannel for WsBroadcaster {
    fn send(&mut self, payload: HotPayload) {
        match &payload {
            HotPayload::Error { .. } => *self.pending_error.lock() = Some(payload.clone()),
            HotPayload::FullReload { .. } => *self.pending_error.lock() = None,
            HotPayload::Connected { .. } => {}
        }
        self.broadcast(Message::Text(payload.to_json().into()));
    }
}

/// Handshake, greet, replay pending error, register.
fn add_client(clients: &Clients, pending_error: &Mutex<Option<HotPayload>>, stream: TcpStream) {
    let _ = stream.set_write_timeout(Some(WRITE_TIMEOUT));

    let mut ws = match tungstenite::accept(stream) {
        Ok(ws) => ws,
        Err(e) => {
            crate::log!("ws"; "handshake failed: {}", e);
            return;
        }
    };

    if let Err(e) = ws.send(Message::Text(HotPayload::connected().to_json().into())) {
        crate::log!("ws"; "failed to send connected message: {}", e);
        return;
    }

    if let Some(payload) = pending_error.lock().as_ref()
        && let Err(e) = ws.send(Message::Text(payload.to_json().into()))
    {
        crate::log!("ws"; "failed to send pending error: {}", e);
        return;
    }

    let mut clients = clients.lock();
    clients.push(ws);
    crate::debug!("ws"; "client connected (total: {})", clients.len());
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind((interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
