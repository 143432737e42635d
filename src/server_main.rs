// Improvement potential. Try to do everything via message-passing, without
//   `Mutex`es, but also without threading and network logic inside
//   `RelayState`. Problem: adding a client via event is a potential race in
//   case the first message from the client arrives earlier.

use std::io;
use std::net::TcpListener;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use log::{info, warn};
use tungstenite::protocol::Role;

use crate::network::{self, CommunicationError};
use crate::room::Rooms;
use crate::server::{Clients, IncomingEvent, RelayState};
use crate::server_config::ServerConfig;

pub fn run(config: ServerConfig) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();
    let clients = Arc::new(Mutex::new(Clients::new()));
    let rooms = Arc::new(Rooms::new());
    {
        let clients = Arc::clone(&clients);
        let rooms = Arc::clone(&rooms);
        thread::spawn(move || {
            let mut relay_state = RelayState::new(clients, rooms);
            for event in rx {
                relay_state.apply_event(event);
            }
            panic!("Unexpected end of relay event stream");
        });
    }

    let listener = TcpListener::bind(config.listen_address())?;
    info!("Listening on {}...", listener.local_addr()?);
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                warn!("Cannot establish connection: {}", err);
                continue;
            }
        };
        let peer_addr = match stream.peer_addr() {
            Ok(addr) => addr.to_string(),
            Err(_) => "<unknown>".to_owned(),
        };
        let socket = match tungstenite::accept(stream) {
            Ok(socket) => socket,
            Err(err) => {
                warn!("Websocket handshake with {} failed: {:?}", peer_addr, err);
                continue;
            }
        };
        info!("Client connected: {}", peer_addr);
        let mut in_socket = network::clone_websocket(&socket, Role::Server);
        let mut out_socket = socket;

        let (client_tx, client_rx) = mpsc::channel();
        let client_id = clients.lock().unwrap().add_client(client_tx, peer_addr);

        let tx_read = tx.clone();
        thread::spawn(move || {
            loop {
                match network::read_obj(&mut in_socket) {
                    Ok(event) => {
                        tx_read.send(IncomingEvent::Network(client_id, event)).unwrap();
                    }
                    // A payload the relay cannot parse is dropped, not fatal.
                    Err(CommunicationError::Serde(err)) => {
                        warn!("Dropping unparseable event: {}", err);
                    }
                    Err(err) => {
                        if !matches!(err, CommunicationError::ConnectionClosed) {
                            warn!("Client connection lost: {:?}", err);
                        }
                        tx_read.send(IncomingEvent::Disconnect(client_id)).unwrap();
                        break;
                    }
                }
            }
        });
        // The writer exits on its own once the client is removed from the
        // registry: dropping the sender ends the `client_rx` iteration.
        thread::spawn(move || {
            for event in client_rx {
                if let Err(err) = network::write_obj(&mut out_socket, &event) {
                    if !matches!(err, CommunicationError::ConnectionClosed) {
                        warn!("Failed to deliver event: {:?}", err);
                    }
                    break;
                }
            }
        });
    }
    panic!("Unexpected end of TcpListener::incoming");
}
