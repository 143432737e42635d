use std::io;
use std::net::TcpStream;

use serde::{Serialize, de};
use tungstenite::protocol::Role;
use tungstenite::{Message, WebSocket};

pub const DEFAULT_PORT: u16 = 38680;

#[derive(Debug)]
pub enum CommunicationError {
    ConnectionClosed,
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    Protocol(String),
}

pub fn write_obj<T, S>(socket: &mut WebSocket<S>, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: io::Read + io::Write,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    match socket.send(Message::Text(serialized.into())) {
        Ok(()) => Ok(()),
        Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
            Err(CommunicationError::ConnectionClosed)
        }
        Err(err) => Err(CommunicationError::Socket(err)),
    }
}

pub fn read_obj<T, S>(socket: &mut WebSocket<S>) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
    S: io::Read + io::Write,
{
    loop {
        match socket.read() {
            Ok(Message::Text(msg)) => {
                return serde_json::from_str(msg.as_str()).map_err(CommunicationError::Serde);
            }
            // Control frames are answered by tungstenite itself.
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => return Err(CommunicationError::ConnectionClosed),
            Ok(msg) => {
                return Err(CommunicationError::Protocol(format!("Expected text, got {msg:?}")));
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Err(CommunicationError::ConnectionClosed);
            }
            Err(err) => return Err(CommunicationError::Socket(err)),
        }
    }
}

// Read and write halves live on different threads; tungstenite sockets are
// not cloneable, but the underlying TCP stream is.
pub fn clone_websocket(socket: &WebSocket<TcpStream>, role: Role) -> WebSocket<TcpStream> {
    let stream = socket.get_ref().try_clone().unwrap();
    let config = *socket.get_config();
    WebSocket::from_raw_socket(stream, role, Some(config))
}
