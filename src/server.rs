use std::collections::{HashMap, hash_map};
use std::sync::{Arc, Mutex, mpsc};

use log::info;

use crate::event::{ClientEvent, MoveEvent, RelayedMove, ServerEvent};
use crate::game::PlayerSide;
use crate::room::Rooms;

#[derive(Debug)]
pub enum IncomingEvent {
    Network(ClientId, ClientEvent),
    Disconnect(ClientId),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClientId(u64);

struct Client {
    events_tx: mpsc::Sender<ServerEvent>,
    logging_id: String,
}

pub struct Clients {
    map: HashMap<ClientId, Client>,
}

impl Clients {
    pub fn new() -> Self { Clients { map: HashMap::new() } }

    pub fn add_client(
        &mut self, events_tx: mpsc::Sender<ServerEvent>, logging_id: String,
    ) -> ClientId {
        let client = Client { events_tx, logging_id };
        loop {
            let id = ClientId(rand::random());
            match self.map.entry(id) {
                hash_map::Entry::Occupied(_) => {}
                hash_map::Entry::Vacant(e) => {
                    e.insert(client);
                    return id;
                }
            }
        }
    }

    pub fn remove_client(&mut self, id: ClientId) -> Option<String> {
        self.map.remove(&id).map(|client| client.logging_id)
    }

    fn logging_id(&self, id: ClientId) -> Option<&str> {
        self.map.get(&id).map(|client| client.logging_id.as_str())
    }

    // Fire-and-forget: a dead receiver shows up as a socket error in its
    // connection handler, which then reports the disconnect.
    fn send_to(&self, id: ClientId, event: ServerEvent) {
        if let Some(client) = self.map.get(&id) {
            let _ = client.events_tx.send(event);
        }
    }
}

/// The relay proper. Routes events between members of a room and holds no
/// chess semantics: move payloads pass through verbatim.
pub struct RelayState {
    clients: Arc<Mutex<Clients>>,
    rooms: Arc<Rooms>,
}

impl RelayState {
    pub fn new(clients: Arc<Mutex<Clients>>, rooms: Arc<Rooms>) -> Self {
        RelayState { clients, rooms }
    }

    pub fn apply_event(&mut self, event: IncomingEvent) {
        match event {
            IncomingEvent::Network(client_id, event) => match event {
                ClientEvent::JoinRoom(room_id) => self.join_room(client_id, &room_id),
                ClientEvent::Move(move_event) => self.relay_move(client_id, move_event),
                ClientEvent::GameOver(room_id) => self.relay_game_over(&room_id),
            },
            IncomingEvent::Disconnect(client_id) => self.disconnect(client_id),
        }
    }

    fn join_room(&mut self, client_id: ClientId, room_id: &str) {
        let others = self.rooms.join(room_id, client_id);
        // The first member of a room plays White and moves first. No
        // capacity limit: a third joiner is accepted and plays Black too.
        let side = if others.is_empty() { PlayerSide::White } else { PlayerSide::Black };
        let clients = self.clients.lock().unwrap();
        if let Some(logging_id) = clients.logging_id(client_id) {
            info!("Client {} joined room {} as {:?}", logging_id, room_id, side);
        }
        clients.send_to(client_id, ServerEvent::RoomJoined { side });
        for other in others {
            clients.send_to(other, ServerEvent::OpponentJoined);
        }
    }

    // Forwarded verbatim to everyone else in the room. No legality check,
    // no check that the sender is itself a member; an empty or unknown room
    // makes this a no-op.
    fn relay_move(&mut self, sender: ClientId, event: MoveEvent) {
        let MoveEvent { room_id, from, to, fen } = event;
        let clients = self.clients.lock().unwrap();
        for member in self.rooms.members(&room_id) {
            if member != sender {
                clients.send_to(
                    member,
                    ServerEvent::OpponentMove(RelayedMove {
                        from: from.clone(),
                        to: to.clone(),
                        fen: fen.clone(),
                    }),
                );
            }
        }
    }

    // Unlike moves, game over goes to the whole room, sender included.
    fn relay_game_over(&mut self, room_id: &str) {
        let clients = self.clients.lock().unwrap();
        for member in self.rooms.members(room_id) {
            clients.send_to(member, ServerEvent::GameOver);
        }
    }

    fn disconnect(&mut self, client_id: ClientId) {
        self.rooms.remove(client_id);
        if let Some(logging_id) = self.clients.lock().unwrap().remove_client(client_id) {
            info!("Client {} disconnected", logging_id);
        }
    }
}
