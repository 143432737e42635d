use std::collections::HashSet;

use dashmap::DashMap;

use crate::server::ClientId;

/// Relay-side room membership. A room springs into being on first join and
/// vanishes when its last member leaves; the key is whatever string the
/// players agreed on out-of-band, taken as-is. Sharded map, so unrelated
/// games do not serialize on a common lock.
pub struct Rooms {
    members: DashMap<String, HashSet<ClientId>>,
}

impl Rooms {
    pub fn new() -> Self { Rooms { members: DashMap::new() } }

    /// Adds `client` to the room and returns the members present just
    /// before the join.
    pub fn join(&self, room_id: &str, client: ClientId) -> Vec<ClientId> {
        let mut room = self.members.entry(room_id.to_owned()).or_default();
        let others = room.iter().copied().collect();
        room.insert(client);
        others
    }

    /// Point-in-time snapshot of the room's members. Empty for a room
    /// nobody has joined.
    pub fn members(&self, room_id: &str) -> Vec<ClientId> {
        self.members.get(room_id).map_or_else(Vec::new, |room| room.iter().copied().collect())
    }

    /// Drops `client` from every room it is in. Membership is the only
    /// index, so this is a scan.
    pub fn remove(&self, client: ClientId) {
        self.members.retain(|_, room| {
            room.remove(&client);
            !room.is_empty()
        });
    }
}
