use serde::{Deserialize, Serialize};

use crate::network;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn listen_address(&self) -> String { format!("{}:{}", self.bind_address, self.port) }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { bind_address: default_bind_address(), port: default_port() }
    }
}

fn default_bind_address() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { network::DEFAULT_PORT }
