#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod client;
pub mod client_main;
pub mod engine;
pub mod event;
pub mod game;
pub mod network;
pub mod room;
pub mod rules;
pub mod server;
pub mod server_config;
pub mod server_main;
pub mod test_util;
pub mod tui;
