use std::io;

use clap::{Command, arg};
use netchess::server_config::ServerConfig;
use netchess::{client_main, server_main};

fn main() -> io::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Netchess")
        .version(clap::crate_version!())
        .about("Two-player online chess: session relay server and console client")
        .subcommand_required(true)
        .subcommand(Command::new("server").about("Run the session relay").arg(
            arg!([config_file] "Path to the configuration file: yaml-serialized ServerConfig."),
        ))
        .subcommand(
            Command::new("client")
                .about("Join a game room")
                .arg(arg!(<server_address> "Server address"))
                .arg(arg!(<room_id> "Room ID agreed with the opponent")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            let config = match sub_matches.get_one::<String>("config_file") {
                Some(config_file) => read_config_file(config_file),
                None => ServerConfig::default(),
            };
            server_main::run(config)
        }
        Some(("client", sub_matches)) => client_main::run(client_main::ClientConfig {
            server_address: sub_matches.get_one::<String>("server_address").unwrap().clone(),
            room_id: sub_matches.get_one::<String>("room_id").unwrap().clone(),
        }),
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn read_config_file(filename: &str) -> ServerConfig {
    let contents = std::fs::read_to_string(filename).expect("Reading config file");
    serde_yaml::from_str(&contents).expect("Parsing config file")
}
