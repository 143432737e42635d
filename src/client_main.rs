use std::io::{self, BufRead};
use std::net::TcpStream;
use std::sync::mpsc;
use std::thread;

use itertools::Itertools;
use tungstenite::WebSocket;
use tungstenite::protocol::Role;

use crate::client::{EventError, MoveAttemptOutcome, NotableEvent, ParticipantState};
use crate::engine::ChessEngine;
use crate::event::ServerEvent;
use crate::network::{self, CommunicationError};
use crate::tui;

pub struct ClientConfig {
    pub server_address: String,
    pub room_id: String,
}

#[derive(Debug)]
enum IncomingEvent {
    Network(ServerEvent),
    Input(String),
    ConnectionLost,
}

pub fn run(config: ClientConfig) -> io::Result<()> {
    let addr = if config.server_address.contains(':') {
        config.server_address.clone()
    } else {
        format!("{}:{}", config.server_address, network::DEFAULT_PORT)
    };
    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr)?;
    let (socket, _) = tungstenite::client(format!("ws://{}/", addr), stream)
        .map_err(|err| io::Error::other(format!("Websocket handshake failed: {:?}", err)))?;
    let mut in_socket = network::clone_websocket(&socket, Role::Client);
    let mut out_socket = socket;

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    thread::spawn(move || {
        loop {
            let event = match network::read_obj(&mut in_socket) {
                Ok(event) => IncomingEvent::Network(event),
                Err(CommunicationError::Serde(_)) => continue,
                Err(_) => IncomingEvent::ConnectionLost,
            };
            let lost = matches!(event, IncomingEvent::ConnectionLost);
            if tx_net.send(event).is_err() || lost {
                break;
            }
        }
    });
    let tx_input = tx;
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx_input.send(IncomingEvent::Input(line)).is_err() {
                break;
            }
        }
    });

    let mut participant = ParticipantState::new(Box::new(ChessEngine::new()));
    participant.join(config.room_id.clone());
    flush_outgoing(&mut participant, &mut out_socket)?;
    println!("Waiting for the server to assign a side...");

    for event in rx {
        match event {
            IncomingEvent::Network(event) => match participant.process_server_event(event) {
                Ok(notable) => report(&participant, &config.room_id, notable),
                Err(EventError::Desynchronized { from, to }) => {
                    println!("Board diverged from the opponent on {} -> {}. Aborting.", from, to);
                    std::process::exit(1);
                }
                Err(EventError::CannotApplyEvent(message)) => {
                    println!("Ignoring server event: {}", message);
                }
            },
            IncomingEvent::Input(line) => handle_input(&mut participant, &line),
            IncomingEvent::ConnectionLost => {
                println!("Connection to the server lost.");
                break;
            }
        }
        flush_outgoing(&mut participant, &mut out_socket)?;
    }
    Ok(())
}

fn flush_outgoing(
    participant: &mut ParticipantState, socket: &mut WebSocket<TcpStream>,
) -> io::Result<()> {
    while let Some(event) = participant.next_outgoing_event() {
        network::write_obj(socket, &event)
            .map_err(|err| io::Error::other(format!("Cannot send event: {:?}", err)))?;
    }
    Ok(())
}

fn report(participant: &ParticipantState, room_id: &str, notable: NotableEvent) {
    match notable {
        NotableEvent::None => {}
        NotableEvent::Joined(side) => {
            println!("Joined room {} as {:?}.", room_id, side);
            render(participant);
            if participant.game().is_some_and(|game| game.can_move_locally()) {
                println!("You move first. Enter moves like \"e2e4\" or \"e2 e4\".");
            } else {
                println!("The opponent moves first.");
            }
        }
        NotableEvent::OpponentJoined => println!("Opponent connected."),
        NotableEvent::OpponentMoved => {
            render(participant);
            println!("Your move.");
        }
        NotableEvent::GameOver => {
            render(participant);
            println!("Game over!");
        }
    }
}

fn handle_input(participant: &mut ParticipantState, line: &str) {
    let Some((from, to)) = parse_move(line) else {
        if !line.trim().is_empty() {
            println!("Cannot parse \"{}\": expected a move like \"e2e4\".", line.trim());
        }
        return;
    };
    match participant.attempt_move(&from, &to) {
        MoveAttemptOutcome::Played => {
            render(participant);
            if participant.game().is_some_and(|game| game.terminal()) {
                println!("Game over!");
            } else {
                println!("Waiting for the opponent...");
            }
        }
        MoveAttemptOutcome::Illegal => println!("Impossible move: {} -> {}", from, to),
        MoveAttemptOutcome::Ignored => match participant.game() {
            None => println!("No game in progress."),
            Some(game) if game.terminal() => println!("The game is over."),
            Some(_) => println!("Not your move."),
        },
    }
}

fn parse_move(line: &str) -> Option<(String, String)> {
    let words = line.split_whitespace().collect_vec();
    match words[..] {
        [word] if word.len() == 4 && word.is_ascii() => {
            Some((word[..2].to_owned(), word[2..].to_owned()))
        }
        [from, to] => Some((from.to_owned(), to.to_owned())),
        _ => None,
    }
}

fn render(participant: &ParticipantState) {
    if let Some(game) = participant.game() {
        println!("{}", tui::render_position(game.position()));
    }
}
