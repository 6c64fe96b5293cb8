//! TCP server for the session adapter
//!
//! Every connection owns one [`GameSession`]. The reader loop applies commands
//! directly to it and queues replies for a per-client writer task, so sessions
//! never share mutable state apart from the best-score store.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

use hexfill_core::{BestScoreStore, GameSession, RandomSource, SessionConfig, SimpleRng};
use hexfill_engine::best_hint;
use hexfill_types::{Point, Position};

use crate::protocol::*;
use crate::store::{FileBestScore, SharedBestScore};

pub type ServerSession = GameSession<SimpleRng, SharedBestScore>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    /// `None` keeps the best score in memory only
    pub best_score_path: Option<PathBuf>,
    /// Fixed seed for sessions whose hello carries none
    pub seed: Option<u32>,
    pub session: SessionConfig,
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: "1.0.0".to_string(),
            best_score_path: None,
            seed: None,
            session: SessionConfig::default(),
            log_path: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ServerConfig {
    /// Create from `HEXFILL_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = non_empty_var("HEXFILL_HOST").unwrap_or(defaults.host);
        let port = non_empty_var("HEXFILL_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let best_score_path = Some(PathBuf::from(
            non_empty_var("HEXFILL_BEST_SCORE_PATH").unwrap_or_else(|| "best_score.txt".to_string()),
        ));
        let seed = non_empty_var("HEXFILL_SEED").and_then(|s| s.parse().ok());

        let mut session = SessionConfig::default();
        if let Some(pool_size) = non_empty_var("HEXFILL_POOL_SIZE").and_then(|s| s.parse().ok()) {
            session.pool_size = pool_size;
        }
        if let Some(bonus) = non_empty_var("HEXFILL_HEXAGON_BONUS").and_then(|s| s.parse().ok()) {
            session.board.hexagon_bonus = bonus;
        }

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            best_score_path,
            seed,
            session,
            log_path: non_empty_var("HEXFILL_LOG_PATH"),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }

    /// The store every session of this server records into
    pub fn open_store(&self) -> SharedBestScore {
        match &self.best_score_path {
            Some(path) => SharedBestScore::new(FileBestScore::open(path.clone())),
            None => SharedBestScore::in_memory(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

impl ClientOutbound {
    fn write_json(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            ClientOutbound::Welcome(v) => serde_json::to_writer(buf, v),
            ClientOutbound::Ack(v) => serde_json::to_writer(buf, v),
            ClientOutbound::Error(v) => serde_json::to_writer(buf, v),
            ClientOutbound::Observation(v) => serde_json::to_writer(buf, v),
        }
    }
}

fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<Vec<u8>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                warn!("wire log {} unavailable: {}", path, e);
                return;
            }
        };

        while let Some(line) = rx.recv().await {
            if file.write_all(&line).await.is_err() || file.write_all(b"\n").await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address once the listener is up, which lets
/// callers bind port 0.
pub async fn run_server(
    config: ServerConfig,
    store: SharedBestScore,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let bound = listener.local_addr()?;
    info!("listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut session_counter = 0u64;

    loop {
        let (socket, addr) = listener.accept().await?;
        session_counter += 1;
        let session_id = session_counter;

        info!("client {} connected from {}", session_id, addr);

        let config = config.clone();
        let store = store.clone();
        let wire_log_tx = wire_log_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, session_id, config, store, wire_log_tx).await {
                warn!("client {} error: {}", session_id, e);
            }
            info!("client {} disconnected", session_id);
        });
    }
}

fn fresh_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    (nanos as u32) ^ ((nanos >> 32) as u32)
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    session_id: u64,
    config: ServerConfig,
    store: SharedBestScore,
    wire_log_tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    let wire_log_tx_out = wire_log_tx.clone();
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if msg.write_json(&mut buf).is_err() {
                continue;
            }
            if let Some(tx) = wire_log_tx_out.as_ref() {
                let _ = tx.send(buf.clone());
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut line = String::new();
    let mut session: Option<ServerSession> = None;
    let mut stream_observations = true;
    let mut last_seq: Option<u64> = None;

    let mut check_seq = |seq: u64| -> bool {
        match last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                last_seq = Some(seq);
                true
            }
        }
    };

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(tx) = wire_log_tx.as_ref() {
            let _ = tx.send(trimmed.as_bytes().to_vec());
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if session.is_some() {
                    let error =
                        create_error(hello.seq, ErrorCode::InvalidCommand, "session already open");
                    let _ = tx.send(ClientOutbound::Error(error));
                    continue;
                }

                let major = config.protocol_version.split('.').next().unwrap_or("1");
                if hello.protocol_version.split('.').next() != Some(major) {
                    let error = create_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    let _ = tx.send(ClientOutbound::Error(error));
                    break;
                }

                check_seq(hello.seq);
                stream_observations = hello.stream_observations;

                let seed = hello.seed.or(config.seed).unwrap_or_else(fresh_seed);
                let new_session = GameSession::new(
                    config.session.clone(),
                    SimpleRng::new(seed),
                    store.clone(),
                )?;
                info!(
                    "client {} ({} {}) opened a session with seed {}",
                    session_id, hello.client.name, hello.client.version, seed
                );

                let welcome = create_welcome(
                    hello.seq,
                    &config.protocol_version,
                    session_id,
                    seed,
                    new_session.board(),
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                let opened = session.insert(new_session);
                if stream_observations {
                    let obs = build_observation(hello.seq, session_id, &opened.snapshot());
                    let _ = tx.send(ClientOutbound::Observation(obs));
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                let Some(session) = session.as_mut() else {
                    let error =
                        create_error(cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    let _ = tx.send(ClientOutbound::Error(error));
                    continue;
                };

                if !check_seq(cmd.seq) {
                    let error = create_error(
                        cmd.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    let _ = tx.send(ClientOutbound::Error(error));
                    continue;
                }

                let applied = match map_command(&cmd) {
                    Ok(command) => apply_command(session, command),
                    Err(e) => Err(e),
                };
                match applied {
                    Ok(applied) => {
                        debug!("client {} {} -> {:?}", session_id, cmd.action.as_str(), applied.status);
                        let ack = create_ack(cmd.seq, applied.status, Some(applied.result));
                        let _ = tx.send(ClientOutbound::Ack(ack));
                        if applied.changed {
                            if stream_observations {
                                let obs = build_observation(cmd.seq, session_id, &session.snapshot());
                                let _ = tx.send(ClientOutbound::Observation(obs));
                            }
                            session.take_pending_removal();
                        }
                    }
                    Err((code, message)) => {
                        let error = create_error(cmd.seq, code, &message);
                        let _ = tx.send(ClientOutbound::Error(error));
                    }
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                let error = create_error(unknown.seq, ErrorCode::InvalidCommand, "Unknown message type");
                let _ = tx.send(ClientOutbound::Error(error));
            }

            Err(e) => {
                let error = create_error(0, ErrorCode::InvalidCommand, &format!("JSON parse error: {}", e));
                let _ = tx.send(ClientOutbound::Error(error));
            }
        }
    }

    drop(tx);
    let _ = write_task.await;

    Ok(())
}

/// Where a drop or highlight aims the grab cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropTarget {
    Point(Point),
    Anchor(Position),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    Rotate { slot: usize },
    Drop { slot: usize, target: DropTarget },
    Highlight { slot: usize, target: DropTarget },
    Hint,
    Restart,
}

/// Result of applying one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub status: AckStatus,
    pub result: AckResult,
    /// Board, pool or score changed, so observers need a fresh observation
    pub changed: bool,
}

type CommandError = (ErrorCode, String);

/// Map a protocol command into a session command
pub fn map_command(cmd: &CommandMessage) -> Result<SessionCommand, CommandError> {
    let slot = || {
        cmd.slot
            .ok_or_else(|| (ErrorCode::InvalidCommand, format!("{} needs a slot", cmd.action.as_str())))
    };
    let target = || match (cmd.anchor, cmd.point) {
        (Some(anchor), _) => Ok(DropTarget::Anchor(anchor.into())),
        (None, Some(point)) => Ok(DropTarget::Point(point.into())),
        (None, None) => Err((
            ErrorCode::InvalidCommand,
            format!("{} needs an anchor or a point", cmd.action.as_str()),
        )),
    };

    Ok(match cmd.action {
        ActionName::Rotate => SessionCommand::Rotate { slot: slot()? },
        ActionName::Drop => SessionCommand::Drop {
            slot: slot()?,
            target: target()?,
        },
        ActionName::Highlight => SessionCommand::Highlight {
            slot: slot()?,
            target: target()?,
        },
        ActionName::Hint => SessionCommand::Hint,
        ActionName::Restart => SessionCommand::Restart,
    })
}

fn invalid_slot(slot: usize) -> CommandError {
    (ErrorCode::InvalidSlot, format!("no figure in slot {slot}"))
}

/// Apply a session command and describe the outcome
pub fn apply_command<R: RandomSource, S: BestScoreStore>(
    session: &mut GameSession<R, S>,
    command: SessionCommand,
) -> Result<Applied, CommandError> {
    match command {
        SessionCommand::Rotate { slot } => {
            if !session.rotate(slot) {
                return Err(invalid_slot(slot));
            }
            let rotation_index = session.figure(slot).map_or(0, |f| f.rotation_index());
            Ok(Applied {
                status: AckStatus::Ok,
                result: AckResult::Rotate {
                    slot,
                    rotation_index,
                },
                changed: true,
            })
        }
        SessionCommand::Drop { slot, target } => {
            if session.is_over() {
                return Err((ErrorCode::GameOver, "session is over; send restart".to_string()));
            }
            if session.figure(slot).is_none() {
                return Err(invalid_slot(slot));
            }
            let outcome = match target {
                DropTarget::Point(point) => session.drop(slot, point),
                DropTarget::Anchor(anchor) => session.drop_at(slot, anchor),
            };
            Ok(Applied {
                status: if outcome.accepted {
                    AckStatus::Ok
                } else {
                    AckStatus::Rejected
                },
                result: AckResult::drop(
                    &outcome.placement,
                    outcome.score_delta,
                    outcome.game_over,
                    outcome.new_best,
                ),
                changed: outcome.accepted,
            })
        }
        SessionCommand::Highlight { slot, target } => {
            let Some(figure) = session.figure(slot) else {
                return Err(invalid_slot(slot));
            };
            let board = session.board();
            let cells = match target {
                DropTarget::Point(point) => board.highlight_candidates(figure, point),
                DropTarget::Anchor(anchor) => board.highlight_candidates_at(figure, anchor),
            };
            Ok(Applied {
                status: AckStatus::Ok,
                result: AckResult::Highlight {
                    cells: cells.into_iter().map(Coord::from).collect(),
                },
                changed: false,
            })
        }
        SessionCommand::Hint => {
            let hint = if session.is_over() {
                None
            } else {
                best_hint(
                    session.board(),
                    session.pool(),
                    session.config().points_per_cell,
                )
            };
            Ok(Applied {
                status: AckStatus::Ok,
                result: AckResult::Hint {
                    hint: hint.map(HintWire::from),
                },
                changed: false,
            })
        }
        SessionCommand::Restart => {
            session.restart();
            Ok(Applied {
                status: AckStatus::Ok,
                result: AckResult::Restart {
                    round: session.round(),
                },
                changed: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(json: &str) -> CommandMessage {
        match parse_message(json).unwrap() {
            ParsedMessage::Command(cmd) => cmd,
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn test_server_config_from_env() {
        // This test just ensures it doesn't panic
        let config = ServerConfig::from_env();
        assert!(config.best_score_path.is_some());
    }

    #[test]
    fn test_socket_addr_rejects_garbage_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
        assert!(ServerConfig::default().socket_addr().is_ok());
    }

    #[test]
    fn test_map_command_requires_slot_and_target() {
        let missing_slot = command(r#"{"type":"command","seq":1,"ts":0,"action":"rotate"}"#);
        assert_eq!(map_command(&missing_slot).unwrap_err().0, ErrorCode::InvalidCommand);

        let missing_target = command(r#"{"type":"command","seq":1,"ts":0,"action":"drop","slot":0}"#);
        assert_eq!(map_command(&missing_target).unwrap_err().0, ErrorCode::InvalidCommand);

        let both = command(
            r#"{"type":"command","seq":1,"ts":0,"action":"drop","slot":0,"point":{"x":1.0,"y":2.0},"anchor":{"row":3,"column":4}}"#,
        );
        assert_eq!(
            map_command(&both).unwrap(),
            SessionCommand::Drop {
                slot: 0,
                target: DropTarget::Anchor(Position::new(3, 4)),
            }
        );
    }

    #[test]
    fn test_rotate_reports_new_index() {
        let mut session = GameSession::seeded(8);
        let applied = apply_command(&mut session, SessionCommand::Rotate { slot: 1 }).unwrap();
        assert_eq!(
            applied.result,
            AckResult::Rotate {
                slot: 1,
                rotation_index: 1
            }
        );
        assert!(applied.changed);
        assert_eq!(
            apply_command(&mut session, SessionCommand::Rotate { slot: 5 })
                .unwrap_err()
                .0,
            ErrorCode::InvalidSlot
        );
    }

    #[test]
    fn test_rejected_drop_is_acked_not_errored() {
        let mut session = GameSession::seeded(8);
        let applied = apply_command(
            &mut session,
            SessionCommand::Drop {
                slot: 0,
                target: DropTarget::Point(Point::new(-500.0, -500.0)),
            },
        )
        .unwrap();
        assert_eq!(applied.status, AckStatus::Rejected);
        assert!(!applied.changed);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_anchor_at_coordinate_limit_is_rejected() {
        let mut session = GameSession::seeded(8);
        for anchor in [Position::new(127, 127), Position::new(-128, -128)] {
            let applied = apply_command(
                &mut session,
                SessionCommand::Drop {
                    slot: 0,
                    target: DropTarget::Anchor(anchor),
                },
            )
            .unwrap();
            assert_eq!(applied.status, AckStatus::Rejected);

            let applied = apply_command(
                &mut session,
                SessionCommand::Highlight {
                    slot: 0,
                    target: DropTarget::Anchor(anchor),
                },
            )
            .unwrap();
            assert_eq!(applied.result, AckResult::Highlight { cells: Vec::new() });
        }
        assert_eq!(session.board().filled_count(), 0);
    }

    #[test]
    fn test_hint_then_drop_scores() {
        let mut session = GameSession::seeded(21);
        let applied = apply_command(&mut session, SessionCommand::Hint).unwrap();
        let AckResult::Hint { hint: Some(hint) } = applied.result else {
            panic!("expected a hint on an empty board");
        };

        while session.figure(hint.slot).unwrap().rotation_index() != hint.rotation {
            apply_command(&mut session, SessionCommand::Rotate { slot: hint.slot }).unwrap();
        }
        let applied = apply_command(
            &mut session,
            SessionCommand::Drop {
                slot: hint.slot,
                target: DropTarget::Anchor(hint.anchor.into()),
            },
        )
        .unwrap();
        assert_eq!(applied.status, AckStatus::Ok);
        assert_eq!(session.score(), hint.score_delta);
    }

    #[test]
    fn test_restart_bumps_round() {
        let mut session = GameSession::seeded(2);
        let applied = apply_command(&mut session, SessionCommand::Restart).unwrap();
        assert_eq!(applied.result, AckResult::Restart { round: 1 });
    }
}
