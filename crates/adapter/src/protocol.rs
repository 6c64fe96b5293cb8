//! Protocol module - JSON message types for the session adapter
//!
//! Line-delimited JSON. All messages have: type, seq (sequence number), ts (timestamp in ms)

use serde::{Deserialize, Serialize};

use hexfill_core::{Board, FigureSnapshot, PlacementResult, SessionSnapshot};
use hexfill_engine::Evaluation;
use hexfill_types::{Color, Point, Position};

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommandType {
    #[serde(rename = "command")]
    #[default]
    Command,
}

/// Client hello message (first message to open a session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    /// Seed for the figure sequence; the server picks one if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(default = "default_true")]
    pub stream_observations: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Command message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub action: ActionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
    /// Board-space drop point of the grab cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<PointWire>,
    /// Board position for the grab cell (takes precedence over `point`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Coord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Rotate,
    Drop,
    Highlight,
    Hint,
    Restart,
}

impl ActionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::Rotate => "rotate",
            ActionName::Drop => "drop",
            ActionName::Highlight => "highlight",
            ActionName::Hint => "hint",
            ActionName::Restart => "restart",
        }
    }
}

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("rotate") {
            Ok(Self::Rotate)
        } else if s.eq_ignore_ascii_case("drop") {
            Ok(Self::Drop)
        } else if s.eq_ignore_ascii_case("highlight") {
            Ok(Self::Highlight)
        } else if s.eq_ignore_ascii_case("hint") {
            Ok(Self::Hint)
        } else if s.eq_ignore_ascii_case("restart") {
            Ok(Self::Restart)
        } else {
            Err(serde::de::Error::custom("unknown action"))
        }
    }
}

impl Serialize for ActionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Board position on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i8,
    pub column: i8,
}

impl From<Position> for Coord {
    fn from(value: Position) -> Self {
        Self {
            row: value.row,
            column: value.column,
        }
    }
}

impl From<Coord> for Position {
    fn from(value: Coord) -> Self {
        Position::new(value.row, value.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointWire {
    pub x: f32,
    pub y: f32,
}

impl From<PointWire> for Point {
    fn from(value: PointWire) -> Self {
        Point::new(value.x, value.y)
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
    /// Command understood but the move was not legal
    #[serde(rename = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "invalid_slot")]
    InvalidSlot,
    #[serde(rename = "game_over")]
    GameOver,
}

/// Board description sent once in the welcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    pub rows: u8,
    pub max_columns: u8,
    pub cell_count: usize,
    pub hexagon_count: usize,
    pub hexagon_bonus: u32,
    pub cell_size: f32,
    pub step_x: f32,
    pub step_y: f32,
    pub reversed_padding: f32,
}

impl From<&Board> for BoardInfo {
    fn from(board: &Board) -> Self {
        let geometry = board.geometry();
        Self {
            rows: board.rows(),
            max_columns: board.max_columns(),
            cell_count: board.cell_count(),
            hexagon_count: board.hexagons().len(),
            hexagon_bonus: board.hexagon_bonus(),
            cell_size: geometry.size,
            step_x: geometry.step_x,
            step_y: geometry.step_y,
            reversed_padding: geometry.reversed_padding,
        }
    }
}

/// Palette entry so clients can draw the color codes of the board grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub code: u8,
    pub name: String,
    pub rgb: [u8; 3],
}

impl From<Color> for PaletteEntry {
    fn from(color: Color) -> Self {
        let (r, g, b) = color.rgb();
        Self {
            code: color.code(),
            name: color.as_str().to_string(),
            rgb: [r, g, b],
        }
    }
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub session_id: u64,
    pub game_id: String,
    pub seed: u32,
    pub board: BoardInfo,
    pub palette: Vec<PaletteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AckResult {
    Drop {
        accepted: bool,
        score_delta: u32,
        cells_filled: u32,
        bonus_points: u32,
        hexagons_cleared: u32,
        game_over: bool,
        new_best: bool,
    },
    Rotate {
        slot: usize,
        rotation_index: u8,
    },
    Highlight {
        cells: Vec<Coord>,
    },
    Hint {
        hint: Option<HintWire>,
    },
    Restart {
        round: u32,
    },
}

impl AckResult {
    pub fn drop(placement: &PlacementResult, score_delta: u32, game_over: bool, new_best: bool) -> Self {
        AckResult::Drop {
            accepted: placement.accepted,
            score_delta,
            cells_filled: placement.cells_filled,
            bonus_points: placement.bonus_points,
            hexagons_cleared: placement.hexagons_cleared,
            game_over,
            new_best,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintWire {
    pub slot: usize,
    pub rotation: u8,
    pub anchor: Coord,
    pub score_delta: u32,
}

impl From<Evaluation> for HintWire {
    fn from(value: Evaluation) -> Self {
        Self {
            slot: value.placement.slot,
            rotation: value.placement.rotation,
            anchor: value.placement.anchor.into(),
            score_delta: value.score_delta,
        }
    }
}

/// Acknowledgment for an applied command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AckResult>,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FigureCellWire {
    pub row: i8,
    pub column: i8,
    /// `normal` or `reversed`
    pub orientation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureWire {
    pub color: String,
    pub rotation_index: u8,
    pub cells: Vec<FigureCellWire>,
}

impl From<&FigureSnapshot> for FigureWire {
    fn from(value: &FigureSnapshot) -> Self {
        Self {
            color: value.color.as_str().to_string(),
            rotation_index: value.rotation_index,
            cells: value
                .cells
                .iter()
                .map(|c| FigureCellWire {
                    row: c.offset.row,
                    column: c.offset.column,
                    orientation: c.orientation.as_str().to_string(),
                })
                .collect(),
        }
    }
}

/// Session state observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub session_id: u64,
    pub round: u32,
    pub playable: bool,
    pub game_over: bool,
    pub score: u32,
    pub best_score: u32,
    pub figures_placed: u32,
    /// Rows of color codes: null = no cell, 0 = empty
    pub board: Vec<Vec<Option<u8>>>,
    pub pool: Vec<FigureWire>,
    pub pending_removal: Vec<Coord>,
}

/// Build an observation from a session snapshot
pub fn build_observation(seq: u64, session_id: u64, snap: &SessionSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        session_id,
        round: snap.round,
        playable: snap.playable(),
        game_over: snap.game_over,
        score: snap.score,
        best_score: snap.best_score,
        figures_placed: snap.figures_placed,
        board: snap.board.clone(),
        pool: snap.pool.iter().map(FigureWire::from).collect(),
        pending_removal: snap.pending_removal.iter().copied().map(Coord::from).collect(),
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let head = serde_json::from_str::<TypeOnly>(json)?;
            match head.msg_type {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: head.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str, seed: Option<u32>) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        seed,
        stream_observations: true,
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    session_id: u64,
    seed: u32,
    board: &Board,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        session_id,
        game_id: "hexfill".to_string(),
        seed,
        board: BoardInfo::from(board),
        palette: Color::ALL.into_iter().map(PaletteEntry::from).collect(),
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64, status: AckStatus, result: Option<AckResult>) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status,
        result,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
