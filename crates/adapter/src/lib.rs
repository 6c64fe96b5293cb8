//! Adapter module - play sessions over a TCP socket with a JSON protocol
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome` and
//!    opens a fresh session for this connection
//! 3. **Commanding**: Client sends `command` messages; each gets an `ack` or an
//!    `error`, and state changes are followed by an `observation`
//!
//! Every connection plays its own game. Only the best score is shared.
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: client info, protocol version, optional seed
//! - **command**: `rotate`, `drop`, `highlight`, `hint` or `restart`
//!
//! ## Server → Client
//!
//! - **welcome**: session id, seed and board geometry
//! - **observation**: board grid, offered figures, score, pending removals
//! - **ack**: command result (`ok` or `rejected` for a drop that did not fit)
//! - **error**: `handshake_required`, `protocol_mismatch`, `invalid_command`,
//!   `invalid_slot` or `game_over`
//!
//! # Environment Variables
//!
//! - `HEXFILL_HOST`: Bind address (default: "127.0.0.1")
//! - `HEXFILL_PORT`: Port number (default: 7878)
//! - `HEXFILL_BEST_SCORE_PATH`: Best-score file (default: "best_score.txt")
//! - `HEXFILL_POOL_SIZE`: Figures offered at a time (default: 3)
//! - `HEXFILL_HEXAGON_BONUS`: Points per cleared hexagon (default: 60)
//! - `HEXFILL_SEED`: Seed for sessions whose hello has none
//! - `HEXFILL_LOG_PATH`: Append every wire line to this file
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0.1.0"},"protocol_version":"1.0.0","seed":7}
//! Server -> Client: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","session_id":1,"game_id":"hexfill","seed":7,"board":{...}}
//! Server -> Client: {"type":"observation","seq":1,...,"board":[[null,null,0,...],...],"pool":[...]}
//! Client -> Server: {"type":"command","seq":2,"ts":0,"action":"drop","slot":0,"anchor":{"row":2,"column":0}}
//! Server -> Client: {"type":"ack","seq":2,"ts":...,"status":"ok","result":{"kind":"drop","accepted":true,...}}
//! ```

pub mod protocol;
pub mod server;
pub mod store;

pub use hexfill_core as core;
pub use hexfill_types as types;

pub use protocol::*;
pub use server::*;
pub use store::{FileBestScore, SharedBestScore};
