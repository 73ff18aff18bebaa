//! Talking to a UCI engine: wire format, session state machine and the
//! child-process transport.

pub mod bridge;
pub mod process;
pub mod protocol;

pub use bridge::{BridgeEvent, EngineBridge, SearchToken, SessionPhase};
pub use process::{EngineLines, EngineProcess};
pub use protocol::{EngineCommand, EngineReply, parse_uci_move};
