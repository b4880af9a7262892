//! NDJSON bridge to a game-side adapter.
//!
//! The adapter (a script running inside the game) writes world events to
//! our stdin and executes the commands we write to stdout. See
//! [`protocol`] for the message shapes.

pub mod host;
pub mod protocol;
pub mod stdio;

pub use host::BridgeHost;
pub use protocol::{CommandTarget, InboundMessage, OutboundCommand};
pub use stdio::{DEFAULT_MAX_MESSAGE_SIZE, ReaderStats, run_reader, run_writer};
