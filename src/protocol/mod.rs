//! Synchronization protocol: commands in, events and snapshots out.
//!
//! Transport-agnostic: the types here round-trip through camelCase JSON
//! identically whether the carrier is HTTP, a socket, or a pub/sub hub.

pub mod message;
pub mod session;
pub mod snapshot;

pub use message::{Command, Event};
pub use session::GameSession;
pub use snapshot::Snapshot;
