//! Websocket transport: per-connection session actors, the connection
//! registry, and the JSON wire protocol.

pub mod hub;
pub mod protocol;
pub mod session;
