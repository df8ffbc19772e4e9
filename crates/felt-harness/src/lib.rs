//! Deterministic test harness for the Felt sync core.
//!
//! An in-memory [`felt_client::Transport`] implementation plus canonical
//! table fixtures. Tests drive the scripted server side — inject snapshots
//! and errors, drop and restore the duplex link, queue one-shot call
//! responses — and assert on what the client pushed, with no sockets and no
//! real server.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod sim_transport;

pub use sim_transport::{SimServer, SimTransport, sim_pair};
