//! Bellbox Stream Layer
//!
//! Maintains one long-lived WebSocket channel to the server's push endpoint.
//! The stream layer handles:
//! - Connection lifecycle (connect, read, close)
//! - Bearer-credential handshake at connect time
//! - Frame parsing into the push envelope
//! - Drop detection and fixed-delay, indefinite reconnect
//!
//! The stream is decoupled from inbox logic via the [`StreamHandler`] trait.
//! A dropped connection is never user-visible beyond the passive
//! [`ConnectionState`] indicator; the retry is silent and unconditional.

pub mod connection;

pub use connection::{ConnectionState, StreamConfig, StreamConnection, StreamHandler};
