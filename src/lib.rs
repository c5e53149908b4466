//! idobata — a terminal chat client over REST and a single WebSocket.
//!
//! The client keeps session credentials, the active channel id, and one live
//! socket; server pushes are mirrored into the visible message list, while
//! channel listing, history, channel creation, and sends are plain
//! request/response calls.

// client component
pub mod client;
pub mod dto;
pub mod error;

// shared library
pub mod common;
