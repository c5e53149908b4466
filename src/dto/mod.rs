//! Data Transfer Objects (DTOs) for the chat backend protocol.
//!
//! DTOs are organized by protocol:
//! - `http`: REST request/response DTOs
//! - `ws`: WebSocket frame DTOs

pub mod http;
pub mod ws;
