//! Chat client implementation.

pub mod api;
pub mod app;
pub mod channels;
pub mod command;
pub mod domain;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod socket;
pub mod view;

pub use runner::run_client;
