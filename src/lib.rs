//! A Secret Hitler rules engine, and the table server that hosts it.
//!
//! The engine lives in [game]: a pure [game::update] function folds events into
//! an immutable [game::GameState]. Everything else here is transport.

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod time;
pub mod ws;
