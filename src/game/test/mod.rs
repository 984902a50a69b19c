//! Tests for the Secret Hitler rules engine
//!
//! Each submodule drives the reducer through `update` with scripted or seeded
//! randomness, so every game here is reproducible.

#![cfg(test)]
#![allow(clippy::bool_assert_comparison)]

pub mod player_management;
pub mod role_knowledge;
