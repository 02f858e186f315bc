//! Infrastructure layer for the Formaloo bridge.
//!
//! Contains implementations of the ports defined in `formaloo-core`:
//! the reqwest-based Formaloo REST client, SQLite instance state, and the
//! configuration loader.

pub mod config;
pub mod http;
pub mod sqlite;
