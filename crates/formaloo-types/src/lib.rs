//! Shared domain types for the Formaloo bridge.
//!
//! This crate contains the domain types used across the workspace:
//! credentials, forms and fields, submissions, webhook registrations,
//! configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, secrecy.

pub mod config;
pub mod credential;
pub mod error;
pub mod form;
pub mod submission;
pub mod webhook;
