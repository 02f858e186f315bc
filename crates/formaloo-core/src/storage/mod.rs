//! Storage abstractions for trigger instances.
//!
//! Defines the instance-scoped key-value store trait.
//! Implementations live in formaloo-infra.

pub mod state_store;
