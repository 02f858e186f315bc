//! Formaloo REST client.

pub mod client;
pub mod types;

pub use client::FormalooHttpClient;
