//! HTTP request handlers.

pub mod webhook;
