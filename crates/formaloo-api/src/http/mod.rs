//! HTTP layer for the webhook receiver.
//!
//! Axum server exposing `POST /webhook/{instance_id}` for Formaloo
//! deliveries and `GET /health`. Responses use the envelope format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
