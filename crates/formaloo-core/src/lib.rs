//! Business logic and port definitions for the Formaloo bridge.
//!
//! This crate defines the "ports" (`FormalooApi`, `InstanceStateStore`) that
//! the infrastructure layer implements, and the orchestration built on them:
//! authentication, catalog lookups, field resolution, submission, and the
//! webhook trigger lifecycle. It depends only on `formaloo-types` -- never on
//! `formaloo-infra` or any HTTP/database crate.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod resolver;
pub mod storage;
pub mod submission;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;
