//! Networking modules for the backend's HTTP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` moves requests over `gloo-net`, `api` maps endpoints onto typed
//! calls, `error` defines the failure taxonomy, and `types` defines the wire
//! schema.

pub mod api;
pub mod error;
pub mod transport;
pub mod types;
