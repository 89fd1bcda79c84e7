//! # jsonstore Server
//!
//! HTTP façade over the jsonstore core: routing, request extraction and the
//! mapping of store outcomes onto status codes and JSON envelopes.

#![warn(missing_docs)]

/// HTTP API handlers and routing
pub mod api;

/// Server constants
pub mod constants;
