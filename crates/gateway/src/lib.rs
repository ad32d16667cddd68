//! Access-log service client.
//!
//! Defines the [`AccessGateway`] contract the terminal talks through
//! (scan submission, clarification, log fetch, control flag) and the
//! [`AccessApi`] REST implementation backed by [`reqwest`].

pub mod api;
pub mod contract;
pub mod wire;

pub use api::{AccessApi, GatewayError};
pub use contract::AccessGateway;
