//! Core of prview: the review-service client and the Session/Review Controller.
//!
//! Nothing in this crate touches the terminal. The `prview` binary layers the
//! event loop and rendering on top.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod types;

pub use api::{HttpApi, ReviewApi};
pub use controller::{Controller, RequestId, Ticket, Workflow};
pub use error::{ApiError, ConfigError};
