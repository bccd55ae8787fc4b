//! Network dispatch for prview.
//!
//! The UI task never awaits the network. Controller tickets are wrapped in an
//! [`ApiJob`] and sent to the worker, which runs each call on its own tokio
//! task and posts the [`ApiOutcome`] back onto the event bus.
pub mod worker;

pub use worker::{ApiJob, ApiOutcome};
