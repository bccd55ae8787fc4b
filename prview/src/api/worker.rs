//! Background dispatcher that owns the `ReviewApi` for its lifetime.
//!
//! All communication is via channels: `ApiJob` in, `AppEvent::Api` out. One
//! job never blocks another; ordering of completions is not guaranteed, which
//! is why every outcome carries the request id its ticket was issued with.

use std::sync::Arc;

use prview_core::controller::ReviewDispatch;
use prview_core::types::{LoginRequest, LoginResponse, RegisterRequest, ReviewResult};
use prview_core::{ApiError, RequestId, ReviewApi, Ticket};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::event::AppEvent;

/// Commands sent from the UI task to the worker.
#[derive(Debug)]
pub enum ApiJob {
    Register(Ticket<RegisterRequest>),
    Login(Ticket<LoginRequest>),
    Review(Ticket<ReviewDispatch>),
}

impl ApiJob {
    pub fn id(&self) -> RequestId {
        match self {
            ApiJob::Register(t) => t.id,
            ApiJob::Login(t) => t.id,
            ApiJob::Review(t) => t.id,
        }
    }

    /// The outcome this job would have produced had the call failed with `error`.
    pub fn into_failure(self, error: ApiError) -> ApiOutcome {
        match self {
            ApiJob::Register(t) => ApiOutcome::Register {
                id: t.id,
                result: Err(error),
            },
            ApiJob::Login(t) => ApiOutcome::Login {
                id: t.id,
                result: Err(error),
            },
            ApiJob::Review(t) => ApiOutcome::Review {
                id: t.id,
                result: Err(error),
            },
        }
    }
}

/// Result payload sent from a worker task back to the UI task.
#[derive(Debug)]
pub enum ApiOutcome {
    Register {
        id: RequestId,
        result: Result<(), ApiError>,
    },
    Login {
        id: RequestId,
        result: Result<LoginResponse, ApiError>,
    },
    Review {
        id: RequestId,
        result: Result<ReviewResult, ApiError>,
    },
}

/// Entry point for the dispatcher task.
///
/// Loops over incoming jobs until the channel is closed (sender dropped),
/// spawning one task per job. Results go back via `event_tx`; a closed event
/// channel means the UI is shutting down and the result is dropped.
pub async fn api_worker_loop(
    api: Arc<dyn ReviewApi>,
    mut rx: UnboundedReceiver<ApiJob>,
    event_tx: UnboundedSender<AppEvent>,
) {
    while let Some(job) = rx.recv().await {
        let api = Arc::clone(&api);
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            let outcome = run_job(api.as_ref(), job).await;
            let _ = event_tx.send(AppEvent::Api(Box::new(outcome)));
        });
    }
    tracing::debug!("api worker stopped");
}

/// Performs one call and wraps its result with the ticket id.
pub async fn run_job(api: &dyn ReviewApi, job: ApiJob) -> ApiOutcome {
    match job {
        ApiJob::Register(t) => ApiOutcome::Register {
            id: t.id,
            result: api.register(&t.request).await,
        },
        ApiJob::Login(t) => ApiOutcome::Login {
            id: t.id,
            result: api.login(&t.request).await,
        },
        ApiJob::Review(t) => {
            let dispatch = &t.request;
            ApiOutcome::Review {
                id: t.id,
                result: api.review(&dispatch.credential, &dispatch.body).await,
            }
        }
    }
}
