//! Session Facade - the one entry point callers outside this crate use.
//!
//! Wraps a [`Planner`] run with a soft wall-clock timeout: a session that
//! blows through it gets a failure response, not a hung connection.

use crate::error::Result;
use crate::planner::Planner;
use crate::types::{FinalResponse, UserInput};
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

/// Default soft timeout for an entire planning session.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(600);

/// Runs planning sessions against a shared [`Planner`].
pub struct SessionFacade {
    planner: Arc<Planner>,
    session_timeout: Duration,
}

impl SessionFacade {
    /// Wrap a planner with the default session timeout.
    #[must_use]
    pub fn new(planner: Arc<Planner>) -> Self {
        Self {
            planner,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }

    /// Wrap a planner with an explicit session timeout.
    #[must_use]
    pub fn with_timeout(planner: Arc<Planner>, session_timeout: Duration) -> Self {
        Self {
            planner,
            session_timeout,
        }
    }

    /// Run one planning session to completion, or to the soft timeout.
    #[instrument(skip(self, input), fields(message_len = input.message.len()))]
    pub async fn run(&self, input: UserInput) -> Result<FinalResponse> {
        match tokio::time::timeout(self.session_timeout, self.planner.run_session(input)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_secs = self.session_timeout.as_secs(), "session exceeded soft timeout");
                Ok(FinalResponse::message_only(
                    "This is taking longer than expected — please try again.",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_ten_minutes() {
        assert_eq!(DEFAULT_SESSION_TIMEOUT, Duration::from_secs(600));
    }
}
