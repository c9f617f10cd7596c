//! Per-attempt observations reported during a poll cycle.

use crate::error::ProbeError;
use crate::probe::ProbeResponse;

/// The outcome of probing one host.
///
/// Delivered to the `on_poll_result` callback once per host attempted, in
/// attempt order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollResult {
    /// The host answered.
    Response {
        /// The response received.
        response: ProbeResponse,
        /// Whether the status code counts as reachable.
        is_success: bool,
    },
    /// The request failed before a response arrived.
    Error {
        /// What went wrong.
        error: ProbeError,
    },
}

impl PollResult {
    /// Whether this attempt proved the network reachable.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Response { is_success: true, .. })
    }
}

impl From<ProbeResponse> for PollResult {
    fn from(response: ProbeResponse) -> Self {
        let is_success = response.is_success();
        Self::Response {
            response,
            is_success,
        }
    }
}

impl From<ProbeError> for PollResult {
    fn from(error: ProbeError) -> Self {
        Self::Error { error }
    }
}
