//! Appointment Mutations
//!
//! Persisting changes is someone else's job; this module describes the calls the
//! scheduling controller makes and the shape of their answers.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    appointments::{AppointmentId, AppointmentStatus},
    staff::StaffId,
};

/// Fallback message when a failed response carries none.
const UNKNOWN_FAILURE: &str = "the request failed";

/// A mutation the data layer refused or could not complete.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct MutationError {
    /// Human-readable reason
    pub message: String,
}

impl MutationError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Wire shape of a mutation result: `{ "success": bool, "error"?: string }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// Whether the change was persisted
    pub success: bool,

    /// Failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationResponse {
    /// Convert into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] when `success` is false.
    pub fn into_result(self) -> Result<(), MutationError> {
        if self.success {
            Ok(())
        } else {
            Err(MutationError::new(
                self.error.unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
            ))
        }
    }
}

/// New placement for a rescheduled appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reschedule {
    /// New start instant
    pub start_time: Timestamp,

    /// New end instant
    pub end_time: Timestamp,

    /// Staff member now performing the service
    pub staff_id: StaffId,
}

/// Appointment writes performed by the data layer.
#[automock]
#[async_trait]
pub trait AppointmentMutations: Send + Sync {
    /// Persist a status change.
    async fn change_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), MutationError>;

    /// Persist a new time and staff assignment.
    async fn reschedule(
        &self,
        id: &AppointmentId,
        reschedule: &Reschedule,
    ) -> Result<(), MutationError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn successful_response_is_ok() -> TestResult {
        let response: MutationResponse = serde_json::from_str(r#"{"success": true}"#)?;

        assert_eq!(response.into_result(), Ok(()));

        Ok(())
    }

    #[test]
    fn failed_response_carries_message() -> TestResult {
        let response: MutationResponse =
            serde_json::from_str(r#"{"success": false, "error": "slot taken"}"#)?;

        assert_eq!(response.into_result(), Err(MutationError::new("slot taken")));

        Ok(())
    }

    #[test]
    fn failed_response_without_message_uses_fallback() {
        let response = MutationResponse {
            success: false,
            error: None,
        };

        assert_eq!(
            response.into_result(),
            Err(MutationError::new(UNKNOWN_FAILURE))
        );
    }
}
