//! Schedule Loader
//!
//! The page-level loader hands the calendar a snapshot of everything it displays. Instants
//! travel as ISO-8601 strings and are rehydrated on deserialisation.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    appointments::{Appointment, AppointmentError},
    catalog::{Client, Product, Service},
    staff::{StaffId, StaffMember},
};

/// Errors loading a snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The data source could not be reached or refused the request.
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    /// The payload could not be decoded.
    #[error("malformed snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    /// A record in the payload broke its invariants.
    #[error(transparent)]
    InvalidRecord(#[from] AppointmentError),
}

/// Which slice of the schedule to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadScope {
    /// Restrict to a single staff member's book.
    pub staff_id: Option<StaffId>,

    /// First day to include.
    pub from: Option<Date>,

    /// Last day to include.
    pub to: Option<Date>,
}

/// Everything the calendar and checkout screens are seeded with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshot {
    /// Appointments in scope
    #[serde(default)]
    pub appointments: Vec<Appointment>,

    /// Staff, active and inactive
    #[serde(default)]
    pub staff: Vec<StaffMember>,

    /// Service menu
    #[serde(default)]
    pub services: Vec<Service>,

    /// Retail products
    #[serde(default)]
    pub products: Vec<Product>,

    /// Clients
    #[serde(default)]
    pub clients: Vec<Client>,
}

impl ScheduleSnapshot {
    /// Decode a JSON payload and validate its appointments.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Decode`] for malformed JSON and [`LoadError::InvalidRecord`] if an
    /// appointment breaks its invariants.
    pub fn from_json(payload: &str) -> Result<Self, LoadError> {
        let snapshot: Self = serde_json::from_str(payload)?;

        snapshot.validate()?;

        Ok(snapshot)
    }

    /// Validate every appointment.
    ///
    /// # Errors
    ///
    /// Returns the first [`AppointmentError`] encountered.
    pub fn validate(&self) -> Result<(), AppointmentError> {
        self.appointments.iter().try_for_each(Appointment::validate)
    }
}

/// Source of schedule snapshots.
#[automock]
#[async_trait]
pub trait ScheduleLoader: Send + Sync {
    /// Load the snapshot for a scope.
    async fn load(&self, scope: LoadScope) -> Result<ScheduleSnapshot, LoadError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const PAYLOAD: &str = r#"{
        "appointments": [{
            "id": "a1",
            "clientId": "c1",
            "staffId": "s1",
            "serviceId": "sv1",
            "clientName": "Ada",
            "staffName": "Grace",
            "serviceName": "Cut",
            "startTime": "2026-02-14T09:00:00Z",
            "endTime": "2026-02-14T10:00:00Z",
            "status": "pending",
            "price": "45"
        }],
        "staff": [{"id": "s1", "name": "Grace"}]
    }"#;

    #[test]
    fn from_json_rehydrates_records() -> TestResult {
        let snapshot = ScheduleSnapshot::from_json(PAYLOAD)?;

        assert_eq!(snapshot.appointments.len(), 1);
        assert_eq!(snapshot.staff.first().map(|s| s.active), Some(true));
        assert!(snapshot.services.is_empty());

        Ok(())
    }

    #[test]
    fn from_json_rejects_backwards_appointment() {
        let payload = PAYLOAD.replace("2026-02-14T10:00:00Z", "2026-02-14T08:00:00Z");

        assert!(matches!(
            ScheduleSnapshot::from_json(&payload),
            Err(LoadError::InvalidRecord(AppointmentError::InvalidTimeRange { .. }))
        ));
    }

    #[test]
    fn from_json_reports_decode_errors() {
        assert!(matches!(
            ScheduleSnapshot::from_json("{\"appointments\": 3}"),
            Err(LoadError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn loader_trait_can_be_mocked() -> TestResult {
        let mut loader = MockScheduleLoader::new();
        loader
            .expect_load()
            .returning(|_| Ok(ScheduleSnapshot::default()));

        let snapshot = loader.load(LoadScope::default()).await?;

        assert!(snapshot.appointments.is_empty());

        Ok(())
    }
}
