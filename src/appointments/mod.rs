//! Appointments

use jiff::{SignedDuration, Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{Client, ClientId, Service, ServiceId},
    ids::TypedId,
    staff::{StaffId, StaffMember},
};

pub mod status;

pub use status::{ALL_STATUSES, AppointmentAction, AppointmentStatus, UnknownStatus};

/// Appointment Id
pub type AppointmentId = TypedId<Appointment>;

/// Errors raised when an appointment record breaks its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppointmentError {
    /// The appointment ends at or before it starts.
    #[error("appointment {id} ends at {end} which is not after its start {start}")]
    InvalidTimeRange {
        /// Offending appointment.
        id: String,
        /// Start instant.
        start: Timestamp,
        /// End instant.
        end: Timestamp,
    },

    /// The price is negative.
    #[error("appointment {0} has a negative price")]
    NegativePrice(String),
}

/// A booked appointment.
///
/// `client_name`, `staff_name` and `service_name` are point-in-time copies of the joined
/// records, so a list can be displayed without further lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Appointment id
    pub id: AppointmentId,

    /// Client being served
    pub client_id: ClientId,

    /// Staff member performing the service
    pub staff_id: StaffId,

    /// Booked service
    pub service_id: ServiceId,

    /// Client display name
    pub client_name: String,

    /// Staff display name
    pub staff_name: String,

    /// Service display name
    pub service_name: String,

    /// Start instant
    pub start_time: Timestamp,

    /// End instant, strictly after `start_time`
    pub end_time: Timestamp,

    /// Lifecycle status
    pub status: AppointmentStatus,

    /// Price in the business currency
    pub price: Decimal,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    /// Check the record invariants.
    ///
    /// # Errors
    ///
    /// - [`AppointmentError::InvalidTimeRange`] when `end_time <= start_time`.
    /// - [`AppointmentError::NegativePrice`] when the price is below zero.
    pub fn validate(&self) -> Result<(), AppointmentError> {
        validate_time_range(&self.id, self.start_time, self.end_time)?;

        if self.price < Decimal::ZERO {
            return Err(AppointmentError::NegativePrice(self.id.to_string()));
        }

        Ok(())
    }

    /// Length of the appointment.
    #[must_use]
    pub fn duration(&self) -> SignedDuration {
        self.end_time.duration_since(self.start_time)
    }

    /// Whether the appointment starts on the given calendar day in `tz`.
    #[must_use]
    pub fn occurs_on(&self, date: Date, tz: &TimeZone) -> bool {
        self.start_time.to_zoned(tz.clone()).date() == date
    }

    /// Whether the appointment overlaps the half-open interval `[start, end)`.
    #[must_use]
    pub fn overlaps(&self, start: Timestamp, end: Timestamp) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Re-project the display names from the joined records.
    ///
    /// Names whose record cannot be found keep their snapshot value.
    pub fn refresh_display_names(
        &mut self,
        staff: &[StaffMember],
        services: &[Service],
        clients: &[Client],
    ) {
        if let Some(member) = staff.iter().find(|member| member.id == self.staff_id) {
            self.staff_name.clone_from(&member.name);
        }

        if let Some(service) = services.iter().find(|service| service.id == self.service_id) {
            self.service_name.clone_from(&service.name);
        }

        if let Some(client) = clients.iter().find(|client| client.id == self.client_id) {
            self.client_name.clone_from(&client.name);
        }
    }
}

/// Reject ranges that do not move forward in time.
///
/// # Errors
///
/// Returns [`AppointmentError::InvalidTimeRange`] when `end <= start`.
pub fn validate_time_range(
    id: &AppointmentId,
    start: Timestamp,
    end: Timestamp,
) -> Result<(), AppointmentError> {
    if end > start {
        Ok(())
    } else {
        Err(AppointmentError::InvalidTimeRange {
            id: id.to_string(),
            start,
            end,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    pub(crate) fn appointment(id: &str, start: &str, end: &str, price: i64) -> Appointment {
        Appointment {
            id: AppointmentId::new(id),
            client_id: ClientId::new("client-1"),
            staff_id: StaffId::new("staff-1"),
            service_id: ServiceId::new("service-1"),
            client_name: "Ada Lovelace".to_string(),
            staff_name: "Grace".to_string(),
            service_name: "Cut & Style".to_string(),
            start_time: start.parse().expect("valid start instant"),
            end_time: end.parse().expect("valid end instant"),
            status: AppointmentStatus::Confirmed,
            price: Decimal::new(price, 0),
            notes: None,
        }
    }

    #[test]
    fn validate_accepts_forward_range() -> TestResult {
        let appt = appointment("a", "2026-02-14T09:00:00Z", "2026-02-14T10:00:00Z", 45);

        appt.validate()?;
        assert_eq!(appt.duration(), SignedDuration::from_mins(60));

        Ok(())
    }

    #[test]
    fn validate_rejects_zero_length() {
        let appt = appointment("a", "2026-02-14T09:00:00Z", "2026-02-14T09:00:00Z", 45);

        assert!(matches!(
            appt.validate(),
            Err(AppointmentError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_negative_price() {
        let appt = appointment("a", "2026-02-14T09:00:00Z", "2026-02-14T10:00:00Z", -1);

        assert_eq!(
            appt.validate(),
            Err(AppointmentError::NegativePrice("a".to_string()))
        );
    }

    #[test]
    fn occurs_on_uses_calendar_day_in_zone() -> TestResult {
        let appt = appointment("a", "2026-02-15T02:30:00Z", "2026-02-15T03:30:00Z", 45);
        let new_york = TimeZone::get("America/New_York")?;

        assert!(appt.occurs_on(date(2026, 2, 15), &TimeZone::UTC));
        assert!(appt.occurs_on(date(2026, 2, 14), &new_york));
        assert!(!appt.occurs_on(date(2026, 2, 15), &new_york));

        Ok(())
    }

    #[test]
    fn overlaps_is_half_open() -> TestResult {
        let appt = appointment("a", "2026-02-14T09:00:00Z", "2026-02-14T10:00:00Z", 45);

        assert!(appt.overlaps(
            "2026-02-14T09:30:00Z".parse()?,
            "2026-02-14T10:30:00Z".parse()?
        ));
        assert!(!appt.overlaps(
            "2026-02-14T10:00:00Z".parse()?,
            "2026-02-14T11:00:00Z".parse()?
        ));

        Ok(())
    }

    #[test]
    fn deserializes_iso_instants_from_camel_case_json() -> TestResult {
        let json = r#"{
            "id": "appt-9",
            "clientId": "c1",
            "staffId": "s1",
            "serviceId": "sv1",
            "clientName": "Ada",
            "staffName": "Grace",
            "serviceName": "Colour",
            "startTime": "2026-02-14T09:00:00Z",
            "endTime": "2026-02-14T10:30:00Z",
            "status": "checked-in",
            "price": "120.50"
        }"#;

        let appt: Appointment = serde_json::from_str(json)?;

        assert_eq!(appt.status, AppointmentStatus::CheckedIn);
        assert_eq!(appt.price, Decimal::new(12050, 2));
        assert_eq!(appt.duration(), SignedDuration::from_mins(90));
        assert!(appt.notes.is_none());

        Ok(())
    }

    #[test]
    fn refresh_display_names_uses_joined_records() {
        let mut appt = appointment("a", "2026-02-14T09:00:00Z", "2026-02-14T10:00:00Z", 45);
        let staff = [StaffMember::new(StaffId::new("staff-1"), "Grace Hopper")];

        appt.refresh_display_names(&staff, &[], &[]);

        assert_eq!(appt.staff_name, "Grace Hopper");
        assert_eq!(appt.service_name, "Cut & Style");
    }
}
