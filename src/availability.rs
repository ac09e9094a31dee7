//! Availability
//!
//! Open start times for a service in one staff member's day.

use jiff::{
    SignedDuration, Timestamp,
    civil::{Date, Time, time},
    tz::TimeZone,
};
use thiserror::Error;

use crate::{
    appointments::{Appointment, AppointmentStatus},
    staff::StaffId,
};

/// Errors computing availability.
#[derive(Debug, Error)]
pub enum AvailabilityError {
    /// Candidates must advance.
    #[error("slot step must be positive, got {0}")]
    NonPositiveStep(SignedDuration),

    /// A service must take some time.
    #[error("service duration must be positive, got {0}")]
    NonPositiveDuration(SignedDuration),

    /// A wall-clock time could not be resolved in the time zone.
    #[error(transparent)]
    Arithmetic(#[from] jiff::Error),
}

/// Opening hours for a day.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkingHours {
    /// Opening time
    pub start: Time,

    /// Closing time; the last service must end by then
    pub end: Time,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: time(9, 0, 0, 0),
            end: time(18, 0, 0, 0),
        }
    }
}

/// Whether an appointment still occupies its slot.
fn blocks_time(status: AppointmentStatus) -> bool {
    !matches!(
        status,
        AppointmentStatus::Cancelled | AppointmentStatus::NoShow
    )
}

/// Start times on `date` at which a service of `service_duration` fits in `staff_id`'s
/// book without overlapping an appointment that still holds its slot.
///
/// Candidates start at `hours.start` and advance by `step`.
///
/// # Errors
///
/// Returns [`AvailabilityError::NonPositiveStep`] for a zero or negative step,
/// [`AvailabilityError::NonPositiveDuration`] for a zero or negative service duration and
/// [`AvailabilityError::Arithmetic`] if the day's times cannot be resolved in `tz`.
pub fn available_slots<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    staff_id: &StaffId,
    date: Date,
    tz: &TimeZone,
    hours: WorkingHours,
    service_duration: SignedDuration,
    step: SignedDuration,
) -> Result<Vec<Time>, AvailabilityError> {
    if !step.is_positive() {
        return Err(AvailabilityError::NonPositiveStep(step));
    }

    if !service_duration.is_positive() {
        return Err(AvailabilityError::NonPositiveDuration(service_duration));
    }

    let open = instant(date, hours.start, tz)?;
    let close = instant(date, hours.end, tz)?;

    let busy: Vec<&Appointment> = appointments
        .into_iter()
        .filter(|appt| &appt.staff_id == staff_id && blocks_time(appt.status))
        .filter(|appt| appt.overlaps(open, close))
        .collect();

    let mut slots = Vec::new();
    let mut cursor = open;

    loop {
        let end = cursor.checked_add(service_duration)?;

        if end > close {
            break;
        }

        if !busy.iter().any(|appt| appt.overlaps(cursor, end)) {
            slots.push(cursor.to_zoned(tz.clone()).time());
        }

        cursor = cursor.checked_add(step)?;
    }

    Ok(slots)
}

fn instant(date: Date, at: Time, tz: &TimeZone) -> Result<Timestamp, jiff::Error> {
    Ok(date.to_datetime(at).to_zoned(tz.clone())?.timestamp())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::appointments::tests::appointment;

    use super::*;

    fn hours(open: i8, close: i8) -> WorkingHours {
        WorkingHours {
            start: time(open, 0, 0, 0),
            end: time(close, 0, 0, 0),
        }
    }

    #[test]
    fn empty_day_offers_every_step() -> TestResult {
        let slots = available_slots(
            &[],
            &StaffId::new("staff-1"),
            date(2026, 2, 14),
            &TimeZone::UTC,
            hours(9, 11),
            SignedDuration::from_mins(60),
            SignedDuration::from_mins(30),
        )?;

        assert_eq!(
            slots,
            vec![time(9, 0, 0, 0), time(9, 30, 0, 0), time(10, 0, 0, 0)]
        );

        Ok(())
    }

    #[test]
    fn booked_time_is_skipped() -> TestResult {
        let booked = vec![appointment(
            "a1",
            "2026-02-14T10:00:00Z",
            "2026-02-14T11:00:00Z",
            45,
        )];

        let slots = available_slots(
            &booked,
            &StaffId::new("staff-1"),
            date(2026, 2, 14),
            &TimeZone::UTC,
            hours(9, 12),
            SignedDuration::from_mins(60),
            SignedDuration::from_mins(60),
        )?;

        assert_eq!(slots, vec![time(9, 0, 0, 0), time(11, 0, 0, 0)]);

        Ok(())
    }

    #[test]
    fn cancelled_and_other_staff_do_not_block() -> TestResult {
        let mut cancelled = appointment("a1", "2026-02-14T09:00:00Z", "2026-02-14T10:00:00Z", 45);
        cancelled.status = AppointmentStatus::Cancelled;

        let mut elsewhere = appointment("a2", "2026-02-14T09:00:00Z", "2026-02-14T10:00:00Z", 45);
        elsewhere.staff_id = StaffId::new("staff-2");

        let slots = available_slots(
            &[cancelled, elsewhere],
            &StaffId::new("staff-1"),
            date(2026, 2, 14),
            &TimeZone::UTC,
            hours(9, 10),
            SignedDuration::from_mins(60),
            SignedDuration::from_mins(15),
        )?;

        assert_eq!(slots, vec![time(9, 0, 0, 0)]);

        Ok(())
    }

    #[test]
    fn slots_follow_local_time_zone() -> TestResult {
        let tz = TimeZone::get("America/New_York")?;
        // 14:00 UTC is 09:00 in New York in February.
        let booked = vec![appointment(
            "a1",
            "2026-02-14T14:00:00Z",
            "2026-02-14T15:00:00Z",
            45,
        )];

        let slots = available_slots(
            &booked,
            &StaffId::new("staff-1"),
            date(2026, 2, 14),
            &tz,
            hours(9, 11),
            SignedDuration::from_mins(60),
            SignedDuration::from_mins(60),
        )?;

        assert_eq!(slots, vec![time(10, 0, 0, 0)]);

        Ok(())
    }

    #[test]
    fn zero_step_is_rejected() {
        let result = available_slots(
            &[],
            &StaffId::new("staff-1"),
            date(2026, 2, 14),
            &TimeZone::UTC,
            WorkingHours::default(),
            SignedDuration::from_mins(60),
            SignedDuration::ZERO,
        );

        assert!(matches!(result, Err(AvailabilityError::NonPositiveStep(_))));
    }

    #[test]
    fn empty_or_negative_service_is_rejected() {
        for duration in [SignedDuration::ZERO, SignedDuration::from_mins(-30)] {
            let result = available_slots(
                &[],
                &StaffId::new("staff-1"),
                date(2026, 2, 14),
                &TimeZone::UTC,
                WorkingHours::default(),
                duration,
                SignedDuration::from_mins(15),
            );

            assert!(matches!(
                result,
                Err(AvailabilityError::NonPositiveDuration(rejected)) if rejected == duration
            ));
        }
    }
}
