//! Scheduling
//!
//! The calendar's working state: the appointments in view, which view is active, the
//! selected date and filters, and status changes applied optimistically.
//!
//! A change is applied to the in-memory appointment before the data layer is asked to
//! persist it. If persisting fails the user is notified and the local change is kept;
//! reconciling with the data layer is done by calling [`SchedulingController::reload`] with
//! a fresh snapshot.

use jiff::{
    Timestamp,
    civil::{Date, Time},
    tz::TimeZone,
};
use rustc_hash::FxHashSet;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    appointments::{
        Appointment, AppointmentError, AppointmentId, AppointmentStatus, validate_time_range,
    },
    calendar::{self, CalendarError, CalendarView, DateRange, Direction},
    catalog::{Client, Service},
    loader::ScheduleSnapshot,
    mutations::{AppointmentMutations, MutationError, Reschedule},
    notifications::{Notification, Notifier},
    staff::{StaffFilter, StaffId, StaffMember, filter_by_staff},
};

pub mod stats;

pub use stats::{DayStats, RevenuePolicy, day_stats};

/// Errors from the scheduling controller.
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// Date arithmetic failed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// A record broke its invariants.
    #[error(transparent)]
    InvalidAppointment(#[from] AppointmentError),

    /// No appointment with this id is loaded.
    #[error("appointment {0} not found")]
    NotFound(AppointmentId),

    /// The status machine does not allow this move.
    #[error("appointment {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Appointment
        id: AppointmentId,
        /// Current status
        from: AppointmentStatus,
        /// Requested status
        to: AppointmentStatus,
    },

    /// Finished appointments cannot be moved.
    #[error("appointment {id} is {status} and cannot be rescheduled")]
    Terminal {
        /// Appointment
        id: AppointmentId,
        /// Its terminal status
        status: AppointmentStatus,
    },

    /// The staff member is unknown or inactive.
    #[error("staff member {0} is not available for booking")]
    UnknownStaff(StaffId),

    /// A change for this appointment is still awaiting the data layer.
    #[error("a change to appointment {0} is already in flight")]
    RequestInFlight(AppointmentId),

    /// Hour or minute out of range.
    #[error("invalid slot time {hour}:{minute:02}")]
    InvalidSlot {
        /// Requested hour
        hour: u8,
        /// Requested minute
        minute: u8,
    },
}

/// The appointment statuses to show; empty means every status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFilter(FxHashSet<AppointmentStatus>);

impl StatusFilter {
    /// A filter that admits every status.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Whether the filter is the "no filter" empty set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `status` passes.
    #[must_use]
    pub fn admits(&self, status: AppointmentStatus) -> bool {
        self.0.is_empty() || self.0.contains(&status)
    }

    /// Add or remove `status`, returning whether it is now selected.
    pub fn toggle(&mut self, status: AppointmentStatus) -> bool {
        if self.0.remove(&status) {
            false
        } else {
            self.0.insert(status);
            true
        }
    }
}

impl FromIterator<AppointmentStatus> for StatusFilter {
    fn from_iter<I: IntoIterator<Item = AppointmentStatus>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An empty time slot the user clicked, to seed the booking flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSelection {
    /// Column the slot belongs to
    pub staff_id: StaffId,

    /// Day of the slot
    pub date: Date,

    /// Wall-clock start of the slot
    pub time: Time,
}

impl SlotSelection {
    /// The slot's start as an instant in `tz`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Arithmetic`] if the wall-clock time cannot be resolved.
    pub fn start(&self, tz: &TimeZone) -> Result<Timestamp, CalendarError> {
        Ok(self.date.to_datetime(self.time).to_zoned(tz.clone())?.timestamp())
    }
}

/// What a pending change will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// A status transition.
    Status(AppointmentStatus),

    /// A move in time and/or staff.
    Reschedule(Reschedule),
}

/// A change applied locally and awaiting the data layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending change must be finished to release its in-flight guard"]
pub struct PendingChange {
    /// Appointment changed
    pub id: AppointmentId,

    /// The change
    pub kind: ChangeKind,

    /// Status before the change
    pub previous_status: AppointmentStatus,
}

/// Result of a change once the data layer has answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The data layer accepted the change.
    Persisted,

    /// The data layer refused; the local change is still applied.
    Failed(MutationError),
}

/// The calendar's state controller.
#[derive(Debug)]
pub struct SchedulingController {
    appointments: Vec<Appointment>,
    staff: Vec<StaffMember>,
    services: Vec<Service>,
    clients: Vec<Client>,
    selected_date: Date,
    view: CalendarView,
    time_zone: TimeZone,
    currency: &'static Currency,
    status_filter: StatusFilter,
    staff_filter: StaffFilter,
    revenue_policy: RevenuePolicy,
    in_flight: FxHashSet<AppointmentId>,
    last_slot: Option<SlotSelection>,
}

impl SchedulingController {
    /// Build a controller from a loaded snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidAppointment`] if any appointment is invalid.
    pub fn from_snapshot(
        snapshot: ScheduleSnapshot,
        selected_date: Date,
        time_zone: TimeZone,
        currency: &'static Currency,
    ) -> Result<Self, SchedulingError> {
        snapshot.validate()?;

        Ok(Self {
            appointments: snapshot.appointments,
            staff: snapshot.staff,
            services: snapshot.services,
            clients: snapshot.clients,
            selected_date,
            view: CalendarView::default(),
            time_zone,
            currency,
            status_filter: StatusFilter::any(),
            staff_filter: StaffFilter::All,
            revenue_policy: RevenuePolicy::default(),
            in_flight: FxHashSet::default(),
            last_slot: None,
        })
    }

    /// Use a different revenue policy for day statistics.
    #[must_use]
    pub fn with_revenue_policy(mut self, policy: RevenuePolicy) -> Self {
        self.revenue_policy = policy;
        self
    }

    /// Replace the loaded records with a fresh snapshot, keeping view state.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidAppointment`] if any appointment is invalid; the
    /// current records are left untouched in that case.
    pub fn reload(&mut self, snapshot: ScheduleSnapshot) -> Result<(), SchedulingError> {
        snapshot.validate()?;

        self.appointments = snapshot.appointments;
        self.staff = snapshot.staff;
        self.services = snapshot.services;
        self.clients = snapshot.clients;

        debug!(
            appointments = self.appointments.len(),
            "reloaded schedule snapshot"
        );

        Ok(())
    }

    /// All loaded appointments.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Look up an appointment.
    pub fn appointment(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|appt| &appt.id == id)
    }

    /// All loaded staff, including inactive members.
    pub fn staff(&self) -> &[StaffMember] {
        &self.staff
    }

    /// The service menu.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Known clients.
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Active view.
    pub fn view(&self) -> CalendarView {
        self.view
    }

    /// Switch view. Nothing else changes.
    pub fn set_view(&mut self, view: CalendarView) {
        self.view = view;
    }

    /// Selected date.
    pub fn selected_date(&self) -> Date {
        self.selected_date
    }

    /// Jump to a date.
    pub fn go_to(&mut self, date: Date) {
        self.selected_date = date;
    }

    /// Jump to today in the business time zone.
    pub fn go_to_today(&mut self) {
        self.selected_date = calendar::today(&self.time_zone);
    }

    /// Business time zone.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// Business currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Move the selected date one step of the active view.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::Calendar`] if the move leaves the supported date range.
    pub fn navigate(&mut self, direction: Direction) -> Result<Date, SchedulingError> {
        self.selected_date = calendar::navigate(self.selected_date, self.view, direction)?;

        Ok(self.selected_date)
    }

    /// Days shown by the active view.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::Calendar`] if the range leaves the supported date range.
    pub fn visible_range(&self) -> Result<DateRange, SchedulingError> {
        Ok(calendar::visible_range(self.selected_date, self.view)?)
    }

    /// Appointments whose status is in `statuses`; an empty filter returns everything.
    pub fn filter_by_status(&self, statuses: &StatusFilter) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|appt| statuses.admits(appt.status))
            .collect()
    }

    /// Active staff columns for `filter`.
    pub fn filter_by_staff(&self, filter: &StaffFilter) -> Vec<&StaffMember> {
        filter_by_staff(&self.staff, filter)
    }

    /// Active status filter.
    pub fn status_filter(&self) -> &StatusFilter {
        &self.status_filter
    }

    /// Replace the status filter.
    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    /// Active staff filter.
    pub fn staff_filter(&self) -> &StaffFilter {
        &self.staff_filter
    }

    /// Replace the staff filter.
    pub fn set_staff_filter(&mut self, filter: StaffFilter) {
        self.staff_filter = filter;
    }

    /// Staff columns under the active staff filter.
    pub fn visible_staff(&self) -> Vec<&StaffMember> {
        self.filter_by_staff(&self.staff_filter)
    }

    /// Appointments in the visible range passing both filters, ordered by start.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::Calendar`] if the visible range cannot be computed.
    pub fn visible_appointments(&self) -> Result<Vec<&Appointment>, SchedulingError> {
        let range = self.visible_range()?;
        let columns: FxHashSet<&StaffId> =
            self.visible_staff().into_iter().map(|member| &member.id).collect();

        let mut visible: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|appt| self.status_filter.admits(appt.status))
            .filter(|appt| columns.contains(&appt.staff_id))
            .filter(|appt| range.contains(appt.start_time.to_zoned(self.time_zone.clone()).date()))
            .collect();

        visible.sort_by_key(|appt| appt.start_time);

        Ok(visible)
    }

    /// One staff member's appointments on a day, ordered by start.
    pub fn appointments_for_staff_on(&self, staff_id: &StaffId, date: Date) -> Vec<&Appointment> {
        let mut day: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|appt| &appt.staff_id == staff_id && appt.occurs_on(date, &self.time_zone))
            .collect();

        day.sort_by_key(|appt| appt.start_time);

        day
    }

    /// Count and revenue of appointments starting on `date`.
    pub fn compute_day_stats(&self, date: Date) -> DayStats {
        day_stats(
            &self.appointments,
            date,
            &self.time_zone,
            self.currency,
            self.revenue_policy,
        )
    }

    /// Capture an empty-slot click for the booking flow.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidSlot`] if `hour >= 24` or `minute >= 60`.
    pub fn empty_slot_click(
        &mut self,
        staff_id: StaffId,
        date: Date,
        hour: u8,
        minute: u8,
    ) -> Result<SlotSelection, SchedulingError> {
        let invalid = || SchedulingError::InvalidSlot { hour, minute };

        let h = i8::try_from(hour).map_err(|_err| invalid())?;
        let m = i8::try_from(minute).map_err(|_err| invalid())?;
        let time = Time::new(h, m, 0, 0).map_err(|_err| invalid())?;

        let selection = SlotSelection {
            staff_id,
            date,
            time,
        };

        self.last_slot = Some(selection.clone());

        Ok(selection)
    }

    /// The most recent empty-slot click.
    pub fn last_slot(&self) -> Option<&SlotSelection> {
        self.last_slot.as_ref()
    }

    /// Whether a change for `id` is awaiting the data layer.
    pub fn is_in_flight(&self, id: &AppointmentId) -> bool {
        self.in_flight.contains(id)
    }

    /// Apply a status change locally and mark the appointment in flight.
    ///
    /// # Errors
    ///
    /// - [`SchedulingError::RequestInFlight`] if a change for `id` is already pending.
    /// - [`SchedulingError::NotFound`] if `id` is not loaded.
    /// - [`SchedulingError::InvalidTransition`] if the status machine forbids the move.
    pub fn begin_status_change(
        &mut self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<PendingChange, SchedulingError> {
        self.guard_in_flight(id)?;

        let appt = self.appointment_mut(id)?;
        let previous_status = appt.status;

        if !previous_status.can_transition_to(status) {
            return Err(SchedulingError::InvalidTransition {
                id: id.clone(),
                from: previous_status,
                to: status,
            });
        }

        appt.status = status;

        debug!(%id, from = %previous_status, to = %status, "applied optimistic status change");

        self.in_flight.insert(id.clone());

        Ok(PendingChange {
            id: id.clone(),
            kind: ChangeKind::Status(status),
            previous_status,
        })
    }

    /// Apply a reschedule locally and mark the appointment in flight.
    ///
    /// A pending appointment becomes confirmed; later statuses are kept.
    ///
    /// # Errors
    ///
    /// - [`SchedulingError::RequestInFlight`] if a change for `id` is already pending.
    /// - [`SchedulingError::InvalidAppointment`] if the new end is not after the new start.
    /// - [`SchedulingError::UnknownStaff`] if the staff member is unknown or inactive.
    /// - [`SchedulingError::NotFound`] if `id` is not loaded.
    /// - [`SchedulingError::Terminal`] if the appointment is completed, cancelled or a no-show.
    pub fn begin_reschedule(
        &mut self,
        id: &AppointmentId,
        reschedule: Reschedule,
    ) -> Result<PendingChange, SchedulingError> {
        self.guard_in_flight(id)?;

        validate_time_range(id, reschedule.start_time, reschedule.end_time)?;

        let staff_name = self
            .staff
            .iter()
            .find(|member| member.active && member.id == reschedule.staff_id)
            .map(|member| member.name.clone())
            .ok_or_else(|| SchedulingError::UnknownStaff(reschedule.staff_id.clone()))?;

        let appt = self.appointment_mut(id)?;
        let previous_status = appt.status;

        if previous_status.is_terminal() {
            return Err(SchedulingError::Terminal {
                id: id.clone(),
                status: previous_status,
            });
        }

        appt.start_time = reschedule.start_time;
        appt.end_time = reschedule.end_time;
        appt.staff_id = reschedule.staff_id.clone();
        appt.staff_name = staff_name;

        if previous_status == AppointmentStatus::Pending {
            appt.status = AppointmentStatus::Confirmed;
        }

        debug!(%id, start = %reschedule.start_time, "applied optimistic reschedule");

        self.in_flight.insert(id.clone());

        Ok(PendingChange {
            id: id.clone(),
            kind: ChangeKind::Reschedule(reschedule),
            previous_status,
        })
    }

    /// Settle a pending change with the data layer's answer.
    ///
    /// Releases the in-flight guard and notifies the user. A failure does not revert the
    /// local change.
    pub fn finish_change(
        &mut self,
        pending: PendingChange,
        result: Result<(), MutationError>,
        notifier: &dyn Notifier,
    ) -> ChangeOutcome {
        self.in_flight.remove(&pending.id);

        match result {
            Ok(()) => {
                notifier.notify(Notification::success(success_message(&pending.kind)));

                ChangeOutcome::Persisted
            }
            Err(error) => {
                warn!(
                    id = %pending.id,
                    %error,
                    "mutation failed; keeping optimistic change"
                );

                notifier.notify(Notification::error(format!(
                    "Failed to update appointment: {error}"
                )));

                ChangeOutcome::Failed(error)
            }
        }
    }

    /// Change an appointment's status and persist it.
    ///
    /// # Errors
    ///
    /// Fails without contacting the data layer for the reasons listed on
    /// [`Self::begin_status_change`]. Data-layer failures are reported through the returned
    /// [`ChangeOutcome`] instead.
    pub async fn change_status(
        &mut self,
        id: &AppointmentId,
        status: AppointmentStatus,
        mutations: &dyn AppointmentMutations,
        notifier: &dyn Notifier,
    ) -> Result<ChangeOutcome, SchedulingError> {
        let pending = self.begin_status_change(id, status)?;
        let result = mutations.change_status(id, status).await;

        Ok(self.finish_change(pending, result, notifier))
    }

    /// Move an appointment and persist it.
    ///
    /// # Errors
    ///
    /// Fails without contacting the data layer for the reasons listed on
    /// [`Self::begin_reschedule`]. Data-layer failures are reported through the returned
    /// [`ChangeOutcome`] instead.
    pub async fn reschedule(
        &mut self,
        id: &AppointmentId,
        reschedule: Reschedule,
        mutations: &dyn AppointmentMutations,
        notifier: &dyn Notifier,
    ) -> Result<ChangeOutcome, SchedulingError> {
        let pending = self.begin_reschedule(id, reschedule.clone())?;
        let result = mutations.reschedule(id, &reschedule).await;

        Ok(self.finish_change(pending, result, notifier))
    }

    fn guard_in_flight(&self, id: &AppointmentId) -> Result<(), SchedulingError> {
        if self.in_flight.contains(id) {
            warn!(%id, "ignoring change while another is in flight");

            return Err(SchedulingError::RequestInFlight(id.clone()));
        }

        Ok(())
    }

    fn appointment_mut(&mut self, id: &AppointmentId) -> Result<&mut Appointment, SchedulingError> {
        self.appointments
            .iter_mut()
            .find(|appt| &appt.id == id)
            .ok_or_else(|| SchedulingError::NotFound(id.clone()))
    }
}

fn success_message(kind: &ChangeKind) -> String {
    match kind {
        ChangeKind::Status(status) => format!("Appointment marked {status}"),
        ChangeKind::Reschedule(_) => "Appointment rescheduled".to_string(),
    }
}
