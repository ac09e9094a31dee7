//! Appointment Status
//!
//! The lifecycle an appointment moves through. The happy path is a forward-only chain
//! (`pending → confirmed → checked-in → in-progress → completed`); `no-show` and
//! `cancelled` branch off from any state that is not already terminal.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Appointment status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    /// Booked, awaiting confirmation.
    Pending,

    /// Confirmed with the client.
    Confirmed,

    /// Client has arrived.
    CheckedIn,

    /// Service underway.
    InProgress,

    /// Service finished.
    Completed,

    /// Client never arrived.
    NoShow,

    /// Appointment called off.
    Cancelled,
}

/// Every status, in display order.
pub const ALL_STATUSES: [AppointmentStatus; 7] = [
    AppointmentStatus::Pending,
    AppointmentStatus::Confirmed,
    AppointmentStatus::CheckedIn,
    AppointmentStatus::InProgress,
    AppointmentStatus::Completed,
    AppointmentStatus::NoShow,
    AppointmentStatus::Cancelled,
];

/// Returned when a status string is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown appointment status: {0}")]
pub struct UnknownStatus(pub String);

impl AppointmentStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked-in",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::NoShow => "no-show",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::NoShow | Self::Cancelled)
    }

    /// Position along the happy-path chain, `None` for the side branches.
    const fn chain_position(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::CheckedIn => Some(2),
            Self::InProgress => Some(3),
            Self::Completed => Some(4),
            Self::NoShow | Self::Cancelled => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Chain moves may skip ahead but never go backwards; staying put is not a transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() || self == next {
            return false;
        }

        match (self.chain_position(), next.chain_position()) {
            (Some(from), Some(to)) => to > from,
            (_, None) => true,
            (None, Some(_)) => false,
        }
    }

    /// Actions a user may take from this status.
    #[must_use]
    pub fn available_actions(self) -> SmallVec<[AppointmentAction; 6]> {
        ALL_ACTIONS
            .into_iter()
            .filter(|action| self.can_transition_to(action.target()))
            .collect()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATUSES
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A discrete, user-triggered status action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentAction {
    /// Pending → confirmed.
    Confirm,

    /// Client arrived.
    CheckIn,

    /// Service begins.
    StartService,

    /// Service finished.
    Complete,

    /// Client never arrived.
    MarkNoShow,

    /// Call the appointment off.
    Cancel,
}

const ALL_ACTIONS: [AppointmentAction; 6] = [
    AppointmentAction::Confirm,
    AppointmentAction::CheckIn,
    AppointmentAction::StartService,
    AppointmentAction::Complete,
    AppointmentAction::MarkNoShow,
    AppointmentAction::Cancel,
];

impl AppointmentAction {
    /// The status this action moves an appointment into.
    #[must_use]
    pub const fn target(self) -> AppointmentStatus {
        match self {
            Self::Confirm => AppointmentStatus::Confirmed,
            Self::CheckIn => AppointmentStatus::CheckedIn,
            Self::StartService => AppointmentStatus::InProgress,
            Self::Complete => AppointmentStatus::Completed,
            Self::MarkNoShow => AppointmentStatus::NoShow,
            Self::Cancel => AppointmentStatus::Cancelled,
        }
    }

    /// Button label for the action.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirm => "Confirm",
            Self::CheckIn => "Check In",
            Self::StartService => "Start Service",
            Self::Complete => "Complete",
            Self::MarkNoShow => "Mark No-Show",
            Self::Cancel => "Cancel",
        }
    }
}
