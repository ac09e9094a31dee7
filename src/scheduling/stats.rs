//! Day Statistics

use jiff::{civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::appointments::{Appointment, AppointmentStatus};

/// Which appointments count towards day revenue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RevenuePolicy {
    /// Every appointment on the day, whatever its status.
    #[default]
    AllStatuses,

    /// Skip cancelled and no-show appointments.
    ExcludeCancelled,
}

impl RevenuePolicy {
    /// Whether an appointment with `status` is counted.
    #[must_use]
    pub fn counts(self, status: AppointmentStatus) -> bool {
        match self {
            Self::AllStatuses => true,
            Self::ExcludeCancelled => !matches!(
                status,
                AppointmentStatus::Cancelled | AppointmentStatus::NoShow
            ),
        }
    }
}

/// Appointment count and booked revenue for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayStats {
    /// The day summarised
    pub date: Date,

    /// Number of appointments starting that day
    pub count: usize,

    /// Sum of their prices
    pub revenue: Money<'static, Currency>,
}

/// Summarise the appointments that start on `date` in `tz`.
pub fn day_stats<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    date: Date,
    tz: &TimeZone,
    currency: &'static Currency,
    policy: RevenuePolicy,
) -> DayStats {
    let (count, revenue) = appointments
        .into_iter()
        .filter(|appt| appt.occurs_on(date, tz) && policy.counts(appt.status))
        .fold((0, Decimal::ZERO), |(count, revenue), appt| {
            (count + 1, revenue.saturating_add(appt.price))
        });

    DayStats {
        date,
        count,
        revenue: Money::from_decimal(revenue, currency),
    }
}
