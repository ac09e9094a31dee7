//! Salon prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    appointments::{Appointment, AppointmentAction, AppointmentId, AppointmentStatus},
    availability::{WorkingHours, available_slots},
    calendar::{CalendarView, DateRange, Direction},
    catalog::{Client, ClientId, Product, ProductId, Service, ServiceId},
    checkout::{
        CartAction, CartLineItem, CartState, CartTotals, CheckoutRequest, Discount,
        DiscountType, LineItemId, LineKind, PaymentMethod, SelectedClient, reduce, totals,
    },
    loader::{LoadScope, ScheduleLoader, ScheduleSnapshot},
    loyalty::LoyaltyTier,
    mutations::{AppointmentMutations, MutationError, MutationResponse, Reschedule},
    notifications::{Notification, NotificationLevel, Notifier},
    preferences::{CalendarPreferences, ColorMode, PreferenceStore, Preferences},
    scheduling::{
        ChangeOutcome, DayStats, RevenuePolicy, SchedulingController, SchedulingError,
        SlotSelection, StatusFilter,
    },
    staff::{StaffFilter, StaffId, StaffMember},
    waitlist::{WaitlistEntry, WaitlistFilter, WaitlistStatus, filter_waitlist},
};
