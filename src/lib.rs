//! Salon
//!
//! Salon is the scheduling and checkout core of a salon front desk: a calendar controller
//! with optimistic appointment status changes, and a point-of-sale cart reducer.

pub mod appointments;
pub mod availability;
pub mod calendar;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod ids;
pub mod loader;
pub mod loyalty;
pub mod mutations;
pub mod notifications;
pub mod observability;
pub mod preferences;
pub mod prelude;
pub mod report;
pub mod scheduling;
pub mod staff;
pub mod waitlist;
