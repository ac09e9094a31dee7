//! Reports
//!
//! Plain-text tables for the command line.

use std::{io, ops::Range};

use jiff::{
    civil::{Date, Time},
    tz::TimeZone,
};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    appointments::Appointment,
    checkout::{CartState, DiscountType, TotalsError, minor_units, totals},
    scheduling::DayStats,
};

/// Errors writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Output could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    /// Cart totals could not be computed.
    #[error(transparent)]
    Totals(#[from] TotalsError),
}

/// Write a table of appointments, one row each.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if writing fails.
pub fn write_agenda(
    out: &mut impl io::Write,
    appointments: &[&Appointment],
    tz: &TimeZone,
) -> Result<(), ReportError> {
    if appointments.is_empty() {
        writeln!(out, "No appointments.")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["When", "Staff", "Client", "Service", "Status", "Price"]);

    for appt in appointments {
        let start = appt.start_time.to_zoned(tz.clone());
        let end = appt.end_time.to_zoned(tz.clone());

        builder.push_record([
            format!(
                "{} {}-{}",
                start.date(),
                start.time().strftime("%H:%M"),
                end.time().strftime("%H:%M")
            ),
            appt.staff_name.clone(),
            appt.client_name.clone(),
            appt.service_name.clone(),
            appt.status.to_string(),
            appt.price.to_string(),
        ]);
    }

    write_table(out, builder, 5..6)
}

/// Write a day's count and revenue.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if writing fails.
pub fn write_day_stats(out: &mut impl io::Write, stats: &DayStats) -> Result<(), ReportError> {
    writeln!(out, " Date:         {}", stats.date)?;
    writeln!(out, " Appointments: {}", stats.count)?;
    writeln!(out, " Revenue:      {}", stats.revenue)?;

    Ok(())
}

/// Write open start times for one staff member's day.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if writing fails.
pub fn write_slots(
    out: &mut impl io::Write,
    staff_name: &str,
    date: Date,
    slots: &[Time],
) -> Result<(), ReportError> {
    writeln!(out, " {staff_name} on {date}:")?;

    if slots.is_empty() {
        writeln!(out, " fully booked")?;

        return Ok(());
    }

    let times: Vec<String> = slots
        .iter()
        .map(|slot| slot.strftime("%H:%M").to_string())
        .collect();

    writeln!(out, " {}", times.join("  "))?;

    Ok(())
}

/// Write the cart lines followed by its totals.
///
/// # Errors
///
/// Returns [`ReportError::Totals`] if totals cannot be computed and [`ReportError::Io`] if
/// writing fails.
pub fn write_receipt(out: &mut impl io::Write, state: &CartState) -> Result<(), ReportError> {
    let totals = totals(state)?;
    let mut builder = Builder::default();

    builder.push_record(["#", "Item", "Qty", "Unit", "Amount"]);

    for (idx, line) in state.lines().iter().enumerate() {
        let amount = Money::from_minor(
            minor_units(&line.unit_price)?
                .checked_mul(i64::from(line.quantity))
                .ok_or(TotalsError::Overflow)?,
            line.unit_price.currency(),
        );

        builder.push_record([
            format!("#{:<3}", idx + 1),
            line.name.clone(),
            line.quantity.to_string(),
            format!("{}", line.unit_price),
            format!("{amount}"),
        ]);
    }

    write_table(out, builder, 2..5)?;

    let discount = state.discount();
    let discount_label = match discount.kind {
        DiscountType::Percentage if !discount.is_zero() => format!("Discount ({}%):", discount.value),
        _ => "Discount:".to_string(),
    };

    write_summary_line(out, "Subtotal:", totals.subtotal)?;
    write_summary_line(out, &discount_label, totals.discount)?;
    write_summary_line(out, "Tip:", totals.tip)?;
    write_summary_line(out, "Total:", totals.total)?;
    writeln!(out, " {:<16}{}", "Payment:", state.payment_method())?;

    Ok(())
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: Money<'static, Currency>,
) -> Result<(), ReportError> {
    writeln!(out, " {label:<16}{:>12}", value.to_string())?;

    Ok(())
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: Range<usize>,
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(right_aligned), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}
