//! Calendar
//!
//! View modes and the date arithmetic behind calendar navigation. Month moves use
//! calendar-aware arithmetic: moving from the 31st into a shorter month lands on that
//! month's last day, so a forward-then-backward month move is not always an identity.

use std::{fmt, str::FromStr};

use jiff::{Span, Timestamp, ToSpan, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from calendar arithmetic.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// The move left the representable date range.
    #[error(transparent)]
    Arithmetic(#[from] jiff::Error),
}

/// Calendar view mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarView {
    /// A single day, one column per staff member.
    Day,

    /// Three consecutive days.
    #[serde(rename = "3-day")]
    ThreeDay,

    /// A Sunday-start week.
    #[default]
    Week,

    /// A whole month grid.
    Month,
}

impl CalendarView {
    /// The distance one navigation step covers.
    #[must_use]
    pub fn step(self) -> Span {
        match self {
            Self::Day => 1.day(),
            Self::ThreeDay => 3.days(),
            Self::Week => 7.days(),
            Self::Month => 1.month(),
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::ThreeDay => "3-day",
            Self::Week => "week",
            Self::Month => "month",
        })
    }
}

/// A view name that is not `day`, `3-day`, `week` or `month`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown calendar view: {0}")]
pub struct UnknownView(String);

impl FromStr for CalendarView {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "3-day" => Ok(Self::ThreeDay),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(UnknownView(other.to_string())),
        }
    }
}

/// Navigation direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards earlier dates.
    Backward,

    /// Towards later dates.
    Forward,
}

/// Move `date` one step in `direction` for the given view.
///
/// # Errors
///
/// Returns [`CalendarError::Arithmetic`] if the result falls outside the supported range.
pub fn navigate(date: Date, view: CalendarView, direction: Direction) -> Result<Date, CalendarError> {
    let step = view.step();

    let moved = match direction {
        Direction::Forward => date.checked_add(step)?,
        Direction::Backward => date.checked_sub(step)?,
    };

    Ok(moved)
}

/// An inclusive range of calendar days.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Create a range; the bounds are swapped if given backwards.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// First day in the range.
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Last day in the range.
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Whether `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = Date> + '_ {
        self.start
            .series(1.day())
            .take_while(move |day| *day <= self.end)
    }
}

/// The days a view shows when `date` is selected.
///
/// # Errors
///
/// Returns [`CalendarError::Arithmetic`] if the range would leave the supported dates.
pub fn visible_range(date: Date, view: CalendarView) -> Result<DateRange, CalendarError> {
    let range = match view {
        CalendarView::Day => DateRange::new(date, date),
        CalendarView::ThreeDay => DateRange::new(date, date.checked_add(2.days())?),
        CalendarView::Week => {
            let offset = i64::from(date.weekday().to_sunday_zero_offset());
            let start = date.checked_sub(offset.days())?;

            DateRange::new(start, start.checked_add(6.days())?)
        }
        CalendarView::Month => DateRange::new(date.first_of_month(), date.last_of_month()),
    };

    Ok(range)
}

/// Today's date in `tz`.
#[must_use]
pub fn today(tz: &TimeZone) -> Date {
    Timestamp::now().to_zoned(tz.clone()).date()
}
