//! Staff

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Staff Id
pub type StaffId = TypedId<StaffMember>;

/// Sentinel accepted by [`StaffFilter::from_str`] for "every staff member".
pub const ALL_STAFF: &str = "all";

/// A member of staff who can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    /// Staff id
    pub id: StaffId,

    /// Display name
    pub name: String,

    /// Inactive staff are hidden from the calendar and never selectable.
    #[serde(default = "default_active")]
    pub active: bool,

    /// Calendar colour used when colour-coding by staff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

const fn default_active() -> bool {
    true
}

impl StaffMember {
    /// Create an active staff member.
    pub fn new(id: StaffId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            color: None,
        }
    }

    /// Mark the staff member inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Which staff columns the calendar shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StaffFilter {
    /// Every active staff member.
    #[default]
    All,

    /// A single staff member.
    Only(StaffId),
}

impl StaffFilter {
    /// Whether the given staff id passes the filter.
    #[must_use]
    pub fn admits(&self, staff_id: &StaffId) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => id == staff_id,
        }
    }
}

impl FromStr for StaffFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL_STAFF {
            Self::All
        } else {
            Self::Only(StaffId::new(s))
        })
    }
}

impl fmt::Display for StaffFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_STAFF),
            Self::Only(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// Active staff members, in their original order.
pub fn active_staff(staff: &[StaffMember]) -> impl Iterator<Item = &StaffMember> {
    staff.iter().filter(|member| member.active)
}

/// Staff columns to display for a filter.
///
/// [`StaffFilter::All`] yields every active member; [`StaffFilter::Only`] yields the single
/// matching active member, or nothing if that member is unknown or inactive.
pub fn filter_by_staff<'a>(staff: &'a [StaffMember], filter: &StaffFilter) -> Vec<&'a StaffMember> {
    active_staff(staff)
        .filter(|member| filter.admits(&member.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> Vec<StaffMember> {
        vec![
            StaffMember::new(StaffId::new("s1"), "Grace"),
            StaffMember::new(StaffId::new("s2"), "Ada"),
            StaffMember::new(StaffId::new("s3"), "Linus").inactive(),
        ]
    }

    #[test]
    fn all_sentinel_returns_active_staff() {
        let staff = team();
        let filter: StaffFilter = ALL_STAFF.parse().unwrap_or_default();

        let names: Vec<&str> = filter_by_staff(&staff, &filter)
            .into_iter()
            .map(|member| member.name.as_str())
            .collect();

        assert_eq!(filter, StaffFilter::All);
        assert_eq!(names, vec!["Grace", "Ada"]);
    }

    #[test]
    fn single_id_returns_one_member() {
        let staff = team();

        let result = filter_by_staff(&staff, &StaffFilter::Only(StaffId::new("s2")));

        assert_eq!(result.len(), 1);
        assert_eq!(result.first().map(|member| member.name.as_str()), Some("Ada"));
    }

    #[test]
    fn inactive_staff_are_never_selectable() {
        let staff = team();

        let result = filter_by_staff(&staff, &StaffFilter::Only(StaffId::new("s3")));

        assert!(result.is_empty());
    }

    #[test]
    fn unknown_id_yields_empty_list() {
        let staff = team();

        assert!(filter_by_staff(&staff, &StaffFilter::Only(StaffId::new("nope"))).is_empty());
    }

    #[test]
    fn filter_display_round_trips() {
        assert_eq!(StaffFilter::All.to_string(), "all");
        assert_eq!(StaffFilter::Only(StaffId::new("s9")).to_string(), "s9");
    }
}
