//! Waitlist
//!
//! Clients waiting for a slot to open. Entries are read-only here; notifying, removing and
//! adding go through [`WaitlistMutations`].

use async_trait::async_trait;
use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{ClientId, ServiceId},
    ids::TypedId,
    mutations::MutationError,
    staff::StaffId,
};

/// Waitlist Entry Id
pub type WaitlistEntryId = TypedId<WaitlistEntry>;

/// Where an entry is in its lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    /// Still waiting.
    #[default]
    Waiting,

    /// Told a slot opened.
    Notified,
}

/// Preferred window of the day; a missing bound is open-ended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredTimeRange {
    /// Earliest acceptable start
    #[serde(default)]
    pub start: Option<Time>,

    /// Latest acceptable start
    #[serde(default)]
    pub end: Option<Time>,
}

impl PreferredTimeRange {
    /// Whether `time` falls inside the window, bounds inclusive.
    #[must_use]
    pub fn contains(&self, time: Time) -> bool {
        self.start.is_none_or(|start| time >= start) && self.end.is_none_or(|end| time <= end)
    }
}

/// A client waiting for an opening.
///
/// `None` for staff, service or date means "any".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    /// Entry id
    pub id: WaitlistEntryId,

    /// Waiting client
    pub client_id: ClientId,

    /// Client display name
    pub client_name: String,

    /// Wanted service
    #[serde(default)]
    pub service_id: Option<ServiceId>,

    /// Wanted staff member
    #[serde(default)]
    pub staff_id: Option<StaffId>,

    /// Wanted day
    #[serde(default)]
    pub preferred_date: Option<Date>,

    /// Wanted time of day
    #[serde(default)]
    pub preferred_time: PreferredTimeRange,

    /// Lifecycle status
    #[serde(default)]
    pub status: WaitlistStatus,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the entry was added
    pub created_at: Timestamp,

    /// When the client was last notified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<Timestamp>,
}

impl WaitlistEntry {
    /// Whether an opening with these attributes would suit this client.
    #[must_use]
    pub fn matches_slot(
        &self,
        staff_id: &StaffId,
        service_id: &ServiceId,
        date: Date,
        time: Time,
    ) -> bool {
        self.staff_id.as_ref().is_none_or(|wanted| wanted == staff_id)
            && self.service_id.as_ref().is_none_or(|wanted| wanted == service_id)
            && self.preferred_date.is_none_or(|wanted| wanted == date)
            && self.preferred_time.contains(time)
    }
}

/// Display filter over waitlist entries; unset fields admit everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitlistFilter {
    /// Only entries with this status
    pub status: Option<WaitlistStatus>,

    /// Only entries preferring this day, or with no preferred day
    pub date: Option<Date>,
}

impl WaitlistFilter {
    /// Whether `entry` passes.
    #[must_use]
    pub fn admits(&self, entry: &WaitlistEntry) -> bool {
        self.status.is_none_or(|status| entry.status == status)
            && self
                .date
                .is_none_or(|date| entry.preferred_date.is_none_or(|wanted| wanted == date))
    }
}

/// Entries passing `filter`, oldest first.
pub fn filter_waitlist<'a>(
    entries: &'a [WaitlistEntry],
    filter: &WaitlistFilter,
) -> Vec<&'a WaitlistEntry> {
    let mut matching: Vec<&WaitlistEntry> =
        entries.iter().filter(|entry| filter.admits(entry)).collect();

    matching.sort_by_key(|entry| entry.created_at);

    matching
}

/// A new waitlist request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWaitlistEntry {
    /// Waiting client
    pub client_id: ClientId,

    /// Wanted service
    pub service_id: Option<ServiceId>,

    /// Wanted staff member
    pub staff_id: Option<StaffId>,

    /// Wanted day
    pub preferred_date: Option<Date>,

    /// Wanted time of day
    pub preferred_time: PreferredTimeRange,

    /// Free-form notes
    pub notes: Option<String>,
}

/// Waitlist writes performed by the data layer.
#[automock]
#[async_trait]
pub trait WaitlistMutations: Send + Sync {
    /// Tell the client a slot opened.
    async fn notify(&self, id: &WaitlistEntryId) -> Result<(), MutationError>;

    /// Take the entry off the list.
    async fn remove(&self, id: &WaitlistEntryId) -> Result<(), MutationError>;

    /// Add an entry, returning its id.
    async fn add(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntryId, MutationError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use testresult::TestResult;

    use super::*;

    fn entry(id: &str, created: &str) -> TestResult<WaitlistEntry> {
        Ok(WaitlistEntry {
            id: WaitlistEntryId::new(id),
            client_id: ClientId::new("c1"),
            client_name: "Ada".to_string(),
            service_id: None,
            staff_id: None,
            preferred_date: None,
            preferred_time: PreferredTimeRange::default(),
            status: WaitlistStatus::Waiting,
            notes: None,
            created_at: created.parse()?,
            notified_at: None,
        })
    }

    #[test]
    fn any_entry_matches_every_slot() -> TestResult {
        let entry = entry("w1", "2026-02-01T00:00:00Z")?;

        assert!(entry.matches_slot(
            &StaffId::new("s1"),
            &ServiceId::new("cut"),
            date(2026, 2, 14),
            time(9, 0, 0, 0)
        ));

        Ok(())
    }

    #[test]
    fn preferences_narrow_matches() -> TestResult {
        let mut entry = entry("w1", "2026-02-01T00:00:00Z")?;
        entry.staff_id = Some(StaffId::new("s1"));
        entry.preferred_date = Some(date(2026, 2, 14));
        entry.preferred_time = PreferredTimeRange {
            start: Some(time(12, 0, 0, 0)),
            end: None,
        };

        let cut = ServiceId::new("cut");

        assert!(entry.matches_slot(&StaffId::new("s1"), &cut, date(2026, 2, 14), time(12, 0, 0, 0)));
        assert!(!entry.matches_slot(&StaffId::new("s2"), &cut, date(2026, 2, 14), time(13, 0, 0, 0)));
        assert!(!entry.matches_slot(&StaffId::new("s1"), &cut, date(2026, 2, 15), time(13, 0, 0, 0)));
        assert!(!entry.matches_slot(&StaffId::new("s1"), &cut, date(2026, 2, 14), time(11, 0, 0, 0)));

        Ok(())
    }

    #[test]
    fn filter_by_status_and_date() -> TestResult {
        let mut notified = entry("w2", "2026-02-01T00:00:00Z")?;
        notified.status = WaitlistStatus::Notified;

        let mut other_day = entry("w3", "2026-01-15T00:00:00Z")?;
        other_day.preferred_date = Some(date(2026, 3, 1));

        let entries = vec![entry("w1", "2026-02-02T00:00:00Z")?, notified, other_day];

        let waiting: Vec<&str> = filter_waitlist(
            &entries,
            &WaitlistFilter {
                status: Some(WaitlistStatus::Waiting),
                date: None,
            },
        )
        .into_iter()
        .map(|e| e.id.as_str())
        .collect();
        assert_eq!(waiting, vec!["w3", "w1"]);

        let on_day = filter_waitlist(
            &entries,
            &WaitlistFilter {
                status: None,
                date: Some(date(2026, 2, 14)),
            },
        );
        assert_eq!(on_day.len(), 2);

        Ok(())
    }

    #[test]
    fn entry_deserialises_with_any_defaults() -> TestResult {
        let entry: WaitlistEntry = serde_json::from_str(
            r#"{"id": "w1", "clientId": "c1", "clientName": "Ada", "createdAt": "2026-02-01T00:00:00Z"}"#,
        )?;

        assert_eq!(entry.status, WaitlistStatus::Waiting);
        assert!(entry.staff_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn mutations_are_delegated() -> TestResult {
        let mut mutations = MockWaitlistMutations::new();
        mutations
            .expect_notify()
            .withf(|id| id.as_str() == "w1")
            .times(1)
            .returning(|_| Ok(()));

        mutations.notify(&WaitlistEntryId::new("w1")).await?;

        Ok(())
    }
}
