// --- File: crates/meetscheduler_booking/src/availability.rs ---
//! Loading a host's open slots and grouping them by day.

use crate::error::AvailabilityError;
use crate::zone::DisplayZone;
use chrono::{DateTime, NaiveDate, Utc};
use meetscheduler_api::{ApiError, SchedulingService, SlotTimes};
use meetscheduler_common::parse_timestamp;
use tracing::{debug, info, warn};

/// Default look-ahead window in days.
pub const DEFAULT_DAYS: u32 = 14;

/// An open slot. `start`/`end` are the backend's original strings, sent back
/// verbatim when booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySlot {
    pub start: String,
    pub end: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    pub fn parse(times: &SlotTimes) -> Result<Self, AvailabilityError> {
        let starts_at = parse_timestamp(&times.start)
            .map_err(|e| AvailabilityError::MalformedResponse(format!("slot start: {}", e)))?;
        let ends_at = parse_timestamp(&times.end)
            .map_err(|e| AvailabilityError::MalformedResponse(format!("slot end: {}", e)))?;
        if ends_at <= starts_at {
            return Err(AvailabilityError::MalformedResponse(format!(
                "slot {} ends before it starts",
                times.start
            )));
        }
        Ok(Self {
            start: times.start.clone(),
            end: times.end.clone(),
            starts_at,
            ends_at,
        })
    }
}

/// What a booking page needs about its host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSlots {
    pub host_id: i64,
    pub host_email: String,
    /// In backend order.
    pub slots: Vec<AvailabilitySlot>,
}

/// Loads the open slots of `username` for the next `days` days.
///
/// Input is checked before any request is made. Slots keep the backend's
/// order.
pub async fn fetch_availability<S>(
    backend: &S,
    username: &str,
    days: u32,
) -> Result<HostSlots, AvailabilityError>
where
    S: SchedulingService + ?Sized,
{
    let username = username.trim();
    if username.is_empty() {
        return Err(AvailabilityError::InvalidInput("username is required".into()));
    }
    if days == 0 {
        return Err(AvailabilityError::InvalidInput("days must be at least 1".into()));
    }

    let availability = backend
        .availability_by_username(username, days)
        .await
        .map_err(|e| {
            warn!("Loading availability for '{}' failed: {}", username, e);
            availability_error(username, e)
        })?;

    let slots = availability
        .available_slots
        .iter()
        .map(AvailabilitySlot::parse)
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} slots for '{}'", slots.len(), username);
    Ok(HostSlots {
        host_id: availability.host_id,
        host_email: availability.host_email,
        slots,
    })
}

fn availability_error(username: &str, err: ApiError) -> AvailabilityError {
    if err.is_not_found() {
        return AvailabilityError::HostNotFound(username.to_string());
    }
    let message = err.detail().unwrap_or_else(|| err.to_string());
    match err {
        ApiError::Status { status, .. } => AvailabilityError::Backend { status, message },
        ApiError::Unauthorized { .. } => AvailabilityError::Backend { status: 401, message },
        ApiError::Network(msg) => AvailabilityError::Network(msg),
        ApiError::Decode(msg) => AvailabilityError::MalformedResponse(msg),
        ApiError::InvalidRequest(msg) => AvailabilityError::InvalidInput(msg),
    }
}

/// Slots sharing one calendar day on the viewer's wall clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGroup {
    pub day: NaiveDate,
    pub slots: Vec<AvailabilitySlot>,
}

/// Day groups in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotGroups {
    groups: Vec<SlotGroup>,
}

impl SlotGroups {
    pub fn groups(&self) -> &[SlotGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SlotGroup> {
        self.groups.iter()
    }

    /// Total number of slots across all groups.
    pub fn slot_count(&self) -> usize {
        self.groups.iter().map(|g| g.slots.len()).sum()
    }

    /// The `index`-th slot counting through the groups in display order.
    pub fn nth_slot(&self, index: usize) -> Option<&AvailabilitySlot> {
        self.groups.iter().flat_map(|g| g.slots.iter()).nth(index)
    }
}

impl<'a> IntoIterator for &'a SlotGroups {
    type Item = &'a SlotGroup;
    type IntoIter = std::slice::Iter<'a, SlotGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Groups slots by the calendar day of their start in `zone`.
///
/// Days appear in the order they are first seen; within a day slots keep
/// their input order. Nothing is re-sorted.
pub fn group_by_day(slots: &[AvailabilitySlot], zone: &DisplayZone) -> SlotGroups {
    let mut groups: Vec<SlotGroup> = Vec::new();
    for slot in slots {
        let day = zone.day_of(&slot.starts_at);
        match groups.iter_mut().find(|g| g.day == day) {
            Some(group) => group.slots.push(slot.clone()),
            None => groups.push(SlotGroup {
                day,
                slots: vec![slot.clone()],
            }),
        }
    }
    debug!("Grouped {} slots into {} days", slots.len(), groups.len());
    SlotGroups { groups }
}
