// --- File: crates/meetscheduler_booking/src/lib.rs ---
//! The public booking page core: availability loading and grouping, and the
//! `Select → Form → Success` booking workflow.

pub mod availability;
#[cfg(test)]
mod availability_proptest;
#[cfg(test)]
mod availability_test;
pub mod error;
#[cfg(test)]
mod mock;
pub mod workflow;
pub mod zone;

pub use availability::{
    fetch_availability, group_by_day, AvailabilitySlot, HostSlots, SlotGroup, SlotGroups,
    DEFAULT_DAYS,
};
pub use error::{AvailabilityError, WorkflowError, HOST_NOT_FOUND, LOAD_SLOTS_FAILED};
pub use workflow::{
    is_valid_email, BookingDraft, BookingWorkflow, FormError, Step, SubmitOutcome,
    BOOKING_FAILED, INVALID_EMAIL, MISSING_FIELDS, SLOT_TAKEN,
};
pub use zone::DisplayZone;
