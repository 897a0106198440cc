// --- File: crates/meetscheduler_booking/src/workflow.rs ---
//! The visitor's booking flow: pick a slot, fill in the form, see the result.
//!
//! The workflow is a plain state machine driven by visitor events. Network
//! work is split into [`BookingWorkflow::begin_submission`], which validates
//! and hands out the request, and [`BookingWorkflow::finish_submission`],
//! which takes the outcome. [`BookingWorkflow::submit`] does both around a
//! [`SchedulingService`].

use crate::availability::AvailabilitySlot;
use crate::error::WorkflowError;
use meetscheduler_api::{ApiError, BookingRequest, BookingResult, SchedulingService};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{info, warn};

pub const MISSING_FIELDS: &str = "Please fill in all required fields";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const BOOKING_FAILED: &str = "Failed to book meeting";
pub const SLOT_TAKEN: &str = "This time slot is no longer available";

static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// `local@domain.tld` shaped, nothing more.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Select,
    Form,
    Success,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Select => "select",
            Step::Form => "form",
            Step::Success => "success",
        })
    }
}

/// The form-level error shown above the booking form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingFields,
    InvalidEmail,
    /// Someone else booked the slot first.
    SlotUnavailable(String),
    /// Any other failed submission, with the backend's message or the fallback.
    SubmissionFailed(String),
}

impl FormError {
    pub fn message(&self) -> &str {
        match self {
            FormError::MissingFields => MISSING_FIELDS,
            FormError::InvalidEmail => INVALID_EMAIL,
            FormError::SlotUnavailable(message) | FormError::SubmissionFailed(message) => message,
        }
    }

    fn from_api(err: &ApiError) -> Self {
        let detail = err.detail();
        if err.is_conflict() {
            FormError::SlotUnavailable(detail.unwrap_or_else(|| SLOT_TAKEN.to_string()))
        } else {
            FormError::SubmissionFailed(detail.unwrap_or_else(|| BOOKING_FAILED.to_string()))
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What the visitor has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub host_id: i64,
    pub selected_slot: Option<AvailabilitySlot>,
    pub visitor_name: String,
    pub visitor_email: String,
    /// Kept for the visitor's own reference; the booking endpoint has no
    /// field for it.
    pub notes: String,
}

/// Result of [`BookingWorkflow::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The workflow is now in `Success`.
    Booked,
    /// Validation or the backend rejected the booking; the workflow stays in
    /// `Form` with this error set.
    Failed(FormError),
    /// Nothing was sent, e.g. because a submission is already in flight.
    Ignored(WorkflowError),
}

#[derive(Debug, Clone)]
pub struct BookingWorkflow {
    step: Step,
    draft: BookingDraft,
    in_flight: bool,
    form_error: Option<FormError>,
    result: Option<BookingResult>,
}

impl BookingWorkflow {
    pub fn new(host_id: i64) -> Self {
        Self {
            step: Step::Select,
            draft: BookingDraft {
                host_id,
                ..BookingDraft::default()
            },
            in_flight: false,
            form_error: None,
            result: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the submit action should be offered.
    pub fn can_submit(&self) -> bool {
        self.step == Step::Form && !self.in_flight
    }

    pub fn form_error(&self) -> Option<&FormError> {
        self.form_error.as_ref()
    }

    /// True after the backend reported the selected slot as taken.
    pub fn needs_new_slot(&self) -> bool {
        matches!(self.form_error, Some(FormError::SlotUnavailable(_)))
    }

    /// The confirmation, once in `Success`.
    pub fn result(&self) -> Option<&BookingResult> {
        self.result.as_ref()
    }

    /// Meeting link of the confirmed booking, if the backend sent one.
    pub fn meet_link(&self) -> Option<&str> {
        self.result.as_ref().and_then(BookingResult::meet_link)
    }

    fn require_step(&self, step: Step, action: &'static str) -> Result<(), WorkflowError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WorkflowError::InvalidStep {
                action,
                step: self.step,
            })
        }
    }

    /// `Select → Form` with the chosen slot.
    pub fn select_slot(&mut self, slot: AvailabilitySlot) -> Result<(), WorkflowError> {
        self.require_step(Step::Select, "select a slot")?;
        info!("Slot selected: {} - {}", slot.start, slot.end);
        self.draft.selected_slot = Some(slot);
        self.form_error = None;
        self.step = Step::Form;
        Ok(())
    }

    /// `Form → Select`. The draft, including what was typed, is kept.
    pub fn back_to_slots(&mut self) -> Result<(), WorkflowError> {
        self.require_step(Step::Form, "go back to slot selection")?;
        if self.in_flight {
            return Err(WorkflowError::InFlight);
        }
        self.step = Step::Select;
        Ok(())
    }

    fn editable(&self, action: &'static str) -> Result<(), WorkflowError> {
        if self.step == Step::Success {
            return Err(WorkflowError::InvalidStep {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    pub fn set_visitor_name(&mut self, name: impl Into<String>) -> Result<(), WorkflowError> {
        self.editable("edit the name")?;
        self.draft.visitor_name = name.into();
        Ok(())
    }

    pub fn set_visitor_email(&mut self, email: impl Into<String>) -> Result<(), WorkflowError> {
        self.editable("edit the email")?;
        self.draft.visitor_email = email.into();
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), WorkflowError> {
        self.editable("edit the notes")?;
        self.draft.notes = notes.into();
        Ok(())
    }

    /// Checks the form in order, stopping at the first failure: required
    /// fields (blank after trimming counts as missing), then the shape of the
    /// email exactly as typed. Values are sent as typed.
    fn validate(&self) -> Result<(String, String), FormError> {
        let name = &self.draft.visitor_name;
        let email = &self.draft.visitor_email;
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(FormError::MissingFields);
        }
        if !is_valid_email(email) {
            return Err(FormError::InvalidEmail);
        }
        Ok((name.clone(), email.clone()))
    }

    /// Validates the form and marks a submission as in flight.
    ///
    /// Returns the request to send. While a submission is in flight every
    /// further call returns `WorkflowError::InFlight` and changes nothing.
    /// A validation failure sets the form error and leaves the state as is.
    pub fn begin_submission(&mut self) -> Result<BookingRequest, WorkflowError> {
        self.require_step(Step::Form, "submit")?;
        if self.in_flight {
            return Err(WorkflowError::InFlight);
        }
        let (name, email) = match self.validate() {
            Ok(fields) => fields,
            Err(err) => {
                self.form_error = Some(err.clone());
                return Err(WorkflowError::Validation(err));
            }
        };
        let slot = self.draft.selected_slot.as_ref().ok_or(WorkflowError::InvalidStep {
            action: "submit without a slot",
            step: self.step,
        })?;

        let request = BookingRequest {
            host_id: self.draft.host_id,
            start_time: slot.start.clone(),
            end_time: slot.end.clone(),
            title: format!("Meeting with {}", name),
            customer_name: name,
            customer_email: email,
        };
        self.form_error = None;
        self.in_flight = true;
        Ok(request)
    }

    /// Applies the outcome of the submission started by `begin_submission`.
    pub fn finish_submission(
        &mut self,
        outcome: Result<BookingResult, ApiError>,
    ) -> Result<SubmitOutcome, WorkflowError> {
        if !self.in_flight {
            return Err(WorkflowError::NotInFlight);
        }
        self.in_flight = false;
        match outcome {
            Ok(result) => {
                info!(
                    "Booking confirmed{}",
                    result
                        .meet_link()
                        .map(|link| format!(" ({})", link))
                        .unwrap_or_default()
                );
                self.result = Some(result);
                self.step = Step::Success;
                Ok(SubmitOutcome::Booked)
            }
            Err(err) => {
                warn!("Booking failed: {}", err);
                let form_error = FormError::from_api(&err);
                self.form_error = Some(form_error.clone());
                Ok(SubmitOutcome::Failed(form_error))
            }
        }
    }

    /// Validates, sends the booking and applies the result.
    pub async fn submit<S>(&mut self, backend: &S) -> SubmitOutcome
    where
        S: SchedulingService + ?Sized,
    {
        let request = match self.begin_submission() {
            Ok(request) => request,
            Err(WorkflowError::Validation(err)) => return SubmitOutcome::Failed(err),
            Err(err) => return SubmitOutcome::Ignored(err),
        };
        let outcome = backend.book(request).await;
        self.finish_submission(outcome)
            .unwrap_or_else(SubmitOutcome::Ignored)
    }
}

