// --- File: crates/services/meetscheduler_cli/src/commands.rs ---
use crate::console::{parse_choice, prompt, prompt_with_default, BACK};
use chrono::Utc;
use meetscheduler_api::{
    complete_callback, enrich_session, filter_meetings, logout, sign_in_url, ApiGateway, Meeting,
    MeetingFilter, Navigator,
};
use meetscheduler_booking::{
    fetch_availability, group_by_day, BookingWorkflow, DisplayZone, SlotGroups, Step,
    SubmitOutcome,
};
use meetscheduler_common::{parse_timestamp, MeetSchedulerError};
use meetscheduler_session::Session;
use std::io::{BufRead, Write};
use tracing::{info, instrument};

/// Runs the public booking page for `username` on the terminal.
///
/// Loads availability, lets the visitor pick a slot and fill in the form, and
/// submits. Typing `b` at a form prompt returns to the slot list with the
/// typed answers kept. End of input cancels the booking.
#[instrument(skip(gateway, zone, input, out))]
pub async fn book<R: BufRead, W: Write>(
    gateway: &ApiGateway,
    zone: &DisplayZone,
    username: &str,
    days: u32,
    input: &mut R,
    out: &mut W,
) -> Result<(), MeetSchedulerError> {
    let scheduling = gateway.scheduling();
    let host = match fetch_availability(scheduling, username, days).await {
        Ok(host) => host,
        Err(e) => {
            writeln!(out, "{}", e.user_message())?;
            return Err(e.into());
        }
    };

    writeln!(out, "Book a meeting with {}", host.host_email)?;
    if host.slots.is_empty() {
        writeln!(out, "No available slots in the next {} days.", days)?;
        return Ok(());
    }

    let groups = group_by_day(&host.slots, zone);
    let mut workflow = BookingWorkflow::new(host.host_id);

    loop {
        match workflow.step() {
            Step::Select => {
                print_slots(out, &groups, zone)?;
                let Some(answer) = prompt(input, out, "Pick a slot number: ")? else {
                    return cancelled(out);
                };
                let Some(index) = parse_choice(&answer, groups.slot_count()) else {
                    writeln!(out, "Please enter a number between 1 and {}.", groups.slot_count())?;
                    continue;
                };
                if let Some(slot) = groups.nth_slot(index) {
                    workflow.select_slot(slot.clone())?;
                }
            }
            Step::Form => {
                if let Some(slot) = &workflow.draft().selected_slot {
                    writeln!(
                        out,
                        "\n{} at {} (type '{}' to pick another time)",
                        zone.format_day(&zone.day_of(&slot.starts_at)),
                        zone.format_time(&slot.starts_at),
                        BACK
                    )?;
                }
                if !fill_form(&mut workflow, input, out)? {
                    return cancelled(out);
                }
                if workflow.step() != Step::Form {
                    continue;
                }

                match workflow.submit(scheduling).await {
                    SubmitOutcome::Booked => {}
                    SubmitOutcome::Failed(error) => {
                        writeln!(out, "{}", error.message())?;
                        if workflow.needs_new_slot() {
                            writeln!(out, "Please pick another time.")?;
                            workflow.back_to_slots()?;
                        }
                    }
                    SubmitOutcome::Ignored(e) => return Err(e.into()),
                }
            }
            Step::Success => {
                writeln!(out, "\nMeeting booked!")?;
                let draft = workflow.draft();
                if let Some(slot) = &draft.selected_slot {
                    writeln!(out, "{}", zone.format_day(&zone.day_of(&slot.starts_at)))?;
                    writeln!(
                        out,
                        "{} - {}",
                        zone.format_time(&slot.starts_at),
                        zone.format_time(&slot.ends_at)
                    )?;
                }
                writeln!(out, "You'll receive a calendar invite at {}", draft.visitor_email)?;
                match workflow.meet_link() {
                    Some(link) => writeln!(out, "Google Meet link: {}", link)?,
                    None => writeln!(out, "The host will send the meeting details by email.")?,
                }
                info!(host_id = host.host_id, "Booking completed");
                return Ok(());
            }
        }
    }
}

enum Answer {
    Text(String),
    Back,
    Closed,
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: &str,
) -> Result<Answer, MeetSchedulerError> {
    Ok(match prompt_with_default(input, out, label, current)? {
        None => Answer::Closed,
        Some(answer) if answer.eq_ignore_ascii_case(BACK) => Answer::Back,
        Some(answer) => Answer::Text(answer),
    })
}

/// Asks for name, email and notes.
///
/// Returns `false` at end of input. A `b` answer moves the workflow back to
/// slot selection and returns early.
fn fill_form<R: BufRead, W: Write>(
    workflow: &mut BookingWorkflow,
    input: &mut R,
    out: &mut W,
) -> Result<bool, MeetSchedulerError> {
    if let Some(error) = workflow.form_error() {
        writeln!(out, "{}", error.message())?;
    }

    let current = workflow.draft().visitor_name.clone();
    match ask(input, out, "Your name", &current)? {
        Answer::Text(name) => workflow.set_visitor_name(name)?,
        Answer::Back => return back(workflow),
        Answer::Closed => return Ok(false),
    }
    let current = workflow.draft().visitor_email.clone();
    match ask(input, out, "Email", &current)? {
        Answer::Text(email) => workflow.set_visitor_email(email)?,
        Answer::Back => return back(workflow),
        Answer::Closed => return Ok(false),
    }
    let current = workflow.draft().notes.clone();
    match ask(input, out, "Notes (optional)", &current)? {
        Answer::Text(notes) => workflow.set_notes(notes)?,
        Answer::Back => return back(workflow),
        Answer::Closed => return Ok(false),
    }
    Ok(true)
}

fn back(workflow: &mut BookingWorkflow) -> Result<bool, MeetSchedulerError> {
    workflow.back_to_slots()?;
    Ok(true)
}

fn print_slots<W: Write>(
    out: &mut W,
    groups: &SlotGroups,
    zone: &DisplayZone,
) -> Result<(), MeetSchedulerError> {
    let mut number = 1;
    for group in groups {
        writeln!(out, "\n{}", zone.format_day(&group.day))?;
        for slot in &group.slots {
            writeln!(
                out,
                "  {:>3}. {} - {}",
                number,
                zone.format_time(&slot.starts_at),
                zone.format_time(&slot.ends_at)
            )?;
            number += 1;
        }
    }
    Ok(())
}

fn cancelled<W: Write>(out: &mut W) -> Result<(), MeetSchedulerError> {
    writeln!(out, "\nBooking cancelled.")?;
    Ok(())
}

/// Prints the URL that starts sign-in for `username`.
pub fn login<W: Write>(gateway: &ApiGateway, username: &str, out: &mut W) -> Result<(), MeetSchedulerError> {
    let url = sign_in_url(gateway.primary().client().base_url(), username)?;
    writeln!(out, "Open this URL in a browser to sign in:\n{}", url)?;
    writeln!(out, "Then run `meetscheduler callback '<redirect URL>'`.")?;
    Ok(())
}

/// Stores the session from the sign-in redirect, then tries to add profile data.
pub async fn callback<W: Write>(
    gateway: &ApiGateway,
    navigator: &dyn Navigator,
    after_login_route: &str,
    query: &str,
    out: &mut W,
) -> Result<(), MeetSchedulerError> {
    let session = match complete_callback(query, gateway.session()) {
        Ok(session) => session,
        Err(e) => {
            writeln!(out, "{}", e)?;
            return Err(e.into());
        }
    };
    if !enrich_session(gateway).await {
        writeln!(out, "Signed in, but your profile could not be loaded right now.")?;
    }
    writeln!(out, "Signed in as {}", session.username)?;
    navigator.navigate(after_login_route);
    Ok(())
}

pub fn whoami<W: Write>(gateway: &ApiGateway, out: &mut W) -> Result<(), MeetSchedulerError> {
    match gateway.session().get_session() {
        Some(session) => {
            writeln!(out, "{} <{}> (id {})", session.username, session.email, session.user_id)?;
            if session.token.is_none() {
                writeln!(out, "No access token stored.")?;
            }
        }
        None => writeln!(out, "Not signed in.")?,
    }
    Ok(())
}

pub fn sign_out<W: Write>(gateway: &ApiGateway, out: &mut W) -> Result<(), MeetSchedulerError> {
    logout(gateway.session())?;
    writeln!(out, "Signed out.")?;
    Ok(())
}

/// Lists the signed-in host's meetings.
pub async fn meetings<W: Write>(
    gateway: &ApiGateway,
    zone: &DisplayZone,
    filter: MeetingFilter,
    out: &mut W,
) -> Result<(), MeetSchedulerError> {
    let session = require_session(gateway)?;
    let all = gateway.scheduling().meetings(&session.user_id).await?;
    let shown = filter_meetings(&all, filter, Utc::now());

    if shown.is_empty() {
        writeln!(out, "No meetings.")?;
        return Ok(());
    }
    for meeting in &shown {
        writeln!(out, "{}", meeting_line(meeting, zone))?;
    }
    Ok(())
}

fn meeting_line(meeting: &Meeting, zone: &DisplayZone) -> String {
    let when = match parse_timestamp(&meeting.start_ts) {
        Ok(start) => format!(
            "{}, {}",
            zone.format_day(&zone.day_of(&start)),
            zone.format_time(&start)
        ),
        Err(_) => meeting.start_ts.clone(),
    };
    let mut line = format!(
        "{}  {} with {} <{}>",
        when, meeting.title, meeting.customer_name, meeting.customer_email
    );
    if let Some(link) = meeting.meet_link.as_deref().filter(|l| !l.is_empty()) {
        line.push_str("  ");
        line.push_str(link);
    }
    line
}

fn require_session(gateway: &ApiGateway) -> Result<Session, MeetSchedulerError> {
    gateway.session().get_session().ok_or_else(|| {
        MeetSchedulerError::AuthError(
            "not signed in, run `meetscheduler login <username>` first".to_string(),
        )
    })
}
