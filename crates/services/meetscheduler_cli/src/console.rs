//! Line-based terminal I/O shared by the commands.

use meetscheduler_api::Navigator;
use meetscheduler_common::MeetSchedulerError;
use std::io::{BufRead, Write};

/// Input typed at any form prompt to return to slot selection.
pub const BACK: &str = "b";

/// Writes `label`, then reads one line.
///
/// Returns `None` at end of input. Surrounding whitespace is trimmed.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>, MeetSchedulerError> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Like [`prompt`], but an empty answer keeps `current`.
pub fn prompt_with_default<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: &str,
) -> Result<Option<String>, MeetSchedulerError> {
    let label = if current.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, current)
    };
    Ok(prompt(input, out, &label)?.map(|answer| {
        if answer.is_empty() {
            current.to_string()
        } else {
            answer
        }
    }))
}

/// Parses a 1-based menu choice into a 0-based index below `count`.
pub fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    match answer.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Tells the user where the application would take them next.
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: &str) {
        eprintln!("-> {}", route);
    }
}
