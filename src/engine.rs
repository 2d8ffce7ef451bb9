//! Pure booking decisions. Every function here works on an immutable
//! snapshot of the [`Document`] and returns the updated state; persistence
//! and locking are the store's concern.

use crate::error::BookingError;
use crate::schedule::{is_bookable_time, within_open_ranges, BOOKABLE_TIMES};
use crate::types::{DaySlots, Developer, Document, Slot, SlotStatus};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_SHAPE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref NAME_DISALLOWED: Regex = Regex::new(r"[^0-9A-Za-zÀ-ÿ\s-]").unwrap();
}

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;

/// Strips `<`/`>` and everything outside letters, digits, whitespace,
/// hyphens and Latin-1 accented letters, then trims and truncates to 100
/// characters. Idempotent: truncation can expose trailing whitespace, so
/// the cut end is trimmed again.
pub fn sanitize_client_name(raw: &str) -> String {
    let stripped = NAME_DISALLOWED.replace_all(raw, "");
    let truncated: String = stripped.trim().chars().take(NAME_MAX_CHARS).collect();
    truncated.trim_end().to_string()
}

pub fn validate_date(date: &str) -> Result<NaiveDate, BookingError> {
    if !DATE_SHAPE.is_match(date) {
        return Err(BookingError::validation(format!(
            "date '{date}' must be formatted YYYY-MM-DD"
        )));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        BookingError::validation(format!("date '{date}' is not a valid calendar date"))
    })
}

pub fn validate_time(time: &str) -> Result<(), BookingError> {
    if !is_bookable_time(time) {
        return Err(BookingError::validation(format!(
            "time '{time}' is not a bookable slot"
        )));
    }
    Ok(())
}

fn validate_client_name(raw: &str) -> Result<String, BookingError> {
    let sanitized = sanitize_client_name(raw);
    let length = sanitized.chars().count();
    if length < NAME_MIN_CHARS {
        return Err(BookingError::validation(
            "client name must contain at least 2 valid characters",
        ));
    }
    Ok(sanitized)
}

/// Computes the booking transition. Checks run before any mutation: a
/// failed booking never changes the document.
pub fn book(
    document: &Document,
    date: &str,
    time: &str,
    client_name: &str,
    booked_at: DateTime<Utc>,
) -> Result<(Document, Slot), BookingError> {
    let date = validate_date(date)?;
    validate_time(time)?;
    let client_name = validate_client_name(client_name)?;

    if document.find_slot(date, time).is_some_and(|slot| slot.booked) {
        return Err(BookingError::Conflict(format!(
            "slot {date} {time} is already booked"
        )));
    }

    let slot = Slot {
        date,
        time: time.into(),
        booked: true,
        client_name: Some(client_name),
        booked_at: Some(booked_at),
    };
    let mut updated = document.clone();
    updated
        .slots
        .retain(|existing| !(existing.date == date && existing.time == time));
    updated.slots.push(slot.clone());
    Ok((updated, slot))
}

/// Computes the cancellation transition. The slot record is removed
/// entirely; "absent" and "present but unbooked" read the same.
pub fn cancel(document: &Document, date: &str, time: &str) -> Result<Document, BookingError> {
    let date = validate_date(date)?;
    validate_time(time)?;

    if !document.find_slot(date, time).is_some_and(|slot| slot.booked) {
        return Err(BookingError::NotFound(format!(
            "no booking exists for {date} {time}"
        )));
    }

    let mut updated = document.clone();
    updated
        .slots
        .retain(|existing| !(existing.date == date && existing.time == time));
    Ok(updated)
}

/// Derives the bookable state of each fixed time over the 7 days starting
/// at `week_start`. A slot is available iff the date is not before `today`,
/// no booked record exists for the pair, and the time falls inside one of
/// the developer's open ranges for that weekday.
pub fn week_availability(
    document: &Document,
    developer: &Developer,
    week_start: NaiveDate,
    today: NaiveDate,
) -> Vec<DaySlots> {
    (0..7)
        .filter_map(|offset| week_start.checked_add_days(Days::new(offset)))
        .map(|date| {
            let day_of_week = date.weekday().number_from_monday();
            let open_ranges = developer
                .availability
                .iter()
                .find(|day| day.day_of_week == day_of_week)
                .map(|day| day.slots.as_slice())
                .unwrap_or(&[]);

            let slots = BOOKABLE_TIMES
                .iter()
                .map(|time| {
                    let booked = document
                        .find_slot(date, time)
                        .is_some_and(|slot| slot.booked);
                    let available =
                        date >= today && !booked && within_open_ranges(open_ranges, time);
                    SlotStatus {
                        time: (*time).into(),
                        available,
                    }
                })
                .collect();
            DaySlots { date, slots }
        })
        .collect()
}
