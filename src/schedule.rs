use crate::error::BookingError;
use crate::types::TimeRange;

/// The fixed set of bookable start times. The morning slot is a 30-minute
/// block, the afternoon slots are 60-minute blocks.
pub const BOOKABLE_TIMES: [&str; 5] = ["10:30", "14:00", "15:00", "16:00", "17:00"];

/// Template editing works on a 30-minute grid: every toggled cell
/// contributes one 30-minute span to the collapsed ranges.
pub const TEMPLATE_SLOT_MINUTES: u32 = 30;

pub fn is_bookable_time(time: &str) -> bool {
    BOOKABLE_TIMES.contains(&time)
}

/// Parses `HH:MM` into minutes since midnight.
pub fn time_to_minutes(time: &str) -> Option<u32> {
    let (hours, minutes) = time.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Range ends are exclusive bounds, so `24:00` (midnight, 1440) is legal
/// there even though it is not a time of day. Collapsing a selection that
/// runs to `23:30` produces exactly that end.
fn range_end_to_minutes(time: &str) -> Option<u32> {
    if time == "24:00" {
        return Some(24 * 60);
    }
    time_to_minutes(time)
}

/// Half-open containment: `time` falls inside one of the open ranges iff
/// `start <= time < end`. Malformed ranges never match.
pub fn within_open_ranges(ranges: &[TimeRange], time: &str) -> bool {
    let Some(t) = time_to_minutes(time) else {
        return false;
    };
    ranges.iter().any(|range| {
        match (
            time_to_minutes(&range.start),
            range_end_to_minutes(&range.end),
        ) {
            (Some(start), Some(end)) => start <= t && t < end,
            _ => false,
        }
    })
}

/// Collapses individually toggled grid times into the minimal set of
/// contiguous ranges. Two selections merge iff the next start equals the
/// previous range's end exactly; each selection spans 30 minutes.
pub fn collapse_selected_times(times: &[String]) -> Result<Vec<TimeRange>, BookingError> {
    let mut minutes = Vec::with_capacity(times.len());
    for time in times {
        let t = time_to_minutes(time).ok_or_else(|| {
            BookingError::validation(format!("invalid time '{time}', expected HH:MM"))
        })?;
        if t % TEMPLATE_SLOT_MINUTES != 0 {
            return Err(BookingError::validation(format!(
                "time '{time}' is not on the 30-minute grid"
            )));
        }
        minutes.push(t);
    }
    minutes.sort_unstable();
    minutes.dedup();

    let mut ranges = Vec::new();
    let mut current: Option<(u32, u32)> = None;
    for start in minutes {
        let end = start + TEMPLATE_SLOT_MINUTES;
        current = match current {
            Some((range_start, range_end)) if start == range_end => Some((range_start, end)),
            Some((range_start, range_end)) => {
                ranges.push(TimeRange {
                    start: minutes_to_time(range_start),
                    end: minutes_to_time(range_end),
                });
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    if let Some((range_start, range_end)) = current {
        ranges.push(TimeRange {
            start: minutes_to_time(range_start),
            end: minutes_to_time(range_end),
        });
    }
    Ok(ranges)
}
