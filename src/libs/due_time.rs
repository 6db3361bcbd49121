//! Parsing of the free-form due time that accompanies a due date.
//!
//! Accepted forms are 12-hour "H:MM AM" / "H:MM PM" (case-insensitive, the
//! space before the period optional) and 24-hour "HH:MM". Anything else
//! yields `None`, which callers treat as "no due time".

use chrono::NaiveTime;

pub fn parse_due_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let upper = input.to_ascii_uppercase();
    let (clock, period) = if let Some(clock) = upper.strip_suffix("AM") {
        (clock.trim_end(), Some(false))
    } else if let Some(clock) = upper.strip_suffix("PM") {
        (clock.trim_end(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let (hours, minutes) = clock.split_once(':')?;
    let hours: u32 = parse_component(hours)?;
    let minutes: u32 = parse_component(minutes)?;
    if minutes > 59 {
        return None;
    }

    let hours = match period {
        Some(is_pm) => {
            if !(1..=12).contains(&hours) {
                return None;
            }
            match (hours, is_pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None if hours <= 23 => hours,
        None => return None,
    };

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Renders a time the way the add flow stores it, e.g. "2:30 PM".
pub fn format_due_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}
