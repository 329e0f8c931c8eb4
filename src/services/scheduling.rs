use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::models::availability::{times_for, Weekday};

/// Finds the first weekday name mentioned anywhere in `input`.
pub fn match_day(input: &str) -> Option<Weekday> {
    let lower = input.to_lowercase();
    Weekday::ALL
        .into_iter()
        .find(|day| lower.contains(&day.as_str().to_lowercase()))
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn strip_colons(s: &str) -> String {
    s.replace(':', "")
}

fn hour_digits(normalized: &str) -> String {
    let stripped = normalized.replace("am", "").replace("pm", "");
    stripped.split(':').next().unwrap_or_default().to_string()
}

type TimeRule = fn(candidate: &str, slot: &str) -> bool;

// Checked in order across the whole time list; the first rule with a hit wins.
const TIME_RULES: [TimeRule; 6] = [
    |c, s| c == s,
    |c, s| strip_colons(c) == strip_colons(s),
    |c, s| s.starts_with(c),
    |c, s| {
        let hour = hour_digits(c);
        !hour.is_empty() && hour == hour_digits(s)
    },
    |c, s| s.contains(c),
    |c, s| c.chars().count() <= 2 && strip_colons(s).starts_with(c),
];

/// Resolves free-text `input` to one of `day`'s slot strings.
pub fn match_time(day: Weekday, input: &str) -> Option<&'static str> {
    let candidate = normalize(input);
    if candidate.is_empty() {
        return None;
    }

    let slots = times_for(day);
    TIME_RULES.iter().find_map(|rule| {
        slots
            .iter()
            .find(|slot| rule(&candidate, &normalize(slot)))
            .copied()
    })
}

/// Next date after `today` falling on `day`. A same-weekday request moves a full week out.
pub fn next_date_for(day: Weekday, today: NaiveDate) -> NaiveDate {
    let target = day.to_chrono().num_days_from_monday() as i64;
    let current = today.weekday().num_days_from_monday() as i64;
    let mut diff = (target - current).rem_euclid(7);
    if diff == 0 {
        diff = 7;
    }
    today + Duration::days(diff)
}

/// Parses a slot string such as `"2:00 PM"`.
pub fn parse_slot_time(slot: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(slot.trim(), "%I:%M %p").ok()
}
