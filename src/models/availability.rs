use serde::{Deserialize, Serialize};

/// Bookable weekdays. Demos only run Monday to Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    /// Exact, case-insensitive lookup of a canonical day name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AvailabilitySlot {
    pub day: Weekday,
    pub times: &'static [&'static str],
}

pub static AVAILABILITY: [AvailabilitySlot; 5] = [
    AvailabilitySlot {
        day: Weekday::Monday,
        times: &["10:00 AM", "11:00 AM", "2:00 PM", "4:00 PM"],
    },
    AvailabilitySlot {
        day: Weekday::Tuesday,
        times: &["9:30 AM", "11:00 AM", "1:00 PM", "3:30 PM"],
    },
    AvailabilitySlot {
        day: Weekday::Wednesday,
        times: &["10:00 AM", "12:00 PM", "2:00 PM", "5:00 PM"],
    },
    AvailabilitySlot {
        day: Weekday::Thursday,
        times: &["9:00 AM", "11:30 AM", "3:00 PM", "4:30 PM"],
    },
    AvailabilitySlot {
        day: Weekday::Friday,
        times: &["10:00 AM", "1:00 PM", "3:00 PM"],
    },
];

pub fn times_for(day: Weekday) -> &'static [&'static str] {
    AVAILABILITY
        .iter()
        .find(|slot| slot.day == day)
        .map(|slot| slot.times)
        .unwrap_or(&[])
}

pub fn to_human_readable(day: Weekday) -> String {
    times_for(day).join(", ")
}
