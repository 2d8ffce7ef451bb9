use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One bookable (date, time) unit. Identity is the `(date, time)` pair;
/// at most one booked record exists per pair, and cancelled slots are
/// removed from the document rather than kept with `booked: false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: String,
    pub booked: bool,
    #[serde(rename = "clientName", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(rename = "bookedAt", skip_serializing_if = "Option::is_none")]
    pub booked_at: Option<DateTime<Utc>>,
}

/// Contiguous open interval within a day, `HH:MM` strings.
/// Containment is half-open: `start <= t < end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// Open ranges for one weekday (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: u32,
    pub slots: Vec<TimeRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Developer {
    pub id: String,
    pub name: String,
    pub availability: Vec<DayAvailability>,
}

/// The full persisted state: recurring weekly capacity per developer plus
/// the concrete booked slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub developers: Vec<Developer>,
    #[serde(default)]
    pub slots: Vec<Slot>,
    pub timezone: String,
}

impl Document {
    /// Default document written on first server start: one developer with
    /// Monday to Friday office hours, no bookings.
    pub fn seed() -> Self {
        let weekday_ranges = vec![
            TimeRange {
                start: "10:30".into(),
                end: "12:30".into(),
            },
            TimeRange {
                start: "14:00".into(),
                end: "18:30".into(),
            },
        ];
        let availability = (1..=5)
            .map(|day_of_week| DayAvailability {
                day_of_week,
                slots: weekday_ranges.clone(),
            })
            .collect();

        Self {
            developers: vec![Developer {
                id: "daniel".into(),
                name: "Daniel".into(),
                availability,
            }],
            slots: Vec::new(),
            timezone: "America/Santiago".into(),
        }
    }

    pub fn find_slot(&self, date: NaiveDate, time: &str) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|slot| slot.date == date && slot.time == time)
    }

    pub fn find_developer(&self, id: &str) -> Option<&Developer> {
        self.developers.iter().find(|developer| developer.id == id)
    }
}

/// Availability of one fixed time on one concrete date, as derived for a
/// requested week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub time: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<SlotStatus>,
}
