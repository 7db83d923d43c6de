use chrono::Duration;
use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::ClassSession;

#[derive(Clone, Default)]
pub struct ICalExporter {
    calendar_name: String,
}

impl ICalExporter {
    pub fn new(calendar_name: impl Into<String>) -> Self {
        Self {
            calendar_name: calendar_name.into(),
        }
    }

    /// Render sessions as a calendar. An empty list still yields a valid, empty calendar.
    pub fn generate(&self, classes: &[ClassSession]) -> Vec<u8> {
        let mut calendar = Calendar::new();
        calendar.name(&self.calendar_name);

        for item in classes {
            let end = item.start_time + Duration::minutes(i64::from(item.duration_minutes));

            let mut event = Event::new();
            event.summary(&item.title);
            event.starts(item.start_time);
            event.ends(end);
            event.description(&format!("Trainer: {}", item.trainer_name));
            event.uid(&format!("{}@gym-booking", item.id));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_generate_single_class() {
        let exporter = ICalExporter::new("My Gym Schedule");
        let start = Utc.with_ymd_and_hms(2025, 11, 24, 6, 0, 0).unwrap();
        let class = ClassSession {
            id: "abc".to_string(),
            title: "Morning HIIT".to_string(),
            trainer_name: "Aditya Roy".to_string(),
            start_time: start,
            duration_minutes: 45,
            capacity: 20,
            attendees: vec!["u1".to_string()],
            created_at: start,
            updated_at: start,
        };

        let body = String::from_utf8(exporter.generate(&[class])).unwrap();
        assert!(body.contains("BEGIN:VEVENT"));
        assert!(body.contains("SUMMARY:Morning HIIT"));
        assert!(body.contains("DTEND:20251124T064500Z"));
        assert!(body.contains("UID:abc@gym-booking"));
    }

    #[test]
    fn test_generate_empty() {
        let exporter = ICalExporter::new("My Gym Schedule");
        let body = String::from_utf8(exporter.generate(&[])).unwrap();
        assert!(body.contains("BEGIN:VCALENDAR"));
        assert!(!body.contains("BEGIN:VEVENT"));
    }
}
