use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::{split_attendees, Field, FieldErrors, IntentKind, NewSchedule, Outbox, Outcome};
use crate::nav::route::Route;
use crate::store::models::{ActionKind, Meeting};

/// Defaults for a new follow-up meeting.
#[derive(Debug, Clone)]
pub struct ScheduleDefaults {
    pub date: NaiveDate,
    pub time: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDraft {
    pub source_meeting_id: String,
    pub title: String,
    pub date: NaiveDate,
    /// `HH:MM`, 24-hour.
    pub time: String,
    pub duration_minutes: u32,
    /// Comma-separated names.
    pub attendees: String,
    pub agenda: String,
}

impl ScheduleDraft {
    /// Pre-fill from the source meeting. The title comes from its first
    /// Meeting-kind action when there is one.
    pub fn for_meeting(meeting: &Meeting, defaults: &ScheduleDefaults) -> Self {
        let title = meeting
            .action_items
            .iter()
            .find(|a| a.kind == ActionKind::Meeting)
            .map(|a| a.description.clone())
            .unwrap_or_else(|| "Follow-up Meeting".to_string());

        ScheduleDraft {
            source_meeting_id: meeting.id.clone(),
            title,
            date: defaults.date,
            time: defaults.time.clone(),
            duration_minutes: defaults.duration_minutes,
            attendees: meeting.attendees.join(", "),
            agenda: format!(
                "Follow-up on: {}\n\nAgenda:\n- Review action items\n- Discuss next steps",
                meeting.title
            ),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.add(Field::Title, "Please enter a meeting title");
        }
        if NaiveTime::parse_from_str(self.time.trim(), "%H:%M").is_err() {
            errors.add(Field::Time, "Time must be HH:MM");
        }
        if self.duration_minutes == 0 {
            errors.add(Field::Duration, "Duration must be at least one minute");
        }
        errors
    }

    /// Record the meeting that would be scheduled and go to the calendar.
    pub fn submit(&self, outbox: &mut Outbox) -> Result<Outcome, FieldErrors> {
        self.validate().into_result()?;

        let intent_id = outbox.record(IntentKind::ScheduleMeeting(NewSchedule {
            source_meeting_id: self.source_meeting_id.clone(),
            title: self.title.trim().to_string(),
            date: self.date,
            time: self.time.trim().to_string(),
            duration_minutes: self.duration_minutes,
            attendees: split_attendees(&self.attendees),
            agenda: self.agenda.clone(),
        }));

        Ok(Outcome {
            message: "Meeting scheduled successfully!".to_string(),
            intent_id: Some(intent_id),
            next: Route::Calendar,
        })
    }
}
