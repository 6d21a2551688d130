pub mod actions;
pub mod email;
pub mod login;
pub mod progress;
pub mod schedule;
pub mod upload;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

use crate::nav::route::Route;
use crate::store::models::MeetingType;

/// A form field that can carry an inline validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Email,
    Password,
    Audio,
    Project,
    Title,
    Date,
    StartTime,
    EndTime,
    Time,
    Duration,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::Audio => "audio",
            Field::Project => "project",
            Field::Title => "title",
            Field::Date => "date",
            Field::StartTime => "startTime",
            Field::EndTime => "endTime",
            Field::Time => "time",
            Field::Duration => "duration",
        }
    }
}

/// Per-field validation messages. Every failing field is reported at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }

    /// `Ok(())` when nothing was reported.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMeeting {
    pub audio_file: String,
    pub project: String,
    pub new_project: bool,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub meeting_type: MeetingType,
    pub attendees: Vec<String>,
    pub track_in_calendar: bool,
    pub generate_transcript: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub meeting_id: String,
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSchedule {
    pub source_meeting_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub duration_minutes: u32,
    pub attendees: Vec<String>,
    pub agenda: String,
}

/// What a creation flow would have sent to a backend. Intents are logged and
/// kept in the [`Outbox`]; they never reach the record store.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntentKind {
    SaveMeeting(NewMeeting),
    SendEmail(OutgoingEmail),
    ScheduleMeeting(NewSchedule),
    ApproveAction { action_id: String },
    CompleteAction { action_id: String },
}

impl IntentKind {
    pub fn label(&self) -> &'static str {
        match self {
            IntentKind::SaveMeeting(_) => "save_meeting",
            IntentKind::SendEmail(_) => "send_email",
            IntentKind::ScheduleMeeting(_) => "schedule_meeting",
            IntentKind::ApproveAction { .. } => "approve_action",
            IntentKind::CompleteAction { .. } => "complete_action",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Intent {
    pub id: Uuid,
    #[serde(flatten)]
    pub kind: IntentKind,
}

/// In-memory log of intents produced during one session.
#[derive(Debug, Default)]
pub struct Outbox {
    intents: Vec<Intent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: IntentKind) -> Uuid {
        let intent = Intent {
            id: Uuid::new_v4(),
            kind,
        };
        info!(intent = intent.kind.label(), id = %intent.id, "recorded intent: {:?}", intent.kind);
        let id = intent.id;
        self.intents.push(intent);
        id
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn last(&self) -> Option<&Intent> {
        self.intents.last()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Result of a successful submit: the confirmation shown to the user and
/// where the app goes next.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub message: String,
    pub intent_id: Option<Uuid>,
    pub next: Route,
}

/// Split a comma-separated attendee list, dropping blanks.
pub fn split_attendees(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.add(Field::Title, "first");
        errors.add(Field::Title, "second");
        errors.add(Field::Audio, "audio");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Title), Some("first"));
        let order: Vec<_> = errors.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(order, ["audio", "title"]);
    }

    #[test]
    fn field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add(Field::StartTime, "Please select a start time");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["startTime"], "Please select a start time");
    }

    #[test]
    fn outbox_records_in_order() {
        let mut outbox = Outbox::new();
        let a = outbox.record(IntentKind::ApproveAction {
            action_id: "action-1".into(),
        });
        outbox.record(IntentKind::CompleteAction {
            action_id: "action-2".into(),
        });
        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox.intents()[0].id, a);
        assert_eq!(outbox.last().unwrap().kind.label(), "complete_action");
    }

    #[test]
    fn attendees_are_trimmed() {
        assert_eq!(
            split_attendees(" Sarah Chen, Mike Johnson ,, "),
            ["Sarah Chen", "Mike Johnson"]
        );
        assert!(split_attendees("").is_empty());
    }
}
