use chrono::NaiveDate;
use serde::Serialize;

use super::{IntentKind, Outbox, OutgoingEmail, Outcome};
use crate::nav::route::Route;
use crate::store::models::Meeting;

/// Follow-up "minutes of meeting" email, pre-filled from a meeting.
#[derive(Debug, Clone, Serialize)]
pub struct EmailDraft {
    pub meeting_id: String,
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
}

/// `M/D/YYYY`, the short US date used in email bodies.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn numbered<T>(items: &[T], empty: &str, line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, line(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

impl EmailDraft {
    pub fn for_meeting(meeting: &Meeting) -> Self {
        let decisions = numbered(&meeting.decisions, "No decisions recorded", |d| d.clone());
        let actions = numbered(&meeting.action_items, "No action items", |a| {
            format!(
                "{} - {} (Due: {})",
                a.description,
                a.assigned_to.as_deref().unwrap_or("Unassigned"),
                short_date(a.due_date)
            )
        });

        let body = format!(
            "Hi Team,\n\n\
             Please find below the summary from our recent meeting \"{title}\" held on {date}.\n\n\
             MEETING SUMMARY:\n{summary}\n\n\
             KEY DECISIONS:\n{decisions}\n\n\
             ACTION ITEMS:\n{actions}\n\n\
             Best regards,\n\
             Meeting Intelligence Platform",
            title = meeting.title,
            date = short_date(meeting.date),
            summary = meeting.summary.as_deref().unwrap_or("No summary available"),
        );

        EmailDraft {
            meeting_id: meeting.id.clone(),
            subject: format!("Meeting Summary: {}", meeting.title),
            body,
            recipients: meeting.attendees.clone(),
        }
    }

    /// "Send" the email: record the intent and go back to the dashboard.
    pub fn send(&self, outbox: &mut Outbox) -> Outcome {
        let intent_id = outbox.record(IntentKind::SendEmail(OutgoingEmail {
            meeting_id: self.meeting_id.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            recipients: self.recipients.clone(),
        }));
        Outcome {
            message: "Email sent successfully!".to_string(),
            intent_id: Some(intent_id),
            next: Route::Home,
        }
    }
}
