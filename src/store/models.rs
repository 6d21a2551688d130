use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::views::time::MeetingTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display color, e.g. `#3b82f6`.
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingType {
    #[serde(rename = "Weekly Update")]
    WeeklyUpdate,
    Standup,
    Discussion,
    Planning,
    Review,
}

impl MeetingType {
    /// Bucket order used by the projects screen.
    pub const ALL: [MeetingType; 5] = [
        MeetingType::WeeklyUpdate,
        MeetingType::Standup,
        MeetingType::Planning,
        MeetingType::Review,
        MeetingType::Discussion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::WeeklyUpdate => "Weekly Update",
            MeetingType::Standup => "Standup",
            MeetingType::Discussion => "Discussion",
            MeetingType::Planning => "Planning",
            MeetingType::Review => "Review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], " ").trim() {
            "weekly update" | "weekly" => Some(MeetingType::WeeklyUpdate),
            "standup" => Some(MeetingType::Standup),
            "discussion" => Some(MeetingType::Discussion),
            "planning" => Some(MeetingType::Planning),
            "review" => Some(MeetingType::Review),
            _ => None,
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingStatus {
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Email,
    Meeting,
    Task,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Email => "Email",
            ActionKind::Meeting => "Meeting",
            ActionKind::Task => "Task",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    Pending,
    Blocked,
    Completed,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Pending => "Pending",
            ActionStatus::Blocked => "Blocked",
            ActionStatus::Completed => "Completed",
        }
    }

    /// Pending and Blocked actions still need someone's attention.
    pub fn is_open(&self) -> bool {
        matches!(self, ActionStatus::Pending | ActionStatus::Blocked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUpStatus {
    Tracked,
    Completed,
}

/// Why a blocked action is stalled and since when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hold {
    pub reason: String,
    pub since: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub kind: ActionKind,
    pub description: String,
    pub meeting_id: String,
    pub project_id: String,
    pub due_date: NaiveDate,
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Only valid on a Blocked action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<Hold>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: String,
    pub description: String,
    pub project_id: String,
    pub meeting_id: String,
    pub status: FollowUpStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub project_id: String,
    pub date: NaiveDate,
    pub time: MeetingTime,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<Action>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,
    #[serde(default)]
    pub problem_statements: Vec<String>,
    pub status: MeetingStatus,
}

impl Meeting {
    /// Scheduled and nothing recorded yet: the detail screen shows a notice
    /// instead of summary, decisions and actions.
    pub fn has_not_occurred(&self) -> bool {
        self.status == MeetingStatus::Scheduled && self.transcript.is_none()
    }
}

/// A blocked action viewed as a held item. Always borrows its source action.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HeldItem<'a> {
    pub action_id: &'a str,
    pub description: &'a str,
    pub reason: &'a str,
    pub project_id: &'a str,
    pub blocked_since: NaiveDate,
}

impl<'a> HeldItem<'a> {
    /// Project a Blocked action with a hold. Anything else is not held.
    pub fn from_action(action: &'a Action) -> Option<Self> {
        if action.status != ActionStatus::Blocked {
            return None;
        }
        let hold = action.hold.as_ref()?;
        Some(HeldItem {
            action_id: &action.id,
            description: &action.description,
            reason: &hold.reason,
            project_id: &action.project_id,
            blocked_since: hold.since,
        })
    }
}

/// Stats returned by `meetdash stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub projects: usize,
    pub meetings: usize,
    pub completed_meetings: usize,
    pub scheduled_meetings: usize,
    pub actions: usize,
    pub open_actions: usize,
    pub follow_ups: usize,
    pub held_items: usize,
    pub types: Vec<TypeCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCount {
    pub meeting_type: MeetingType,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(status: ActionStatus, hold: Option<Hold>) -> Action {
        Action {
            id: "a-1".into(),
            kind: ActionKind::Task,
            description: "Update the doc".into(),
            meeting_id: "m-1".into(),
            project_id: "p-1".into(),
            due_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            status,
            assigned_to: None,
            hold,
        }
    }

    fn hold() -> Hold {
        Hold {
            reason: "Waiting on legal".into(),
            since: NaiveDate::from_ymd_opt(2026, 2, 4).unwrap(),
        }
    }

    #[test]
    fn held_item_projects_blocked_action() {
        let a = action(ActionStatus::Blocked, Some(hold()));
        let held = HeldItem::from_action(&a).unwrap();
        assert_eq!(held.action_id, "a-1");
        assert_eq!(held.reason, "Waiting on legal");
        assert_eq!(held.blocked_since.to_string(), "2026-02-04");
    }

    #[test]
    fn held_item_requires_blocked_status_and_hold() {
        assert!(HeldItem::from_action(&action(ActionStatus::Blocked, None)).is_none());
        assert!(HeldItem::from_action(&action(ActionStatus::Pending, Some(hold()))).is_none());
    }

    #[test]
    fn meeting_type_parses_loosely() {
        assert_eq!(MeetingType::from_str("Weekly Update"), Some(MeetingType::WeeklyUpdate));
        assert_eq!(MeetingType::from_str("weekly-update"), Some(MeetingType::WeeklyUpdate));
        assert_eq!(MeetingType::from_str("REVIEW"), Some(MeetingType::Review));
        assert_eq!(MeetingType::from_str("Client Call"), None);
    }

    #[test]
    fn meeting_type_serializes_display_name() {
        let json = serde_json::to_string(&MeetingType::WeeklyUpdate).unwrap();
        assert_eq!(json, "\"Weekly Update\"");
    }
}
