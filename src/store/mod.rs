pub mod models;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use models::*;

const BUILTIN_SEED: &str = include_str!("../../data/seed.yaml");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read record file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot determine record format for {0} (use .json, .yaml or .yml)")]
    UnknownFormat(String),
    #[error("failed to parse JSON records: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse YAML records: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("record set failed integrity checks:\n  {}", .0.join("\n  "))]
    Integrity(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    pub fn detect_from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Format::from_str)
    }
}

/// Read path over the meeting records.
///
/// Derived views only ever query through this trait, so the in-memory
/// [`RecordStore`] can be swapped for a persistent backend.
pub trait Repository {
    fn projects(&self) -> &[Project];

    fn meetings(&self) -> &[Meeting];

    fn project(&self, id: &str) -> Option<&Project> {
        self.projects().iter().find(|p| p.id == id)
    }

    fn meeting(&self, id: &str) -> Option<&Meeting> {
        self.meetings().iter().find(|m| m.id == id)
    }
}

/// The static record set, built once and never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStore {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    meetings: Vec<Meeting>,
}

impl Repository for RecordStore {
    fn projects(&self) -> &[Project] {
        &self.projects
    }

    fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }
}

impl RecordStore {
    /// Build a store from parts, running the integrity checks.
    pub fn new(projects: Vec<Project>, meetings: Vec<Meeting>) -> Result<Self, StoreError> {
        let store = RecordStore { projects, meetings };
        store.validate()?;
        Ok(store)
    }

    /// The sample record set compiled into the binary.
    pub fn builtin() -> Result<Self, StoreError> {
        Self::parse(BUILTIN_SEED, Format::Yaml)
    }

    /// Load a JSON or YAML record file; format comes from the extension.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let format = Format::detect_from_extension(path)
            .ok_or_else(|| StoreError::UnknownFormat(path.display().to_string()))?;
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::parse(&content, format)?;
        info!(
            "Loaded {} projects, {} meetings from {}",
            store.projects.len(),
            store.meetings.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn parse(content: &str, format: Format) -> Result<Self, StoreError> {
        let store: RecordStore = match format {
            Format::Json => serde_json::from_str(content)?,
            Format::Yaml => serde_yaml::from_str(content)?,
        };
        store.validate()?;
        debug!(
            projects = store.projects.len(),
            meetings = store.meetings.len(),
            "record set validated"
        );
        Ok(store)
    }

    /// Check referential integrity across the whole set. Every problem is
    /// collected rather than stopping at the first.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();

        let mut project_ids = HashSet::new();
        for p in &self.projects {
            if !project_ids.insert(p.id.as_str()) {
                problems.push(format!("duplicate project id {}", p.id));
            }
        }

        let mut meeting_ids = HashSet::new();
        let mut action_ids = HashSet::new();
        let mut follow_up_ids = HashSet::new();

        for m in &self.meetings {
            if !meeting_ids.insert(m.id.as_str()) {
                problems.push(format!("duplicate meeting id {}", m.id));
            }
            if !project_ids.contains(m.project_id.as_str()) {
                problems.push(format!(
                    "meeting {} references unknown project {}",
                    m.id, m.project_id
                ));
            }

            for a in &m.action_items {
                if !action_ids.insert(a.id.as_str()) {
                    problems.push(format!("duplicate action id {}", a.id));
                }
                if a.meeting_id != m.id {
                    problems.push(format!(
                        "action {} points at meeting {} but belongs to {}",
                        a.id, a.meeting_id, m.id
                    ));
                }
                if a.project_id != m.project_id {
                    problems.push(format!(
                        "action {} points at project {} but its meeting is in {}",
                        a.id, a.project_id, m.project_id
                    ));
                }
                if a.hold.is_some() && a.status != ActionStatus::Blocked {
                    problems.push(format!(
                        "action {} has a hold but is {}",
                        a.id,
                        a.status.as_str()
                    ));
                }
            }

            for f in &m.follow_ups {
                if !follow_up_ids.insert(f.id.as_str()) {
                    problems.push(format!("duplicate follow-up id {}", f.id));
                }
                if f.meeting_id != m.id || f.project_id != m.project_id {
                    problems.push(format!(
                        "follow-up {} references {}/{} but belongs to {}/{}",
                        f.id, f.project_id, f.meeting_id, m.project_id, m.id
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Integrity(problems))
        }
    }

    /// Counts shown by `meetdash stats`.
    pub fn stats(&self) -> StoreStats {
        let actions = self.meetings.iter().flat_map(|m| &m.action_items);
        let types = MeetingType::ALL
            .iter()
            .map(|t| TypeCount {
                meeting_type: *t,
                count: self.meetings.iter().filter(|m| m.meeting_type == *t).count(),
            })
            .collect();

        StoreStats {
            projects: self.projects.len(),
            meetings: self.meetings.len(),
            completed_meetings: self
                .meetings
                .iter()
                .filter(|m| m.status == MeetingStatus::Completed)
                .count(),
            scheduled_meetings: self
                .meetings
                .iter()
                .filter(|m| m.status == MeetingStatus::Scheduled)
                .count(),
            actions: actions.clone().count(),
            open_actions: actions.clone().filter(|a| a.status.is_open()).count(),
            follow_ups: self.meetings.iter().map(|m| m.follow_ups.len()).sum(),
            held_items: actions.filter(|a| HeldItem::from_action(a).is_some()).count(),
            types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_loads_and_validates() {
        let store = RecordStore::builtin().unwrap();
        assert_eq!(store.projects().len(), 4);
        assert_eq!(store.meetings().len(), 7);
        assert_eq!(store.meeting("meet-3").unwrap().time.hour(), 14);
        assert_eq!(store.project("proj-2").unwrap().name, "Mobile App v2.0");
        assert!(store.meeting("nope").is_none());
    }

    #[test]
    fn builtin_stats() {
        let stats = RecordStore::builtin().unwrap().stats();
        assert_eq!(stats.completed_meetings, 6);
        assert_eq!(stats.scheduled_meetings, 1);
        assert_eq!(stats.actions, 7);
        assert_eq!(stats.open_actions, 7);
        assert_eq!(stats.follow_ups, 2);
        assert_eq!(stats.held_items, 2);
    }

    #[test]
    fn rejects_dangling_project_reference() {
        let yaml = r#"
projects: []
meetings:
  - id: m-1
    title: Orphan
    project_id: proj-x
    date: 2026-02-01
    time: "9:00 AM"
    type: Standup
    status: Completed
"#;
        let err = RecordStore::parse(yaml, Format::Yaml).unwrap_err();
        match err {
            StoreError::Integrity(problems) => {
                assert_eq!(problems.len(), 1);
                assert!(problems[0].contains("unknown project proj-x"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_hold_on_pending_action_and_mismatched_back_reference() {
        let yaml = r##"
projects:
  - { id: p-1, name: P, description: d, color: "#000" }
meetings:
  - id: m-1
    title: M
    project_id: p-1
    date: 2026-02-01
    time: "9:00 AM"
    type: Review
    status: Completed
    action_items:
      - id: a-1
        kind: Task
        description: x
        meeting_id: m-2
        project_id: p-1
        due_date: 2026-02-02
        status: Pending
        hold: { reason: waiting, since: 2026-02-01 }
"##;
        let err = RecordStore::parse(yaml, Format::Yaml).unwrap_err();
        let StoreError::Integrity(problems) = err else {
            panic!("expected integrity error");
        };
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn malformed_time_fails_at_load() {
        let json = r##"{
            "projects": [{"id": "p", "name": "P", "description": "", "color": "#fff"}],
            "meetings": [{
                "id": "m", "title": "T", "project_id": "p", "date": "2026-02-01",
                "time": "half past nine", "type": "Standup", "status": "Completed"
            }]
        }"##;
        assert!(matches!(
            RecordStore::parse(json, Format::Json),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn format_detection() {
        assert_eq!(Format::detect_from_extension(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::detect_from_extension(Path::new("a.yml")), Some(Format::Yaml));
        assert_eq!(Format::detect_from_extension(Path::new("a.txt")), None);
    }
}
