use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::path::Path;

use super::progress::{ProgressSettings, UploadProgress};
use super::{split_attendees, Field, FieldErrors, IntentKind, NewMeeting, Outbox, Outcome};
use crate::nav::route::Route;
use crate::store::models::MeetingType;
use crate::store::Repository;

/// A selected recording. Only the name and size matter; nothing is uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct AudioFile {
    pub name: String,
    pub size_bytes: u64,
}

impl AudioFile {
    /// Accept `.mp3`/`.wav` files or anything tagged `audio/mpeg` / `audio/wav`.
    pub fn is_audio(name: &str, mime: Option<&str>) -> bool {
        let lower = name.to_lowercase();
        matches!(mime, Some("audio/mpeg" | "audio/wav"))
            || lower.ends_with(".mp3")
            || lower.ends_with(".wav")
    }

    pub fn new(name: &str, size_bytes: u64, mime: Option<&str>) -> Option<Self> {
        AudioFile::is_audio(name, mime).then(|| AudioFile {
            name: name.to_string(),
            size_bytes,
        })
    }

    /// Build from a file on disk. `Ok(None)` when the file is not audio.
    pub fn from_path(path: &Path) -> std::io::Result<Option<Self>> {
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        Ok(AudioFile::new(name, meta.len(), None))
    }

    pub fn display_size(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

/// `512 B`, `1.50 KB`, `3.25 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProjectChoice {
    #[default]
    Unset,
    Existing(String),
    New(String),
}

#[derive(Debug, Clone)]
pub struct UploadForm {
    pub audio: Option<AudioFile>,
    pub project: ProjectChoice,
    pub title: String,
    pub date: Option<NaiveDate>,
    /// `HH:MM`, 24-hour.
    pub start_time: String,
    pub end_time: String,
    pub meeting_type: MeetingType,
    /// Comma-separated names.
    pub attendees: String,
    pub track_in_calendar: bool,
}

impl Default for UploadForm {
    fn default() -> Self {
        UploadForm {
            audio: None,
            project: ProjectChoice::Unset,
            title: String::new(),
            date: None,
            start_time: String::new(),
            end_time: String::new(),
            meeting_type: MeetingType::WeeklyUpdate,
            attendees: String::new(),
            track_in_calendar: true,
        }
    }
}

fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

impl UploadForm {
    /// Check every required field; all failures are reported together.
    pub fn validate(&self, repo: &dyn Repository) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.audio.is_none() {
            errors.add(Field::Audio, "Please upload an audio file");
        }

        match &self.project {
            ProjectChoice::Unset => errors.add(Field::Project, "Please select a project"),
            ProjectChoice::Existing(id) if id.trim().is_empty() => {
                errors.add(Field::Project, "Please select a project")
            }
            ProjectChoice::Existing(id) if repo.project(id).is_none() => {
                errors.add(Field::Project, "Selected project does not exist")
            }
            ProjectChoice::New(name) if name.trim().is_empty() => {
                errors.add(Field::Project, "Please enter a project name")
            }
            _ => {}
        }

        if self.title.trim().is_empty() {
            errors.add(Field::Title, "Please enter a meeting title");
        }

        if self.date.is_none() {
            errors.add(Field::Date, "Please select a meeting date");
        }

        // Times are checked for presence and form only; an end time before
        // the start is a meeting that runs past midnight.
        if self.start_time.trim().is_empty() {
            errors.add(Field::StartTime, "Please select a start time");
        } else if parse_clock(&self.start_time).is_none() {
            errors.add(Field::StartTime, "Start time must be HH:MM");
        }
        if self.end_time.trim().is_empty() {
            errors.add(Field::EndTime, "Please select an end time");
        } else if parse_clock(&self.end_time).is_none() {
            errors.add(Field::EndTime, "End time must be HH:MM");
        }

        errors
    }

    /// Validate and record the meeting the upload would create. On success
    /// the app returns to the calendar; on failure nothing happens.
    pub fn submit(
        &self,
        repo: &dyn Repository,
        generate_transcript: bool,
        outbox: &mut Outbox,
    ) -> Result<Outcome, FieldErrors> {
        self.validate(repo).into_result()?;

        let (project, new_project) = match &self.project {
            ProjectChoice::Existing(id) => (id.trim().to_string(), false),
            ProjectChoice::New(name) => (name.trim().to_string(), true),
            ProjectChoice::Unset => (String::new(), false),
        };

        let meeting = NewMeeting {
            audio_file: self
                .audio
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            project,
            new_project,
            title: self.title.trim().to_string(),
            date: self.date.unwrap_or_default(),
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            meeting_type: self.meeting_type,
            attendees: split_attendees(&self.attendees),
            track_in_calendar: self.track_in_calendar,
            generate_transcript,
        };

        let intent_id = outbox.record(IntentKind::SaveMeeting(meeting));
        let message = if generate_transcript {
            "Meeting saved and processing transcript!"
        } else {
            "Meeting saved successfully!"
        };

        Ok(Outcome {
            message: message.to_string(),
            intent_id: Some(intent_id),
            next: Route::Calendar,
        })
    }
}

/// Local state of the upload screen: the form plus the progress of the
/// currently selected file. Dropping the session stops any running progress.
#[derive(Debug, Default)]
pub struct UploadSession {
    pub form: UploadForm,
    progress: Option<UploadProgress>,
    settings: ProgressSettings,
}

impl UploadSession {
    pub fn new(settings: ProgressSettings) -> Self {
        UploadSession {
            form: UploadForm::default(),
            progress: None,
            settings,
        }
    }

    /// Select a file and start simulated progress. Replaces (and stops) any
    /// previous selection. Must run inside a tokio runtime.
    pub fn select_file(&mut self, file: AudioFile) {
        self.form.audio = Some(file);
        self.progress = Some(UploadProgress::start(self.settings));
    }

    /// Clear the selection; progress resets to 0 and stops ticking.
    pub fn remove_file(&mut self) {
        self.form.audio = None;
        self.progress = None;
    }

    pub fn progress(&self) -> u8 {
        self.progress.as_ref().map_or(0, UploadProgress::percent)
    }

    pub fn is_uploading(&self) -> bool {
        self.progress
            .as_ref()
            .is_some_and(|p| p.is_running() && !p.is_complete())
    }

    pub fn upload(&self) -> Option<&UploadProgress> {
        self.progress.as_ref()
    }
}
