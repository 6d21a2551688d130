use anyhow::{bail, Context, Result};
use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::flows::progress::ProgressSettings;
use crate::flows::schedule::ScheduleDefaults;
use crate::nav::page::PageContext;
use crate::views::calendar::parse_month;

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(default)]
pub struct UserConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CalendarConfig {
    /// Pin "today" (quoted `YYYY-MM-DD`). Unset means the system date.
    pub today: Option<NaiveDate>,
    /// `YYYY-MM`. Unset means the month of "today".
    pub initial_month: Option<String>,
    pub first_hour: u32,
    pub last_hour: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            today: None,
            initial_month: Some("2026-02".to_string()),
            first_hour: 6,
            last_hour: 22,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    pub tick_ms: u64,
    pub step_percent: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            tick_ms: 200,
            step_percent: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Unset means five days after "today".
    pub default_date: Option<NaiveDate>,
    pub default_time: String,
    pub default_duration_minutes: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            default_date: None,
            default_time: "10:00".to_string(),
            default_duration_minutes: 60,
        }
    }
}

/// Top-level meetdash config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(default)]
pub struct DashConfig {
    /// Record file used instead of the built-in sample.
    pub data: Option<PathBuf>,
    pub user: UserConfig,
    pub calendar: CalendarConfig,
    pub upload: UploadConfig,
    pub schedule: ScheduleConfig,
}

impl DashConfig {
    /// Load config from ~/.meetdash/config.toml. Returns default if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(DashConfig::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: DashConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let cal = &self.calendar;
        if cal.first_hour > cal.last_hour || cal.last_hour > 23 {
            bail!(
                "calendar hours must satisfy first_hour <= last_hour <= 23 (got {}..{})",
                cal.first_hour,
                cal.last_hour
            );
        }
        if let Some(ref m) = cal.initial_month {
            if parse_month(m).is_none() {
                bail!("calendar.initial_month must be YYYY-MM, got \"{m}\"");
            }
        }
        if self.upload.tick_ms == 0 {
            bail!("upload.tick_ms must be positive");
        }
        if !(1..=100).contains(&self.upload.step_percent) {
            bail!(
                "upload.step_percent must be between 1 and 100, got {}",
                self.upload.step_percent
            );
        }
        Ok(())
    }

    pub fn today(&self) -> NaiveDate {
        self.calendar
            .today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn page_context(&self) -> PageContext {
        let today = self.today();
        let calendar_month = self
            .calendar
            .initial_month
            .as_deref()
            .and_then(parse_month)
            .unwrap_or_else(|| today.with_day0(0).unwrap_or(today));
        PageContext {
            today,
            calendar_month,
            first_hour: self.calendar.first_hour,
            last_hour: self.calendar.last_hour,
            schedule: self.schedule_defaults(today),
        }
    }

    pub fn schedule_defaults(&self, today: NaiveDate) -> ScheduleDefaults {
        ScheduleDefaults {
            date: self
                .schedule
                .default_date
                .unwrap_or_else(|| today.checked_add_days(Days::new(5)).unwrap_or(today)),
            time: self.schedule.default_time.clone(),
            duration_minutes: self.schedule.default_duration_minutes,
        }
    }

    pub fn progress_settings(&self) -> ProgressSettings {
        ProgressSettings {
            tick: Duration::from_millis(self.upload.tick_ms),
            step: self.upload.step_percent,
        }
    }

    /// Effective config as `key = value` lines.
    pub fn display(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref data) = self.data {
            lines.push(format!("data = \"{}\"", data.display()));
        }
        lines.push("[user]".to_string());
        match (&self.user.name, &self.user.email) {
            (None, None) => lines.push("  (not set)".to_string()),
            (name, email) => {
                if let Some(name) = name {
                    lines.push(format!("  name = \"{name}\""));
                }
                if let Some(email) = email {
                    lines.push(format!("  email = \"{email}\""));
                }
            }
        }

        let cal = &self.calendar;
        lines.push("[calendar]".to_string());
        match cal.today {
            Some(d) => lines.push(format!("  today = \"{d}\"")),
            None => lines.push(format!("  today = \"{}\" (system date)", self.today())),
        }
        if let Some(ref m) = cal.initial_month {
            lines.push(format!("  initial_month = \"{m}\""));
        }
        lines.push(format!("  first_hour = {}", cal.first_hour));
        lines.push(format!("  last_hour = {}", cal.last_hour));

        lines.push("[upload]".to_string());
        lines.push(format!("  tick_ms = {}", self.upload.tick_ms));
        lines.push(format!("  step_percent = {}", self.upload.step_percent));

        let sched = self.schedule_defaults(self.today());
        lines.push("[schedule]".to_string());
        lines.push(format!("  default_date = \"{}\"", sched.date));
        lines.push(format!("  default_time = \"{}\"", sched.time));
        lines.push(format!(
            "  default_duration_minutes = {}",
            sched.duration_minutes
        ));
        lines.join("\n")
    }
}

/// Path to the config file: ~/.meetdash/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".meetdash").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.meetdash/config.toml
# Precedence: CLI flag > env var > this file > built-in default.
# Dates are quoted strings.

# data = "/path/to/records.yaml"

[user]
# name = "Sarah Chen"
# email = "sarah@example.com"

[calendar]
# today = "2026-02-05"
initial_month = "2026-02"
first_hour = 6
last_hour = 22

[upload]
tick_ms = 200
step_percent = 10

[schedule]
# default_date = "2026-02-10"
default_time = "10:00"
default_duration_minutes = 60
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn template_parses_to_defaults() {
        let config: DashConfig = toml::from_str(default_config_template()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.calendar.first_hour, 6);
        assert_eq!(config.upload.step_percent, 10);
        assert_eq!(config.schedule.default_time, "10:00");
        assert!(config.data.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: DashConfig = toml::from_str(
            r#"
[calendar]
today = "2026-02-05"
"#,
        )
        .unwrap();
        assert_eq!(config.today(), date(2026, 2, 5));
        assert_eq!(config.calendar.last_hour, 22);
        assert_eq!(config.upload.tick_ms, 200);
    }

    #[test]
    fn page_context_derives_dates() {
        let mut config = DashConfig::default();
        config.calendar.today = Some(date(2026, 2, 5));
        let ctx = config.page_context();
        assert_eq!(ctx.calendar_month, date(2026, 2, 1));
        assert_eq!(ctx.schedule.date, date(2026, 2, 10));
        assert_eq!(ctx.schedule.duration_minutes, 60);

        config.calendar.initial_month = None;
        config.calendar.today = Some(date(2026, 3, 17));
        assert_eq!(config.page_context().calendar_month, date(2026, 3, 1));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = DashConfig::default();
        config.calendar.first_hour = 20;
        config.calendar.last_hour = 8;
        assert!(config.validate().is_err());

        let mut config = DashConfig::default();
        config.upload.step_percent = 0;
        assert!(config.validate().is_err());

        let mut config = DashConfig::default();
        config.calendar.initial_month = Some("Feb 2026".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[upload]\ntick_ms = 50\nstep_percent = 25\n").unwrap();
        let config = DashConfig::load_from(&path).unwrap();
        assert_eq!(config.progress_settings().tick, Duration::from_millis(50));
        assert_eq!(config.progress_settings().step, 25);

        std::fs::write(&path, "[upload]\ntick_ms = 0\n").unwrap();
        assert!(DashConfig::load_from(&path).is_err());
    }
}
