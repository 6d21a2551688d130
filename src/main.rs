use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use meetdash::config::{self, DashConfig};
use meetdash::flows::email::EmailDraft;
use meetdash::flows::login::LoginForm;
use meetdash::flows::schedule::ScheduleDraft;
use meetdash::flows::upload::{AudioFile, ProjectChoice, UploadSession};
use meetdash::flows::{actions, FieldErrors, Outbox, Outcome};
use meetdash::nav::page::{self, Page};
use meetdash::nav::route::Route;
use meetdash::nav::Navigator;
use meetdash::output::{json as json_out, table};
use meetdash::store::models::MeetingType;
use meetdash::store::{RecordStore, Repository};
use meetdash::views::calendar::{parse_month, shift_month};
use meetdash::views::filters::TypeFilter;
use meetdash::views::project_detail;

#[derive(Parser)]
#[command(name = "meetdash", version, about = "Meeting dashboard: calendar, projects, actions and follow-ups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Record file to load instead of the built-in sample (JSON or YAML)
    #[arg(long, global = true, env = "MEETDASH_DATA")]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Screen(Screen),

    /// Manage ~/.meetdash/config.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Commands that render a screen or act on the loaded records.
#[derive(Subcommand)]
enum Screen {
    /// Sign in (any filled-in email and password is accepted)
    Login {
        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        password: String,
    },

    /// Dashboard: pending actions by project, tracked follow-ups, held items
    Home,

    /// Month grid with meeting markers
    Calendar {
        /// Month to show (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Move this many months from the shown month (negative for earlier)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
    },

    /// Hour-by-hour view of one day
    Day {
        /// Day to show (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Meeting detail
    Meeting {
        id: String,
    },

    /// Projects overview, or one project with --project
    Projects {
        /// Project ID to drill into
        #[arg(long)]
        project: Option<String>,

        /// Meeting type filter (e.g. "Standup", "Weekly Update", "all")
        #[arg(long = "type")]
        meeting_type: Option<String>,
    },

    /// Draft (and optionally send) the minutes email for a meeting
    Email {
        meeting_id: String,

        /// Override the generated subject
        #[arg(long)]
        subject: Option<String>,

        /// Send the draft
        #[arg(long)]
        send: bool,
    },

    /// Draft (and optionally confirm) a follow-up meeting
    Schedule {
        meeting_id: String,

        #[arg(long)]
        title: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        /// HH:MM, 24-hour
        #[arg(long)]
        time: Option<String>,

        /// Minutes
        #[arg(long)]
        duration: Option<u32>,

        /// Comma-separated names
        #[arg(long)]
        attendees: Option<String>,

        /// Schedule the meeting
        #[arg(long)]
        confirm: bool,
    },

    /// Upload a meeting recording and save the meeting
    Upload {
        /// Audio file (.mp3 or .wav)
        audio: Option<PathBuf>,

        /// Existing project ID
        #[arg(long, conflicts_with = "new_project")]
        project: Option<String>,

        /// Create a new project with this name
        #[arg(long)]
        new_project: Option<String>,

        #[arg(long, default_value = "")]
        title: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        /// HH:MM, 24-hour
        #[arg(long, default_value = "")]
        start: String,

        /// HH:MM, 24-hour
        #[arg(long, default_value = "")]
        end: String,

        /// Meeting type
        #[arg(long = "type", default_value = "Weekly Update")]
        meeting_type: String,

        /// Comma-separated names
        #[arg(long, default_value = "")]
        attendees: String,

        /// Do not track the meeting in the calendar
        #[arg(long)]
        no_track: bool,

        /// Also generate a transcript
        #[arg(long)]
        transcribe: bool,
    },

    /// Open a URL path such as /meeting/meet-1 or /calendar/day?date=2026-02-05
    Open {
        path: String,
    },

    /// Approve a pending action
    Approve {
        action_id: String,
    },

    /// Mark a pending action complete
    Complete {
        action_id: String,
    },

    /// Show record store statistics
    Stats,

    /// Show version and data source
    Info,

}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default config file if it does not exist
    Init,
    /// Print the effective config
    Show,
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {s}. Use YYYY-MM-DD"))
}

fn show_page(route: &Route, redirected: bool, page: &Page, json_output: bool) -> Result<()> {
    if json_output {
        json_out::print_page(route, redirected, page)
    } else {
        if redirected {
            println!("Unknown path, showing sign-in instead.\n");
        }
        table::print_page(page);
        Ok(())
    }
}

fn show_outcome(outcome: &Outcome, outbox: &Outbox, json_output: bool) -> Result<()> {
    if json_output {
        json_out::print_json(&serde_json::json!({
            "outcome": outcome,
            "intent": outbox.last(),
        }))
    } else {
        table::print_outcome(outcome);
        Ok(())
    }
}

fn reject(errors: &FieldErrors, json_output: bool) -> Result<()> {
    if json_output {
        json_out::print_json(&serde_json::json!({ "errors": errors }))?;
    } else {
        table::print_field_errors(errors);
    }
    bail!(
        "{} field{} invalid, nothing submitted",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;

    let config = DashConfig::load()?;

    match cli.command {
        Commands::Config { action } => run_config(action, &config, json_output),
        Commands::Screen(screen) => run_screen(screen, cli.data, &config, json_output),
    }
}

fn run_config(action: ConfigAction, config: &DashConfig, json_output: bool) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config::config_path()?;
            if config::init_config()? {
                println!("Created {}", path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
        ConfigAction::Show => {
            if json_output {
                json_out::print_json(config)?;
            } else {
                println!("{}", config.display());
            }
        }
    }
    Ok(())
}

fn run_screen(
    screen: Screen,
    data: Option<PathBuf>,
    config: &DashConfig,
    json_output: bool,
) -> Result<()> {
    let data_path = data.or_else(|| config.data.clone());
    let store = match data_path {
        Some(ref path) => RecordStore::load(path)
            .with_context(|| format!("Failed to load records: {}", path.display()))?,
        None => RecordStore::builtin().context("Built-in sample records are invalid")?,
    };
    let ctx = config.page_context();
    let mut outbox = Outbox::new();

    match screen {
        Screen::Login { email, password } => {
            let form = LoginForm { email, password };
            match form.submit() {
                Ok(next) => {
                    let page = page::resolve(&store, &next, &ctx);
                    if !json_output {
                        println!("Signed in.\n");
                    }
                    show_page(&next, false, &page, json_output)?;
                }
                Err(errors) => reject(&errors, json_output)?,
            }
        }

        Screen::Home => {
            let page = page::resolve(&store, &Route::Home, &ctx);
            show_page(&Route::Home, false, &page, json_output)?;
        }

        Screen::Calendar { month, offset } => {
            let anchor = match month {
                Some(m) => parse_month(&m)
                    .with_context(|| format!("Invalid month: {m}. Use YYYY-MM"))?,
                None => ctx.calendar_month,
            };
            let ctx = page::PageContext {
                calendar_month: shift_month(anchor, offset),
                ..ctx
            };
            let page = page::resolve(&store, &Route::Calendar, &ctx);
            show_page(&Route::Calendar, false, &page, json_output)?;
        }

        Screen::Day { date } => {
            let date = date.and_then(|d| match parse_date(&d) {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!("{e:#}; showing today");
                    None
                }
            });
            let route = Route::CalendarDay { date };
            let page = page::resolve(&store, &route, &ctx);
            show_page(&route, false, &page, json_output)?;
        }

        Screen::Meeting { id } => {
            let route = Route::Meeting { id };
            let page = page::resolve(&store, &route, &ctx);
            show_page(&route, false, &page, json_output)?;
        }

        Screen::Projects {
            project,
            meeting_type,
        } => {
            let filter = match meeting_type.as_deref() {
                Some(t) => TypeFilter::from_str(t).with_context(|| {
                    format!(
                        "Unknown meeting type: {t}. Use: all, {}",
                        MeetingType::ALL
                            .iter()
                            .map(|t| t.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                })?,
                None => TypeFilter::All,
            };

            match project {
                Some(id) => {
                    let p = store
                        .project(&id)
                        .with_context(|| format!("Project not found: {id}"))?;
                    let detail = project_detail(&store, p, filter);
                    if json_output {
                        json_out::print_json(&detail)?;
                    } else {
                        table::print_project_detail(&detail);
                    }
                }
                None => {
                    let page = page::resolve(&store, &Route::Projects, &ctx);
                    show_page(&Route::Projects, false, &page, json_output)?;
                }
            }
        }

        Screen::Email {
            meeting_id,
            subject,
            send,
        } => {
            let route = Route::Email { meeting_id };
            let mut draft = match page::resolve(&store, &route, &ctx) {
                Page::Email(draft) => draft,
                other => return show_page(&route, false, &other, json_output),
            };
            if let Some(subject) = subject {
                draft.subject = subject;
            }
            if send {
                let outcome = EmailDraft::send(&draft, &mut outbox);
                show_outcome(&outcome, &outbox, json_output)?;
            } else {
                show_page(&route, false, &Page::Email(draft), json_output)?;
            }
        }

        Screen::Schedule {
            meeting_id,
            title,
            date,
            time,
            duration,
            attendees,
            confirm,
        } => {
            let route = Route::Schedule { meeting_id };
            let mut draft = match page::resolve(&store, &route, &ctx) {
                Page::Schedule(draft) => draft,
                other => return show_page(&route, false, &other, json_output),
            };
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(date) = date {
                draft.date = parse_date(&date)?;
            }
            if let Some(time) = time {
                draft.time = time;
            }
            if let Some(duration) = duration {
                draft.duration_minutes = duration;
            }
            if let Some(attendees) = attendees {
                draft.attendees = attendees;
            }

            if confirm {
                match ScheduleDraft::submit(&draft, &mut outbox) {
                    Ok(outcome) => show_outcome(&outcome, &outbox, json_output)?,
                    Err(errors) => reject(&errors, json_output)?,
                }
            } else {
                show_page(&route, false, &Page::Schedule(draft), json_output)?;
            }
        }

        Screen::Upload {
            audio,
            project,
            new_project,
            title,
            date,
            start,
            end,
            meeting_type,
            attendees,
            no_track,
            transcribe,
        } => {
            let meeting_type = MeetingType::from_str(&meeting_type)
                .with_context(|| format!("Unknown meeting type: {meeting_type}"))?;
            let audio = match audio {
                Some(path) => {
                    let file = AudioFile::from_path(&path)
                        .with_context(|| format!("Cannot read {}", path.display()))?;
                    if file.is_none() {
                        warn!(path = %path.display(), "not an .mp3 or .wav file, ignoring");
                    }
                    file
                }
                None => None,
            };
            let date = date.as_deref().map(parse_date).transpose()?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .context("Failed to start runtime")?;

            runtime.block_on(async {
                let mut session = UploadSession::new(config.progress_settings());
                if let Some(file) = audio {
                    if !json_output {
                        println!("Selected {} ({})", file.name, file.display_size());
                    }
                    session.select_file(file);
                }
                session.form.project = match (project, new_project) {
                    (Some(id), _) => ProjectChoice::Existing(id),
                    (None, Some(name)) => ProjectChoice::New(name),
                    (None, None) => ProjectChoice::Unset,
                };
                session.form.title = title;
                session.form.date = date;
                session.form.start_time = start;
                session.form.end_time = end;
                session.form.meeting_type = meeting_type;
                session.form.attendees = attendees;
                session.form.track_in_calendar = !no_track;

                let errors = session.form.validate(&store);
                if !errors.is_empty() {
                    session.remove_file();
                    return reject(&errors, json_output);
                }

                if let Some(progress) = session.upload() {
                    let mut rx = progress.subscribe();
                    while rx.changed().await.is_ok() {
                        let percent = *rx.borrow_and_update();
                        if !json_output {
                            println!("  uploading... {percent:>3}%");
                        }
                        if percent >= 100 {
                            break;
                        }
                    }
                    progress.finished().await;
                }

                match session.form.submit(&store, transcribe, &mut outbox) {
                    Ok(outcome) => show_outcome(&outcome, &outbox, json_output),
                    Err(errors) => reject(&errors, json_output),
                }
            })?;
        }

        Screen::Open { path } => {
            let mut nav = Navigator::new();
            let resolved = nav.go(&path);
            let page = page::resolve(&store, &resolved.route, &ctx);
            show_page(&resolved.route, resolved.redirected, &page, json_output)?;
        }

        Screen::Approve { action_id } => {
            let outcome = actions::approve(&store, &action_id, &mut outbox)
                .with_context(|| format!("Action not found: {action_id}"))?;
            show_outcome(&outcome, &outbox, json_output)?;
        }

        Screen::Complete { action_id } => {
            let outcome = actions::complete(&store, &action_id, &mut outbox)
                .with_context(|| format!("Action not found: {action_id}"))?;
            show_outcome(&outcome, &outbox, json_output)?;
        }

        Screen::Stats => {
            let stats = store.stats();
            if json_output {
                json_out::print_json(&stats)?;
            } else {
                table::print_stats(&stats);
            }
        }

        Screen::Info => {
            let source = data_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in sample".to_string());
            let config_file = config::config_path()?;

            if json_output {
                json_out::print_json(&serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "data": source,
                    "config": config_file.display().to_string(),
                    "config_exists": config_file.exists(),
                    "today": ctx.today,
                    "projects": store.projects().len(),
                    "meetings": store.meetings().len(),
                }))?;
            } else {
                println!("meetdash v{}", env!("CARGO_PKG_VERSION"));
                println!("  Data:     {source}");
                println!(
                    "  Config:   {}{}",
                    config_file.display(),
                    if config_file.exists() { "" } else { " (not created)" }
                );
                println!("  Today:    {}", ctx.today);
                println!("  Projects: {}", store.projects().len());
                println!("  Meetings: {}", store.meetings().len());
            }
        }
    }

    if !outbox.is_empty() {
        info!(intents = outbox.len(), "session finished");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_apart_from_screens() {
        let cli = Cli::try_parse_from(["meetdash", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));

        let cli = Cli::try_parse_from(["meetdash", "--json", "meeting", "meet-1"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Screen(Screen::Meeting { ref id }) if id == "meet-1"
        ));
    }
}
