use chrono::NaiveDate;
use serde::Serialize;

use super::route::Route;
use crate::flows::email::EmailDraft;
use crate::flows::schedule::{ScheduleDefaults, ScheduleDraft};
use crate::store::models::{Meeting, Project};
use crate::store::Repository;
use crate::views::calendar::{day_schedule, month_grid, DaySchedule, MonthGrid};
use crate::views::{dashboard, project_summaries, Dashboard, ProjectSummary};

/// Screen-independent settings a page needs to render.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub today: NaiveDate,
    /// Month shown when the calendar opens.
    pub calendar_month: NaiveDate,
    pub first_hour: u32,
    pub last_hour: u32,
    pub schedule: ScheduleDefaults,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingDetail<'a> {
    pub meeting: &'a Meeting,
    pub project: Option<&'a Project>,
}

/// A route rendered against the record store.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", content = "view", rename_all = "snake_case")]
pub enum Page<'a> {
    Login,
    Home(Dashboard<'a>),
    Calendar(MonthGrid),
    CalendarDay(DaySchedule<'a>),
    Meeting(MeetingDetail<'a>),
    /// Scheduled but nothing recorded yet; replaces the detail sections.
    MeetingPending(MeetingDetail<'a>),
    MeetingNotFound { id: String },
    UploadMeeting { projects: &'a [Project] },
    Projects(Vec<ProjectSummary<'a>>),
    Email(EmailDraft),
    Schedule(ScheduleDraft),
}

impl Page<'_> {
    /// In-page links (not counting the sidebar).
    pub fn links(&self) -> Vec<Route> {
        match self {
            Page::Login => vec![Route::Home],
            Page::Home(dash) => {
                let mut links = Vec::new();
                for group in &dash.action_groups {
                    for action in &group.actions {
                        let route = Route::Meeting {
                            id: action.meeting_id.clone(),
                        };
                        if !links.contains(&route) {
                            links.push(route);
                        }
                    }
                }
                links
            }
            Page::Calendar(grid) => {
                let mut links: Vec<Route> = grid
                    .clickable()
                    .map(|c| Route::CalendarDay { date: Some(c.date) })
                    .collect();
                links.push(Route::UploadMeeting);
                links
            }
            Page::CalendarDay(day) => {
                let mut links = vec![Route::Calendar];
                links.extend(
                    day.slots
                        .iter()
                        .flat_map(|s| &s.meetings)
                        .chain(&day.outside_hours)
                        .map(|m| Route::Meeting { id: m.id.clone() }),
                );
                links
            }
            Page::Meeting(detail) => vec![
                Route::Email {
                    meeting_id: detail.meeting.id.clone(),
                },
                Route::Schedule {
                    meeting_id: detail.meeting.id.clone(),
                },
            ],
            Page::MeetingPending(_) => vec![Route::Calendar],
            Page::MeetingNotFound { .. } => vec![Route::Calendar],
            Page::UploadMeeting { .. } => vec![Route::Calendar],
            Page::Projects(summaries) => summaries
                .iter()
                .flat_map(|s| &s.recent)
                .map(|m| Route::Meeting { id: m.id.clone() })
                .collect(),
            Page::Email(_) => vec![Route::Home],
            Page::Schedule(_) => vec![Route::Calendar],
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Login => "Sign in",
            Page::Home(_) => "Home",
            Page::Calendar(_) => "Calendar",
            Page::CalendarDay(_) => "Day view",
            Page::Meeting(d) | Page::MeetingPending(d) => &d.meeting.title,
            Page::MeetingNotFound { .. } => "Meeting not found",
            Page::UploadMeeting { .. } => "Upload meeting",
            Page::Projects(_) => "Projects",
            Page::Email(_) => "Send minutes of meeting",
            Page::Schedule(_) => "Schedule follow-up meeting",
        }
    }
}

fn meeting_page<'a>(repo: &'a dyn Repository, id: &str) -> Page<'a> {
    let Some(meeting) = repo.meeting(id) else {
        return Page::MeetingNotFound { id: id.to_string() };
    };
    let detail = MeetingDetail {
        meeting,
        project: repo.project(&meeting.project_id),
    };
    if meeting.has_not_occurred() {
        Page::MeetingPending(detail)
    } else {
        Page::Meeting(detail)
    }
}

/// Render `route` against the store. Never fails: unknown meetings become a
/// not-found page.
pub fn resolve<'a>(repo: &'a dyn Repository, route: &Route, ctx: &PageContext) -> Page<'a> {
    match route {
        Route::Login => Page::Login,
        Route::Home => Page::Home(dashboard(repo)),
        Route::Calendar => Page::Calendar(month_grid(repo, ctx.calendar_month, ctx.today)),
        Route::CalendarDay { date } => Page::CalendarDay(day_schedule(
            repo,
            date.unwrap_or(ctx.today),
            ctx.first_hour,
            ctx.last_hour,
        )),
        Route::Meeting { id } => meeting_page(repo, id),
        Route::UploadMeeting => Page::UploadMeeting {
            projects: repo.projects(),
        },
        Route::Projects => Page::Projects(project_summaries(repo)),
        Route::Email { meeting_id } => match repo.meeting(meeting_id) {
            Some(m) => Page::Email(EmailDraft::for_meeting(m)),
            None => Page::MeetingNotFound {
                id: meeting_id.clone(),
            },
        },
        Route::Schedule { meeting_id } => match repo.meeting(meeting_id) {
            Some(m) => Page::Schedule(ScheduleDraft::for_meeting(m, &ctx.schedule)),
            None => Page::MeetingNotFound {
                id: meeting_id.clone(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    fn ctx() -> PageContext {
        let today = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        PageContext {
            today,
            calendar_month: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            first_hour: 6,
            last_hour: 22,
            schedule: ScheduleDefaults {
                date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                time: "10:00".into(),
                duration_minutes: 60,
            },
        }
    }

    #[test]
    fn unknown_meeting_is_not_found() {
        let store = RecordStore::builtin().unwrap();
        let page = resolve(&store, &Route::Meeting { id: "meet-99".into() }, &ctx());
        assert!(matches!(page, Page::MeetingNotFound { ref id } if id == "meet-99"));
        assert_eq!(page.links(), vec![Route::Calendar]);
    }

    #[test]
    fn scheduled_meeting_is_pending() {
        let store = RecordStore::builtin().unwrap();
        let page = resolve(&store, &Route::Meeting { id: "meet-4".into() }, &ctx());
        assert!(matches!(page, Page::MeetingPending(_)));

        let page = resolve(&store, &Route::Meeting { id: "meet-1".into() }, &ctx());
        let Page::Meeting(detail) = &page else {
            panic!("expected meeting detail");
        };
        assert_eq!(detail.project.map(|p| p.id.as_str()), Some("proj-1"));
        assert_eq!(page.links().len(), 2);
    }

    #[test]
    fn forms_for_unknown_meeting_are_not_found() {
        let store = RecordStore::builtin().unwrap();
        for route in [
            Route::Email {
                meeting_id: "nope".into(),
            },
            Route::Schedule {
                meeting_id: "nope".into(),
            },
        ] {
            assert!(matches!(
                resolve(&store, &route, &ctx()),
                Page::MeetingNotFound { .. }
            ));
        }
    }

    #[test]
    fn day_without_date_uses_today() {
        let store = RecordStore::builtin().unwrap();
        let page = resolve(&store, &Route::CalendarDay { date: None }, &ctx());
        let Page::CalendarDay(day) = page else {
            panic!("expected day view");
        };
        assert_eq!(day.date, ctx().today);
    }

    #[test]
    fn home_links_each_meeting_once() {
        let store = RecordStore::builtin().unwrap();
        let links = resolve(&store, &Route::Home, &ctx()).links();
        let mut deduped = links.clone();
        deduped.dedup();
        assert_eq!(links.len(), deduped.len());
        assert!(links.iter().all(|r| matches!(r, Route::Meeting { .. })));
    }

    #[test]
    fn projects_link_to_recent_meetings() {
        let store = RecordStore::builtin().unwrap();
        let links = resolve(&store, &Route::Projects, &ctx()).links();
        assert_eq!(links.len(), 7);
        assert!(links.contains(&Route::Meeting {
            id: "meet-1".into()
        }));
        assert!(links
            .iter()
            .all(|to| crate::nav::can_link(&Route::Projects, to)));
    }

    #[test]
    fn schedule_form_leads_to_calendar() {
        let store = RecordStore::builtin().unwrap();
        let route = Route::Schedule {
            meeting_id: "meet-2".into(),
        };
        assert_eq!(resolve(&store, &route, &ctx()).links(), vec![Route::Calendar]);
    }
}
