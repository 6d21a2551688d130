use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Every screen the app can show, addressed by a URL-style path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Login,
    Home,
    Calendar,
    /// `None` when the query carried no usable date; the day view then
    /// shows "today".
    CalendarDay { date: Option<NaiveDate> },
    Meeting { id: String },
    UploadMeeting,
    Projects,
    Email { meeting_id: String },
    Schedule { meeting_id: String },
}

/// Outcome of resolving a typed-in path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub route: Route,
    /// The path was unknown and the app fell back to login.
    pub redirected: bool,
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (k == key).then_some(v)
    })
}

impl Route {
    /// Parse a path such as `/meeting/meet-1` or `/calendar/day?date=2026-02-05`.
    /// Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let route = match segments.as_slice() {
            [""] => Route::Login,
            ["home"] => Route::Home,
            ["calendar"] => Route::Calendar,
            ["calendar", "day"] => Route::CalendarDay {
                date: query_param(query, "date")
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            },
            ["meeting", id] if !id.is_empty() => Route::Meeting { id: id.to_string() },
            ["upload-meeting"] => Route::UploadMeeting,
            ["projects"] => Route::Projects,
            ["email", id] if !id.is_empty() => Route::Email {
                meeting_id: id.to_string(),
            },
            ["schedule", id] if !id.is_empty() => Route::Schedule {
                meeting_id: id.to_string(),
            },
            _ => return None,
        };
        Some(route)
    }

    /// Parse, redirecting anything unknown to the login screen.
    pub fn resolve(path: &str) -> Resolved {
        match Route::parse(path) {
            Some(route) => Resolved {
                route,
                redirected: false,
            },
            None => Resolved {
                route: Route::Login,
                redirected: true,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Home => "/home".to_string(),
            Route::Calendar => "/calendar".to_string(),
            Route::CalendarDay { date: Some(d) } => format!("/calendar/day?date={d}"),
            Route::CalendarDay { date: None } => "/calendar/day".to_string(),
            Route::Meeting { id } => format!("/meeting/{id}"),
            Route::UploadMeeting => "/upload-meeting".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Email { meeting_id } => format!("/email/{meeting_id}"),
            Route::Schedule { meeting_id } => format!("/schedule/{meeting_id}"),
        }
    }

    /// Screens that render inside the sidebar layout.
    pub fn has_sidebar(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_route() {
        assert_eq!(Route::parse("/"), Some(Route::Login));
        assert_eq!(Route::parse("/home"), Some(Route::Home));
        assert_eq!(Route::parse("/calendar/"), Some(Route::Calendar));
        assert_eq!(
            Route::parse("/calendar/day?date=2026-02-05"),
            Some(Route::CalendarDay {
                date: NaiveDate::from_ymd_opt(2026, 2, 5)
            })
        );
        assert_eq!(
            Route::parse("/meeting/meet-1"),
            Some(Route::Meeting { id: "meet-1".into() })
        );
        assert_eq!(Route::parse("/upload-meeting"), Some(Route::UploadMeeting));
        assert_eq!(Route::parse("/projects"), Some(Route::Projects));
        assert_eq!(
            Route::parse("/email/meet-2"),
            Some(Route::Email {
                meeting_id: "meet-2".into()
            })
        );
        assert_eq!(
            Route::parse("/schedule/meet-2"),
            Some(Route::Schedule {
                meeting_id: "meet-2".into()
            })
        );
    }

    #[test]
    fn day_route_without_valid_date() {
        assert_eq!(
            Route::parse("/calendar/day"),
            Some(Route::CalendarDay { date: None })
        );
        assert_eq!(
            Route::parse("/calendar/day?date=tomorrow"),
            Some(Route::CalendarDay { date: None })
        );
        assert_eq!(
            Route::parse("/calendar/day?view=compact&date=2026-02-04"),
            Some(Route::CalendarDay {
                date: NaiveDate::from_ymd_opt(2026, 2, 4)
            })
        );
    }

    #[test]
    fn unknown_paths_redirect_to_login() {
        for path in ["/settings", "/meeting", "/meeting/a/b", "/email/", "nonsense"] {
            let resolved = Route::resolve(path);
            assert_eq!(resolved.route, Route::Login, "{path}");
            assert!(resolved.redirected, "{path}");
        }
        assert!(!Route::resolve("/").redirected);
    }

    #[test]
    fn paths_round_trip() {
        for path in [
            "/",
            "/home",
            "/calendar/day?date=2026-02-05",
            "/meeting/meet-4",
            "/schedule/meet-1",
        ] {
            assert_eq!(Route::parse(path).unwrap().path(), path);
        }
    }
}
