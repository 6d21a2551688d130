use chrono::NaiveDate;
use serde::Serialize;

use crate::store::models::{Action, Meeting, MeetingType};
use crate::store::Repository;

/// Meeting-type filter used by the projects screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(MeetingType),
}

impl TypeFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Some(TypeFilter::All);
        }
        MeetingType::from_str(s).map(TypeFilter::Only)
    }

    pub fn matches(&self, t: MeetingType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(only) => *only == t,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectGroup<'a> {
    pub project_id: &'a str,
    pub actions: Vec<&'a Action>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeBucket<'a> {
    pub meeting_type: MeetingType,
    pub meetings: Vec<&'a Meeting>,
}

/// Meetings whose stored date is exactly `date`.
pub fn meetings_on_date(repo: &dyn Repository, date: NaiveDate) -> Vec<&Meeting> {
    repo.meetings().iter().filter(|m| m.date == date).collect()
}

/// Narrow a day's meetings to those starting within `hour` (0..=23).
pub fn meetings_in_hour<'a>(day_meetings: &[&'a Meeting], hour: u32) -> Vec<&'a Meeting> {
    day_meetings
        .iter()
        .filter(|m| m.time.hour() == hour)
        .copied()
        .collect()
}

/// Partition actions by project, keeping projects in first-seen order.
pub fn group_by_project<'a>(actions: &[&'a Action]) -> Vec<ProjectGroup<'a>> {
    let mut groups: Vec<ProjectGroup<'a>> = Vec::new();
    for &action in actions {
        match groups
            .iter_mut()
            .find(|g| g.project_id == action.project_id)
        {
            Some(group) => group.actions.push(action),
            None => groups.push(ProjectGroup {
                project_id: &action.project_id,
                actions: vec![action],
            }),
        }
    }
    groups
}

/// Filter by type, then bucket into the five known types. Every bucket is
/// present (possibly empty), in [`MeetingType::ALL`] order.
pub fn group_by_type<'a>(meetings: &[&'a Meeting], filter: TypeFilter) -> Vec<TypeBucket<'a>> {
    MeetingType::ALL
        .iter()
        .map(|t| TypeBucket {
            meeting_type: *t,
            meetings: meetings
                .iter()
                .filter(|m| m.meeting_type == *t && filter.matches(m.meeting_type))
                .copied()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn meetings_on_date_is_exact() {
        let store = RecordStore::builtin().unwrap();
        let ids: Vec<_> = meetings_on_date(&store, date("2026-02-05"))
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, ["meet-1", "meet-6", "meet-7"]);
        assert!(meetings_on_date(&store, date("2026-02-07")).is_empty());
    }

    #[test]
    fn meetings_in_hour_uses_24_hour_clock() {
        let store = RecordStore::builtin().unwrap();
        let day = meetings_on_date(&store, date("2026-02-05"));
        assert_eq!(meetings_in_hour(&day, 10)[0].id, "meet-1");
        assert_eq!(meetings_in_hour(&day, 14)[0].id, "meet-6");
        assert_eq!(meetings_in_hour(&day, 16)[0].id, "meet-7");
        assert!(meetings_in_hour(&day, 2).is_empty());
        assert!(meetings_in_hour(&day, 4).is_empty());
    }

    #[test]
    fn group_by_project_keeps_first_seen_order() {
        let store = RecordStore::builtin().unwrap();
        let m1 = store.meeting("meet-1").unwrap();
        let m3 = store.meeting("meet-3").unwrap();
        let actions = vec![
            &m3.action_items[0],
            &m1.action_items[0],
            &m3.action_items[1],
            &m1.action_items[1],
        ];
        let groups = group_by_project(&actions);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].project_id, "proj-3");
        assert_eq!(groups[1].project_id, "proj-1");
        let ids: Vec<_> = groups[0].actions.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["action-5", "action-6"]);
    }

    #[test]
    fn group_by_type_has_all_buckets() {
        let store = RecordStore::builtin().unwrap();
        let proj1: Vec<&Meeting> = store
            .meetings()
            .iter()
            .filter(|m| m.project_id == "proj-1")
            .collect();

        let buckets = group_by_type(&proj1, TypeFilter::All);
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].meeting_type, MeetingType::WeeklyUpdate);
        assert_eq!(buckets[0].meetings.len(), 1);
        assert_eq!(buckets[2].meeting_type, MeetingType::Planning);
        assert_eq!(buckets[2].meetings.len(), 1);
        assert_eq!(buckets[3].meetings.len(), 1);
        assert!(buckets[1].meetings.is_empty());

        let reviews = group_by_type(&proj1, TypeFilter::Only(MeetingType::Review));
        let total: usize = reviews.iter().map(|b| b.meetings.len()).sum();
        assert_eq!(total, 1);
        assert_eq!(reviews[3].meetings[0].id, "meet-6");
    }

    #[test]
    fn type_filter_parsing() {
        assert_eq!(TypeFilter::from_str("ALL"), Some(TypeFilter::All));
        assert_eq!(
            TypeFilter::from_str("standup"),
            Some(TypeFilter::Only(MeetingType::Standup))
        );
        assert_eq!(TypeFilter::from_str("offsite"), None);
    }
}
