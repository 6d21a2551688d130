pub mod calendar;
pub mod filters;
pub mod time;

use serde::Serialize;

use crate::store::models::*;
use crate::store::Repository;
use filters::{group_by_project, group_by_type, TypeBucket, TypeFilter};

/// Actions still open (Pending or Blocked), in source order.
pub fn pending_actions(repo: &dyn Repository) -> Vec<&Action> {
    repo.meetings()
        .iter()
        .flat_map(|m| &m.action_items)
        .filter(|a| a.status.is_open())
        .collect()
}

/// Follow-ups still being tracked.
pub fn pending_follow_ups(repo: &dyn Repository) -> Vec<&FollowUp> {
    repo.meetings()
        .iter()
        .flat_map(|m| &m.follow_ups)
        .filter(|f| f.status == FollowUpStatus::Tracked)
        .collect()
}

/// Blocked actions that carry a hold, viewed as held items.
pub fn held_items(repo: &dyn Repository) -> Vec<HeldItem<'_>> {
    repo.meetings()
        .iter()
        .flat_map(|m| &m.action_items)
        .filter_map(HeldItem::from_action)
        .collect()
}

pub fn project_meetings<'a>(repo: &'a dyn Repository, project_id: &str) -> Vec<&'a Meeting> {
    repo.meetings()
        .iter()
        .filter(|m| m.project_id == project_id)
        .collect()
}

/// One card on the projects overview.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary<'a> {
    pub project: &'a Project,
    pub meetings: usize,
    pub open_actions: usize,
    pub pending_actions: usize,
    pub recent: Vec<&'a Meeting>,
}

/// The drill-down screen for a single project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail<'a> {
    pub project: &'a Project,
    pub filter: Option<MeetingType>,
    pub recent: Vec<&'a Meeting>,
    pub buckets: Vec<TypeBucket<'a>>,
    pub actions: Vec<&'a Action>,
    pub pending_actions: usize,
    pub decisions: Vec<&'a str>,
}

pub fn project_summary<'a>(repo: &'a dyn Repository, project: &'a Project) -> ProjectSummary<'a> {
    let meetings = project_meetings(repo, &project.id);
    let actions = meetings.iter().copied().flat_map(|m| &m.action_items);
    ProjectSummary {
        project,
        meetings: meetings.len(),
        open_actions: actions.clone().filter(|a| a.status.is_open()).count(),
        pending_actions: actions
            .filter(|a| a.status == ActionStatus::Pending)
            .count(),
        recent: meetings.iter().take(RECENT_MEETINGS).copied().collect(),
    }
}

pub fn project_summaries(repo: &dyn Repository) -> Vec<ProjectSummary<'_>> {
    repo.projects()
        .iter()
        .map(|p| project_summary(repo, p))
        .collect()
}

/// How many recent meetings the project screen lists.
const RECENT_MEETINGS: usize = 5;

pub fn project_detail<'a>(
    repo: &'a dyn Repository,
    project: &'a Project,
    filter: TypeFilter,
) -> ProjectDetail<'a> {
    let meetings = project_meetings(repo, &project.id);
    let actions: Vec<&Action> = meetings
        .iter()
        .copied()
        .flat_map(|m| &m.action_items)
        .collect();
    let decisions = meetings
        .iter()
        .copied()
        .flat_map(|m| m.decisions.iter().map(String::as_str))
        .collect();

    ProjectDetail {
        project,
        filter: match filter {
            TypeFilter::All => None,
            TypeFilter::Only(t) => Some(t),
        },
        recent: meetings.iter().take(RECENT_MEETINGS).copied().collect(),
        buckets: group_by_type(&meetings, filter),
        pending_actions: actions
            .iter()
            .filter(|a| a.status == ActionStatus::Pending)
            .count(),
        actions,
        decisions,
    }
}

/// A held item with its project looked up.
#[derive(Debug, Clone, Serialize)]
pub struct HeldEntry<'a> {
    #[serde(flatten)]
    pub item: HeldItem<'a>,
    pub project: Option<&'a Project>,
}

impl HeldEntry<'_> {
    /// Project name, or the raw id when the project is unknown.
    pub fn project_name(&self) -> &str {
        self.project.map_or(self.item.project_id, |p| p.name.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionGroup<'a> {
    pub project_id: &'a str,
    pub project: Option<&'a Project>,
    pub actions: Vec<&'a Action>,
}

/// Everything the home screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard<'a> {
    pub action_groups: Vec<ActionGroup<'a>>,
    pub follow_ups: Vec<&'a FollowUp>,
    pub held_items: Vec<HeldEntry<'a>>,
}

impl Dashboard<'_> {
    pub fn open_action_count(&self) -> usize {
        self.action_groups.iter().map(|g| g.actions.len()).sum()
    }
}

pub fn dashboard(repo: &dyn Repository) -> Dashboard<'_> {
    let pending = pending_actions(repo);
    let action_groups = group_by_project(&pending)
        .into_iter()
        .map(|g| ActionGroup {
            project_id: g.project_id,
            project: repo.project(g.project_id),
            actions: g.actions,
        })
        .collect();

    Dashboard {
        action_groups,
        follow_ups: pending_follow_ups(repo),
        held_items: held_items(repo)
            .into_iter()
            .map(|item| HeldEntry {
                project: repo.project(item.project_id),
                item,
            })
            .collect(),
    }
}
