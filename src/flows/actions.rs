use super::{IntentKind, Outbox, Outcome};
use crate::nav::route::Route;
use crate::store::models::{Action, ActionKind};
use crate::store::Repository;

pub fn find_action<'a>(repo: &'a dyn Repository, action_id: &str) -> Option<&'a Action> {
    repo.meetings()
        .iter()
        .flat_map(|m| &m.action_items)
        .find(|a| a.id == action_id)
}

/// Approve an action from the dashboard. The status is not changed; the
/// approval is only recorded. Email and meeting actions continue on their
/// meeting's detail screen, where the follow-up flows live.
pub fn approve(repo: &dyn Repository, action_id: &str, outbox: &mut Outbox) -> Option<Outcome> {
    let action = find_action(repo, action_id)?;
    let intent_id = outbox.record(IntentKind::ApproveAction {
        action_id: action.id.clone(),
    });
    let next = match action.kind {
        ActionKind::Email | ActionKind::Meeting => Route::Meeting {
            id: action.meeting_id.clone(),
        },
        ActionKind::Task => Route::Home,
    };
    Some(Outcome {
        message: format!("Approved: {}", action.description),
        intent_id: Some(intent_id),
        next,
    })
}

/// Mark an action complete. Recorded only; the store is read-only.
pub fn complete(repo: &dyn Repository, action_id: &str, outbox: &mut Outbox) -> Option<Outcome> {
    let action = find_action(repo, action_id)?;
    let intent_id = outbox.record(IntentKind::CompleteAction {
        action_id: action.id.clone(),
    });
    Some(Outcome {
        message: format!("Completed: {}", action.description),
        intent_id: Some(intent_id),
        next: Route::Home,
    })
}
