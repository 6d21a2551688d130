use chrono::Datelike;
use unicode_width::UnicodeWidthStr;

use crate::flows::email::{short_date, EmailDraft};
use crate::flows::schedule::ScheduleDraft;
use crate::flows::{FieldErrors, Outcome};
use crate::nav::page::{MeetingDetail, Page};
use crate::nav::route::Route;
use crate::store::models::*;
use crate::views::calendar::{DaySchedule, MonthGrid};
use crate::views::{Dashboard, ProjectDetail, ProjectSummary};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn print_actions(actions: &[&Action]) {
    println!(
        "  {:<10} {:<46} {:<8} {:<18} {:<10}",
        "ID", "ACTION", "KIND", "ASSIGNED", "DUE"
    );
    println!("  {}", "-".repeat(94));
    for a in actions {
        println!(
            "  {:<10} {:<46} {:<8} {:<18} {:<10}",
            a.id,
            truncate(&a.description, 44),
            a.kind.as_str(),
            truncate(a.assigned_to.as_deref().unwrap_or("-"), 16),
            short_date(a.due_date),
        );
        if a.status != ActionStatus::Pending {
            println!("  {:<10} status: {}", "", a.status.as_str());
        }
    }
}

pub fn print_dashboard(dash: &Dashboard) {
    let open = dash.open_action_count();
    println!("Pending actions ({open})\n");
    if dash.action_groups.is_empty() {
        println!("  Nothing pending.\n");
    }
    for group in &dash.action_groups {
        let name = group.project.map_or(group.project_id, |p| p.name.as_str());
        println!("  {name} ({})", group.actions.len());
        print_actions(&group.actions);
        println!();
    }

    println!("Tracked follow-ups ({})\n", dash.follow_ups.len());
    for f in &dash.follow_ups {
        println!("  {:<12} {}", f.id, truncate(&f.description, 70));
        println!("  {:<12} meeting: {}", "", f.meeting_id);
    }
    if !dash.follow_ups.is_empty() {
        println!();
    }

    println!("On hold ({})\n", dash.held_items.len());
    for h in &dash.held_items {
        let item = &h.item;
        println!("  {:<12} {}", item.action_id, truncate(item.description, 70));
        println!("  {:<12} project: {}", "", h.project_name());
        println!(
            "  {:<12} {} (since {})",
            "",
            truncate(item.reason, 60),
            short_date(item.blocked_since)
        );
    }
}

pub fn print_month_grid(grid: &MonthGrid) {
    println!("{}\n", grid.label);
    println!(
        "  {}",
        WEEKDAYS
            .iter()
            .map(|d| format!("{d:<7}"))
            .collect::<String>()
    );
    for week in grid.cells.chunks(7) {
        let line: String = week
            .iter()
            .map(|c| {
                if !c.in_month {
                    return format!("{:<7}", "");
                }
                let mark = match (c.is_today, c.meetings) {
                    (true, 0) => "*".to_string(),
                    (true, n) => format!("*{n}"),
                    (false, 0) => String::new(),
                    (false, n) => format!("+{n}"),
                };
                format!("{:<7}", format!("{:>2}{mark}", c.date.day()))
            })
            .collect();
        println!("  {}", line.trim_end());
    }
    let days = grid.clickable().count();
    println!(
        "\n  {days} day{} with meetings (+N meetings, * today)",
        plural(days)
    );
}

pub fn print_day_schedule(day: &DaySchedule) {
    println!(
        "{} ({} meeting{})\n",
        day.date.format("%A, %B %-d, %Y"),
        day.total,
        plural(day.total)
    );
    for slot in &day.slots {
        if slot.meetings.is_empty() {
            println!("  {:>8} |", slot.label);
            continue;
        }
        for (i, m) in slot.meetings.iter().enumerate() {
            let label = if i == 0 { slot.label.as_str() } else { "" };
            println!(
                "  {:>8} | {:<8} {:<40} {}",
                label,
                m.time.to_string(),
                truncate(&m.title, 38),
                m.id
            );
        }
    }
    if !day.outside_hours.is_empty() {
        println!("\n  Outside shown hours:");
        for m in &day.outside_hours {
            println!(
                "  {:>8}   {:<8} {:<40} {}",
                "",
                m.time.to_string(),
                truncate(&m.title, 38),
                m.id
            );
        }
    }
}

fn print_meeting_header(detail: &MeetingDetail) {
    let m = detail.meeting;
    println!("{}\n", m.title);
    println!(
        "  Project:   {}",
        detail.project.map_or(m.project_id.as_str(), |p| p.name.as_str())
    );
    println!("  Date:      {} {}", m.date.format("%A, %B %-d, %Y"), m.time);
    println!("  Type:      {}", m.meeting_type);
    println!("  Attendees: {}", m.attendees.join(", "));
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}\n");
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {item}", i + 1);
    }
}

pub fn print_meeting_detail(detail: &MeetingDetail) {
    let m = detail.meeting;
    print_meeting_header(detail);
    if let Some(ref summary) = m.summary {
        println!("\nSummary\n\n  {summary}");
    }
    print_list("Key decisions", &m.decisions);
    print_list("Problem statements", &m.problem_statements);
    if !m.action_items.is_empty() {
        println!("\nAction items\n");
        let actions: Vec<&Action> = m.action_items.iter().collect();
        print_actions(&actions);
    }
    if !m.follow_ups.is_empty() {
        println!("\nFollow-ups\n");
        for f in &m.follow_ups {
            println!("  {:<12} {}", f.id, f.description);
        }
    }
    if let Some(ref transcript) = m.transcript {
        println!("\nTranscript\n");
        for line in transcript.lines().filter(|l| !l.trim().is_empty()) {
            println!("  {}", line.trim());
        }
    }
}

pub fn print_meeting_pending(detail: &MeetingDetail) {
    print_meeting_header(detail);
    println!("\n  This meeting has not occurred yet.");
    println!("  Summary, decisions and action items appear once it is recorded.");
}

pub fn print_not_found(id: &str) {
    println!("Meeting not found: {id}");
    println!("  Back to calendar: {}", Route::Calendar);
}

pub fn print_projects(summaries: &[ProjectSummary]) {
    if summaries.is_empty() {
        println!("No projects.");
        return;
    }
    println!(
        "  {:<10} {:<28} {:<9} {:<6} {:<8}",
        "ID", "PROJECT", "MEETINGS", "OPEN", "PENDING"
    );
    println!("  {}", "-".repeat(65));
    for s in summaries {
        println!(
            "  {:<10} {:<28} {:<9} {:<6} {:<8}",
            s.project.id,
            truncate(&s.project.name, 26),
            s.meetings,
            s.open_actions,
            s.pending_actions
        );
        println!("  {:<10} {}", "", truncate(&s.project.description, 54));
        for m in &s.recent {
            println!(
                "  {:<10} {:<10} {}  {}",
                "",
                m.id,
                short_date(m.date),
                truncate(&m.title, 40)
            );
        }
    }
}

pub fn print_project_detail(detail: &ProjectDetail) {
    let p = detail.project;
    println!("{}\n", p.name);
    println!("  {}", p.description);
    println!(
        "  {} action{}, {} pending",
        detail.actions.len(),
        plural(detail.actions.len()),
        detail.pending_actions
    );
    if let Some(t) = detail.filter {
        println!("  Filter: {t}");
    }

    println!("\nRecent meetings\n");
    if detail.recent.is_empty() {
        println!("  None.");
    }
    for m in &detail.recent {
        println!(
            "  {:<8} {:<10} {:<8} {:<40}",
            m.id,
            short_date(m.date),
            m.time.to_string(),
            truncate(&m.title, 38)
        );
    }

    println!("\nBy type\n");
    for bucket in &detail.buckets {
        println!("  {:<14} {}", bucket.meeting_type.to_string(), bucket.meetings.len());
        for m in &bucket.meetings {
            println!("  {:<14}   {} {}", "", m.id, truncate(&m.title, 50));
        }
    }

    if !detail.actions.is_empty() {
        println!("\nActions\n");
        print_actions(&detail.actions);
    }
    if !detail.decisions.is_empty() {
        println!("\nDecisions\n");
        for d in &detail.decisions {
            println!("  - {d}");
        }
    }
}

pub fn print_upload_projects(projects: &[Project]) {
    println!("Upload meeting\n");
    println!("  Existing projects (--project <id>) or --new-project <name>:");
    for p in projects {
        println!("    {:<10} {}", p.id, p.name);
    }
    println!(
        "\n  Meeting types: {}",
        MeetingType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

pub fn print_email_draft(draft: &EmailDraft) {
    println!("To:      {}", draft.recipients.join(", "));
    println!("Subject: {}\n", draft.subject);
    for line in draft.body.lines() {
        println!("  {line}");
    }
}

pub fn print_schedule_draft(draft: &ScheduleDraft) {
    println!("Title:     {}", draft.title);
    println!("When:      {} {}", draft.date, draft.time);
    println!("Duration:  {} min", draft.duration_minutes);
    println!("Attendees: {}\n", draft.attendees);
    for line in draft.agenda.lines() {
        println!("  {line}");
    }
}

pub fn print_field_errors(errors: &FieldErrors) {
    println!(
        "{} field{} need attention:",
        errors.len(),
        plural(errors.len())
    );
    for (field, message) in errors.iter() {
        println!("  {:<10} {message}", field.as_str());
    }
}

pub fn print_outcome(outcome: &Outcome) {
    println!("{}", outcome.message);
    if let Some(id) = outcome.intent_id {
        println!("  intent: {id}");
    }
    println!("  next:   {}", outcome.next);
}

pub fn print_links(links: &[Route]) {
    if links.is_empty() {
        return;
    }
    println!("\nLinks:");
    for link in links {
        println!("  {link}");
    }
}

pub fn print_stats(stats: &StoreStats) {
    println!("Record store statistics:\n");
    println!("  Projects:    {}", stats.projects);
    println!(
        "  Meetings:    {} ({} completed, {} scheduled)",
        stats.meetings, stats.completed_meetings, stats.scheduled_meetings
    );
    println!(
        "  Actions:     {} ({} open)",
        stats.actions, stats.open_actions
    );
    println!("  Follow-ups:  {}", stats.follow_ups);
    println!("  On hold:     {}", stats.held_items);

    println!("\n  By type:");
    for t in &stats.types {
        println!("    {:<16} {}", t.meeting_type.to_string(), t.count);
    }
}

/// Render any page followed by its links.
pub fn print_page(page: &Page) {
    match page {
        Page::Login => {
            println!("Sign in");
            println!("  meetdash login --email <email> --password <password>");
        }
        Page::Home(dash) => print_dashboard(dash),
        Page::Calendar(grid) => print_month_grid(grid),
        Page::CalendarDay(day) => print_day_schedule(day),
        Page::Meeting(detail) => print_meeting_detail(detail),
        Page::MeetingPending(detail) => print_meeting_pending(detail),
        Page::MeetingNotFound { id } => print_not_found(id),
        Page::UploadMeeting { projects } => print_upload_projects(projects),
        Page::Projects(summaries) => print_projects(summaries),
        Page::Email(draft) => print_email_draft(draft),
        Page::Schedule(draft) => print_schedule_draft(draft),
    }
    if !matches!(page, Page::MeetingNotFound { .. }) {
        print_links(&page.links());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Q1 Planning Session", 10), "Q1 Plan...");
        assert_eq!(truncate("会議の議事録", 8), "会議...");
    }
}
