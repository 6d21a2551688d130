use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use super::filters::{meetings_in_hour, meetings_on_date};
use super::time::hour_label;
use crate::store::models::{Meeting, MeetingStatus};
use crate::store::Repository;

/// Six weeks, Sunday first.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub meetings: usize,
    pub has_completed: bool,
    pub has_scheduled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn first_of_month(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Cells that can open the day view (at least one meeting).
    pub fn clickable(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter(|c| c.meetings > 0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HourSlot<'a> {
    pub hour: u32,
    pub label: String,
    pub meetings: Vec<&'a Meeting>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySchedule<'a> {
    pub date: NaiveDate,
    pub total: usize,
    pub slots: Vec<HourSlot<'a>>,
    /// Meetings whose hour falls outside the visible slot range.
    pub outside_hours: Vec<&'a Meeting>,
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d").ok()
}

/// Move a month anchor forwards or backwards by whole months.
pub fn shift_month(month: NaiveDate, delta: i32) -> NaiveDate {
    let first = month.with_day(1).unwrap_or(month);
    let shifted = if delta >= 0 {
        first.checked_add_months(Months::new(delta as u32))
    } else {
        first.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(first)
}

/// Build the 42-cell month view containing `month`.
pub fn month_grid(repo: &dyn Repository, month: NaiveDate, today: NaiveDate) -> MonthGrid {
    let first = month.with_day(1).unwrap_or(month);
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first - Days::new(lead);

    let cells = start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| {
            let day = meetings_on_date(repo, date);
            DayCell {
                date,
                in_month: date.month() == first.month() && date.year() == first.year(),
                is_today: date == today,
                meetings: day.len(),
                has_completed: day.iter().any(|m| m.status == MeetingStatus::Completed),
                has_scheduled: day.iter().any(|m| m.status == MeetingStatus::Scheduled),
            }
        })
        .collect();

    MonthGrid {
        year: first.year(),
        month: first.month(),
        label: first.format("%B %Y").to_string(),
        cells,
    }
}

/// Bucket one day's meetings into hourly slots `first_hour..=last_hour`.
pub fn day_schedule(
    repo: &dyn Repository,
    date: NaiveDate,
    first_hour: u32,
    last_hour: u32,
) -> DaySchedule<'_> {
    let day = meetings_on_date(repo, date);
    let last_hour = last_hour.min(23);

    let slots = (first_hour..=last_hour)
        .map(|hour| HourSlot {
            hour,
            label: hour_label(hour),
            meetings: meetings_in_hour(&day, hour),
        })
        .collect();

    let outside_hours = day
        .iter()
        .filter(|m| !(first_hour..=last_hour).contains(&m.time.hour()))
        .copied()
        .collect();

    DaySchedule {
        date,
        total: day.len(),
        slots,
        outside_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn february_2026_grid() {
        let store = RecordStore::builtin().unwrap();
        let grid = month_grid(&store, date("2026-02-14"), date("2026-02-05"));
        assert_eq!(grid.label, "February 2026");
        assert_eq!(grid.cells.len(), GRID_CELLS);
        // Feb 1 2026 is a Sunday, so the grid starts on it.
        assert_eq!(grid.cells[0].date, date("2026-02-01"));
        assert!(grid.cells[0].in_month);
        assert!(!grid.cells[28].in_month);

        let feb5 = &grid.cells[4];
        assert_eq!(feb5.meetings, 3);
        assert!(feb5.is_today);
        assert!(feb5.has_completed);

        let feb6 = &grid.cells[5];
        assert!(feb6.has_scheduled);
        assert!(!feb6.has_completed);

        assert_eq!(grid.clickable().count(), 4);
    }

    #[test]
    fn grid_leads_with_previous_month() {
        let store = RecordStore::builtin().unwrap();
        // Jan 1 2026 is a Thursday.
        let grid = month_grid(&store, date("2026-01-01"), date("2026-02-05"));
        assert_eq!(grid.cells[0].date, date("2025-12-28"));
        assert!(!grid.cells[0].in_month);
        assert_eq!(grid.cells[4].date, date("2026-01-01"));
        let jan30 = grid.cells.iter().find(|c| c.date == date("2026-01-30")).unwrap();
        assert_eq!(jan30.meetings, 1);
    }

    #[test]
    fn day_schedule_default_range() {
        let store = RecordStore::builtin().unwrap();
        let day = day_schedule(&store, date("2026-02-05"), 6, 22);
        assert_eq!(day.slots.len(), 17);
        assert_eq!(day.total, 3);
        let ten = day.slots.iter().find(|s| s.hour == 10).unwrap();
        assert_eq!(ten.label, "10:00 AM");
        assert_eq!(ten.meetings[0].id, "meet-1");
        assert!(day.outside_hours.is_empty());
    }

    #[test]
    fn day_schedule_reports_meetings_outside_range() {
        let store = RecordStore::builtin().unwrap();
        let day = day_schedule(&store, date("2026-02-05"), 9, 12);
        assert_eq!(day.slots.len(), 4);
        let outside: Vec<_> = day.outside_hours.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(outside, ["meet-6", "meet-7"]);
    }

    #[test]
    fn month_helpers() {
        assert_eq!(parse_month("2026-02"), Some(date("2026-02-01")));
        assert_eq!(parse_month("2026-13"), None);
        assert_eq!(shift_month(date("2026-01-15"), -1), date("2025-12-01"));
        assert_eq!(shift_month(date("2026-12-31"), 1), date("2027-01-01"));
    }
}
