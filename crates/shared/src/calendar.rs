//! Splits dated events into upcoming and previous lists and tracks the
//! "show more" window of the public events list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::EventRecord;

/// Number of events shown before the first "show more", and the step of
/// every expansion.
pub const PAGE_STEP: usize = 6;

/// Resolves an event date to an instant. Date-only values are midnight UTC.
pub fn event_instant(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPartition {
    /// Soonest first.
    pub upcoming: Vec<EventRecord>,
    /// Most recent first.
    pub previous: Vec<EventRecord>,
}

impl EventPartition {
    pub fn tab(&self, tab: EventTab) -> &[EventRecord] {
        match tab {
            EventTab::Upcoming => &self.upcoming,
            EventTab::Previous => &self.previous,
        }
    }
}

/// Events dated at or after `now` are upcoming, earlier ones previous.
/// Events whose date does not parse land in neither list.
pub fn partition(events: &[EventRecord], now: DateTime<Utc>) -> EventPartition {
    let mut upcoming = Vec::new();
    let mut previous = Vec::new();

    for event in events {
        let Some(at) = event_instant(&event.date) else {
            continue;
        };
        if at >= now {
            upcoming.push((at, event.clone()));
        } else {
            previous.push((at, event.clone()));
        }
    }

    upcoming.sort_by(|a, b| a.0.cmp(&b.0));
    previous.sort_by(|a, b| b.0.cmp(&a.0));

    EventPartition {
        upcoming: upcoming.into_iter().map(|(_, event)| event).collect(),
        previous: previous.into_iter().map(|(_, event)| event).collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTab {
    #[default]
    Upcoming,
    Previous,
}

/// Tab selection plus the capped window over the active partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventListView {
    tab: EventTab,
    visible_count: usize,
}

impl Default for EventListView {
    fn default() -> Self {
        Self {
            tab: EventTab::Upcoming,
            visible_count: PAGE_STEP,
        }
    }
}

impl EventListView {
    pub fn tab(&self) -> EventTab {
        self.tab
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Switching tabs always collapses the window, even when the same tab is
    /// selected again.
    pub fn select_tab(&mut self, tab: EventTab) {
        self.tab = tab;
        self.visible_count = PAGE_STEP;
    }

    pub fn show_more(&mut self) {
        self.visible_count += PAGE_STEP;
    }

    pub fn visible<'a>(&self, events: &'a EventPartition) -> &'a [EventRecord] {
        let active = events.tab(self.tab);
        &active[..active.len().min(self.visible_count)]
    }

    pub fn has_more(&self, events: &EventPartition) -> bool {
        self.visible_count < events.tab(self.tab).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(title: &str, date: &str) -> EventRecord {
        EventRecord {
            title: title.into(),
            date: date.into(),
            ..EventRecord::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn splits_around_now() {
        let events = vec![event("old", "2024-01-01"), event("new", "2030-01-01")];
        let parts = partition(&events, now());
        assert_eq!(parts.upcoming, vec![event("new", "2030-01-01")]);
        assert_eq!(parts.previous, vec![event("old", "2024-01-01")]);
    }

    #[test]
    fn event_exactly_at_now_is_upcoming() {
        let parts = partition(&[event("today", "2025-01-01")], now());
        assert_eq!(parts.upcoming.len(), 1);
        assert!(parts.previous.is_empty());
    }

    #[test]
    fn unparsable_dates_are_in_neither_partition() {
        let events = vec![
            event("blank", ""),
            event("garbage", "next tuesday"),
            event("ok", "2026-06-01"),
        ];
        let parts = partition(&events, now());
        assert_eq!(parts.upcoming.len() + parts.previous.len(), 1);
        assert_eq!(parts.upcoming[0].title, "ok");
    }

    #[test]
    fn partitions_are_sorted_in_opposite_directions() {
        let events = vec![
            event("u2", "2027-03-01"),
            event("p1", "2023-05-01"),
            event("u1", "2025-02-01"),
            event("p2", "2024-12-31"),
            event("u3", "2027-03-01T18:30:00Z"),
        ];
        let parts = partition(&events, now());
        let upcoming: Vec<_> = parts.upcoming.iter().map(|e| e.title.as_str()).collect();
        let previous: Vec<_> = parts.previous.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(upcoming, ["u1", "u2", "u3"]);
        assert_eq!(previous, ["p2", "p1"]);
    }

    #[test]
    fn window_grows_by_six_and_resets_on_tab_change() {
        let events: Vec<_> = (1..=14)
            .map(|day| event(&format!("e{day}"), &format!("2026-01-{day:02}")))
            .collect();
        let parts = partition(&events, now());

        let mut view = EventListView::default();
        assert_eq!(view.visible_count(), 6);
        assert_eq!(view.visible(&parts).len(), 6);
        assert!(view.has_more(&parts));

        view.show_more();
        assert_eq!(view.visible_count(), 12);
        view.show_more();
        assert_eq!(view.visible_count(), 18);
        assert_eq!(view.visible(&parts).len(), 14);
        assert!(!view.has_more(&parts));

        view.select_tab(EventTab::Previous);
        assert_eq!(view.visible_count(), 6);
        assert!(view.visible(&parts).is_empty());

        view.show_more();
        view.select_tab(EventTab::Previous);
        assert_eq!(view.visible_count(), 6);
    }
}
