//! Conversation list reconciliation
//!
//! The list is ordered most-recently-active first and holds each
//! conversation id at most once. It is populated from a full snapshot,
//! then mutated one inbound event at a time; a snapshot always fully
//! replaces local state (last-snapshot-wins).

use std::collections::HashSet;

use giglink_core::bus::MessageEvent;
use giglink_core::models::{ConversationSummary, LastMessage};

/// Result of applying one inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event was merged into an existing entry.
    Applied,
    /// The conversation is not in the local list. Nothing was mutated;
    /// the caller must refetch the snapshot, and the event itself is
    /// discarded (it will be reflected in the refreshed snapshot).
    ResyncRequired,
}

/// In-memory conversation list
#[derive(Debug, Clone, Default)]
pub struct ConversationList {
    entries: Vec<ConversationSummary>,
}

impl ConversationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with a snapshot
    ///
    /// The snapshot is authoritative. Should it ever carry a duplicated
    /// id, the first occurrence wins so the at-most-once invariant
    /// holds locally.
    pub fn replace(&mut self, snapshot: Vec<ConversationSummary>) {
        let mut seen = HashSet::new();
        self.entries = snapshot
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .collect();
    }

    /// Merge one inbound message event
    ///
    /// A known conversation gets the event's message as `last_message`,
    /// its unread counter bumped by one, and moves to the front; the
    /// relative order of all other entries is preserved. An unknown
    /// conversation is never constructed speculatively from the partial
    /// event payload (it lacks the order title and counterpart user).
    pub fn apply_event(&mut self, event: &MessageEvent) -> EventOutcome {
        let Some(pos) = self
            .entries
            .iter()
            .position(|c| c.id == event.conversation_id)
        else {
            return EventOutcome::ResyncRequired;
        };

        let mut entry = self.entries.remove(pos);
        entry.last_message = Some(LastMessage {
            content: event.message.content.clone(),
            created_at: event.message.created_at,
        });
        entry.unread_count = entry.unread_count.saturating_add(1);
        self.entries.insert(0, entry);
        EventOutcome::Applied
    }

    pub fn entries(&self) -> &[ConversationSummary] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ConversationSummary> {
        self.entries.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unread messages across all conversations
    pub fn total_unread(&self) -> u64 {
        self.entries.iter().map(|c| u64::from(c.unread_count)).sum()
    }
}

/// Case-insensitive substring filter over order title and counterpart
/// display name. An empty query returns the input unchanged.
pub fn filter_by_text(list: &[ConversationSummary], query: &str) -> Vec<ConversationSummary> {
    if query.is_empty() {
        return list.to_vec();
    }
    let needle = query.to_lowercase();
    list.iter()
        .filter(|c| {
            c.order_title.to_lowercase().contains(&needle)
                || c.other_user.display_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use giglink_core::models::Participant;

    fn summary(id: &str, title: &str, name: &str, unread: u32) -> ConversationSummary {
        ConversationSummary {
            id: id.to_string(),
            order_title: title.to_string(),
            other_user: Participant {
                display_name: name.to_string(),
                photo_url: None,
            },
            last_message: None,
            unread_count: unread,
        }
    }

    fn event(id: &str, content: &str) -> MessageEvent {
        MessageEvent::new(id, content, Utc.with_ymd_and_hms(2025, 11, 2, 12, 0, 0).unwrap())
    }

    fn ids(list: &ConversationList) -> Vec<&str> {
        list.entries().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_event_moves_entry_to_front_and_preserves_order() {
        let mut list = ConversationList::new();
        list.replace(vec![
            summary("a", "Logo Design", "Mara", 0),
            summary("b", "Copywriting", "Jonas", 0),
            summary("c", "SEO Audit", "Petra", 0),
        ]);

        assert_eq!(list.apply_event(&event("b", "hi")), EventOutcome::Applied);

        assert_eq!(ids(&list), vec!["b", "a", "c"]);
        let front = &list.entries()[0];
        assert_eq!(front.unread_count, 1);
        assert_eq!(front.last_message.as_ref().unwrap().content, "hi");
    }

    #[test]
    fn test_each_id_stays_unique_and_latest_is_front() {
        let mut list = ConversationList::new();
        list.replace(vec![
            summary("a", "A", "A", 0),
            summary("b", "B", "B", 0),
            summary("c", "C", "C", 0),
        ]);

        for id in ["b", "c", "b", "a", "b"] {
            assert_eq!(list.apply_event(&event(id, "m")), EventOutcome::Applied);
        }

        assert_eq!(list.len(), 3);
        assert_eq!(ids(&list)[0], "b");
        let mut sorted: Vec<&str> = ids(&list);
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_id_mutates_nothing_and_requests_resync() {
        let mut list = ConversationList::new();
        list.replace(vec![summary("a", "A", "A", 1), summary("b", "B", "B", 0)]);
        let before = list.entries().to_vec();

        assert_eq!(
            list.apply_event(&event("z", "first contact")),
            EventOutcome::ResyncRequired
        );

        assert_eq!(list.entries(), before.as_slice());
        assert!(list.get("z").is_none());
    }

    #[test]
    fn test_snapshot_replace_is_idempotent() {
        let snapshot = vec![
            summary("a", "A", "A", 2),
            summary("b", "B", "B", 0),
        ];

        let mut list = ConversationList::new();
        list.replace(snapshot.clone());
        let first = list.entries().to_vec();
        list.replace(snapshot);
        assert_eq!(list.entries(), first.as_slice());
    }

    #[test]
    fn test_snapshot_duplicates_keep_first_occurrence() {
        let mut list = ConversationList::new();
        list.replace(vec![
            summary("a", "first", "A", 1),
            summary("a", "second", "A", 9),
            summary("b", "B", "B", 0),
        ]);

        assert_eq!(list.len(), 2);
        assert_eq!(list.get("a").unwrap().order_title, "first");
    }

    #[test]
    fn test_unread_never_decreases_from_events() {
        let mut list = ConversationList::new();
        list.replace(vec![summary("a", "A", "A", 3)]);

        let mut previous = list.get("a").unwrap().unread_count;
        for _ in 0..5 {
            list.apply_event(&event("a", "m"));
            let current = list.get("a").unwrap().unread_count;
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, 8);
    }

    #[test]
    fn test_unread_saturates_at_max() {
        let mut list = ConversationList::new();
        list.replace(vec![summary("a", "A", "A", u32::MAX)]);
        list.apply_event(&event("a", "m"));
        assert_eq!(list.get("a").unwrap().unread_count, u32::MAX);
    }

    #[test]
    fn test_total_unread_sums_entries() {
        let mut list = ConversationList::new();
        list.replace(vec![
            summary("a", "A", "A", 2),
            summary("b", "B", "B", 0),
            summary("c", "C", "C", 5),
        ]);
        assert_eq!(list.total_unread(), 7);
    }

    #[test]
    fn test_filter_matches_title_and_name_case_insensitively() {
        let list = vec![
            summary("a", "Logo Design", "Mara", 0),
            summary("b", "Copywriting", "Jonas", 0),
        ];

        let by_title = filter_by_text(&list, "logo");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, "a");

        let by_name = filter_by_text(&list, "JONAS");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "b");

        assert!(filter_by_text(&list, "backend").is_empty());
    }

    #[test]
    fn test_filter_empty_query_returns_input_unchanged() {
        let list = vec![
            summary("a", "Logo Design", "Mara", 1),
            summary("b", "Copywriting", "Jonas", 0),
        ];
        let filtered = filter_by_text(&list, "");
        assert_eq!(filtered, list);
    }
}
