use std::collections::HashSet;

use stratus_model::StackEvent;

/// Tracks which stack events have already been delivered across poll ticks.
///
/// The control plane serves the full stream newest-first on every fetch;
/// the cursor keeps only unseen events and hands them back in chronological
/// order, so each event is delivered exactly once over the whole loop.
#[derive(Debug, Default)]
pub struct EventCursor {
    seen: HashSet<String>,
}

impl EventCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter a freshly fetched stream down to unseen events, oldest first.
    pub fn advance(&mut self, stream: Vec<StackEvent>) -> Vec<StackEvent> {
        let mut fresh: Vec<StackEvent> = stream
            .into_iter()
            .filter(|event| self.seen.insert(event.id.clone()))
            .collect();

        // newest-first input; reverse before the stable sort so equal
        // timestamps keep their chronological order
        fresh.reverse();
        fresh.sort_by_key(|event| event.timestamp);
        fresh
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use stratus_model::StackStatus;

    use super::*;

    fn event(id: &str, secs: u64) -> StackEvent {
        StackEvent {
            id: id.to_string(),
            stack_name: "demo".to_string(),
            logical_resource_id: "ECSService".to_string(),
            resource_type: "AWS::ECS::Service".to_string(),
            resource_status: StackStatus::CreateInProgress,
            resource_status_reason: None,
            timestamp: UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    fn ids(events: &[StackEvent]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn orders_newest_first_stream_chronologically() {
        let mut cursor = EventCursor::new();

        let fresh = cursor.advance(vec![event("e3", 30), event("e2", 20), event("e1", 10)]);
        assert_eq!(ids(&fresh), vec!["e1", "e2", "e3"]);
    }

    #[test]
    fn never_redelivers_across_ticks() {
        let mut cursor = EventCursor::new();

        let first = cursor.advance(vec![event("e2", 20), event("e1", 10)]);
        assert_eq!(ids(&first), vec!["e1", "e2"]);

        // next fetch overlaps the previous one
        let second = cursor.advance(vec![event("e3", 30), event("e2", 20), event("e1", 10)]);
        assert_eq!(ids(&second), vec!["e3"]);

        let third = cursor.advance(vec![event("e3", 30), event("e2", 20), event("e1", 10)]);
        assert!(third.is_empty());
    }

    #[test]
    fn equal_timestamps_keep_stream_order() {
        let mut cursor = EventCursor::new();

        let fresh = cursor.advance(vec![event("later", 10), event("earlier", 10)]);
        assert_eq!(ids(&fresh), vec!["earlier", "later"]);
    }

    #[test]
    fn timestamps_non_decreasing_across_whole_loop() {
        let mut cursor = EventCursor::new();
        let mut delivered = Vec::new();

        delivered.extend(cursor.advance(vec![event("e2", 20), event("e1", 10)]));
        delivered.extend(cursor.advance(vec![
            event("e4", 40),
            event("e3", 30),
            event("e2", 20),
            event("e1", 10),
        ]));

        let stamps: Vec<SystemTime> = delivered.iter().map(|e| e.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(delivered.len(), 4);
    }
}
