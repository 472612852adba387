//! Time cursor, scheduled events, and the derived active set.

pub mod color;
pub mod playback;

pub use playback::Playback;

/// A scheduled activation for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub node_id: String,
    pub start_time: f64,
}

impl TimelineEvent {
    pub fn new(node_id: impl Into<String>, start_time: f64) -> Self {
        Self {
            node_id: node_id.into(),
            start_time,
        }
    }

    /// Center of this event's activation window.
    pub fn midpoint(&self, event_duration: f64) -> f64 {
        self.start_time + event_duration * 0.5
    }
}

/// The time cursor plus the event schedule it runs against.
///
/// `active` is a pure derivation of (time, events, duration) and is
/// recomputed on every transition; it is never set independently.
#[derive(Debug, Clone)]
pub struct TimelineState {
    time: f64,
    max_time: f64,
    event_duration: f64,
    events: Vec<TimelineEvent>,
    /// Indices into `events` whose window contains `time`
    active: Vec<usize>,
}

impl TimelineState {
    pub fn new(max_time: f64, event_duration: f64) -> Self {
        Self {
            time: 0.0,
            max_time: max_time.max(0.0),
            event_duration: event_duration.max(0.0),
            events: Vec::new(),
            active: Vec::new(),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn event_duration(&self) -> f64 {
        self.event_duration
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Move the cursor to an absolute time, clamped to [0, max_time].
    pub fn set_time(&mut self, t: f64) {
        self.time = t.clamp(0.0, self.max_time);
        self.recompute_active();
    }

    /// Advance (or rewind) the cursor. Same clamp and derivation path
    /// as `set_time`.
    pub fn increment_time(&mut self, delta: f64) {
        self.set_time(self.time + delta);
    }

    /// Replace the schedule. Events are stored sorted ascending by
    /// start time regardless of input order, and the active set is
    /// recomputed against the current cursor.
    pub fn set_events(&mut self, mut events: Vec<TimelineEvent>) {
        events.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        self.events = events;
        self.recompute_active();
    }

    /// Change the activation window length; re-derives the active set.
    pub fn set_event_duration(&mut self, duration: f64) {
        self.event_duration = duration.max(0.0);
        self.recompute_active();
    }

    /// Change the timeline bound; the cursor is re-clamped.
    pub fn set_max_time(&mut self, max_time: f64) {
        self.max_time = max_time.max(0.0);
        self.set_time(self.time);
    }

    /// Events whose window contains the cursor, in schedule order.
    /// Membership is per-event: one node can appear more than once.
    pub fn active_events(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.active.iter().map(|&i| &self.events[i])
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Indices into `events()` of the currently active events.
    pub fn active_indices(&self) -> &[usize] {
        &self.active
    }

    /// Whether any active event references this node.
    pub fn is_node_active(&self, node_id: &str) -> bool {
        self.active_events().any(|e| e.node_id == node_id)
    }

    /// The active event for `node_id` whose midpoint is closest to the
    /// cursor; None when the node has no active event.
    pub fn nearest_active_event(&self, node_id: &str) -> Option<&TimelineEvent> {
        self.active_events()
            .filter(|e| e.node_id == node_id)
            .min_by(|a, b| {
                let da = (a.midpoint(self.event_duration) - self.time).abs();
                let db = (b.midpoint(self.event_duration) - self.time).abs();
                da.total_cmp(&db)
            })
    }

    /// An event is active for exactly [start, start + duration],
    /// closed on both ends.
    fn recompute_active(&mut self) {
        let t = self.time;
        self.active = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| t >= e.start_time && t <= e.start_time + self.event_duration)
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline_with_event_at_50() -> TimelineState {
        let mut tl = TimelineState::new(180.0, 10.0);
        tl.set_events(vec![TimelineEvent::new("a", 50.0)]);
        tl
    }

    #[test]
    fn window_is_closed_on_both_ends() {
        let mut tl = timeline_with_event_at_50();

        tl.set_time(39.0);
        assert_eq!(tl.active_count(), 0);

        tl.set_time(40.0);
        assert_eq!(tl.active_count(), 1);

        tl.set_time(50.0);
        assert_eq!(tl.active_count(), 1);
        assert!(tl.is_node_active("a"));

        tl.set_time(60.0);
        assert_eq!(tl.active_count(), 1);

        tl.set_time(61.0);
        assert_eq!(tl.active_count(), 0);
        assert!(!tl.is_node_active("a"));
    }

    #[test]
    fn set_time_clamps_to_bounds() {
        let mut tl = timeline_with_event_at_50();

        tl.set_time(-5.0);
        assert_eq!(tl.time(), 0.0);

        tl.set_time(500.0);
        assert_eq!(tl.time(), 180.0);
    }

    #[test]
    fn increment_goes_through_the_clamp() {
        let mut tl = TimelineState::new(180.0, 10.0);
        tl.set_time(170.0);
        tl.increment_time(200.0);
        assert_eq!(tl.time(), 180.0);

        tl.increment_time(-500.0);
        assert_eq!(tl.time(), 0.0);
    }

    #[test]
    fn increment_rederives_the_active_set() {
        let mut tl = timeline_with_event_at_50();
        tl.set_time(30.0);
        assert_eq!(tl.active_count(), 0);

        tl.increment_time(20.0);
        assert_eq!(tl.active_count(), 1);
    }

    #[test]
    fn set_events_sorts_ascending() {
        let mut tl = TimelineState::new(180.0, 10.0);
        tl.set_events(vec![
            TimelineEvent::new("c", 90.0),
            TimelineEvent::new("a", 10.0),
            TimelineEvent::new("b", 40.0),
        ]);

        let starts: Vec<f64> = tl.events().iter().map(|e| e.start_time).collect();
        assert_eq!(starts, vec![10.0, 40.0, 90.0]);
    }

    #[test]
    fn set_events_recomputes_against_current_time() {
        let mut tl = TimelineState::new(180.0, 10.0);
        tl.set_time(45.0);
        assert_eq!(tl.active_count(), 0);

        tl.set_events(vec![TimelineEvent::new("a", 40.0)]);
        assert_eq!(tl.active_count(), 1, "new schedule evaluated at t=45");
    }

    #[test]
    fn overlapping_events_are_each_active() {
        let mut tl = TimelineState::new(180.0, 10.0);
        tl.set_events(vec![
            TimelineEvent::new("a", 48.0),
            TimelineEvent::new("a", 50.0),
            TimelineEvent::new("b", 52.0),
        ]);
        tl.set_time(53.0);

        // Three windows contain t=53; membership is per-event
        assert_eq!(tl.active_count(), 3);
        assert!(tl.is_node_active("a"));
        assert!(tl.is_node_active("b"));
    }

    #[test]
    fn nearest_active_event_picks_closest_midpoint() {
        let mut tl = TimelineState::new(180.0, 10.0);
        tl.set_events(vec![
            TimelineEvent::new("a", 48.0), // midpoint 53
            TimelineEvent::new("a", 50.0), // midpoint 55
        ]);
        tl.set_time(54.5);

        let nearest = tl.nearest_active_event("a").unwrap();
        assert_eq!(nearest.start_time, 50.0);
        assert!(tl.nearest_active_event("b").is_none());
    }

    #[test]
    fn empty_schedule_is_valid() {
        let mut tl = TimelineState::new(180.0, 10.0);
        tl.set_time(90.0);
        assert_eq!(tl.active_count(), 0);
        tl.set_events(Vec::new());
        assert_eq!(tl.active_count(), 0);
    }

    #[test]
    fn shrinking_the_duration_deactivates_events() {
        let mut tl = timeline_with_event_at_50();
        tl.set_time(58.0);
        assert_eq!(tl.active_count(), 1);

        tl.set_event_duration(5.0);
        assert_eq!(tl.active_count(), 0);
    }

    #[test]
    fn shrinking_max_time_reclamps_the_cursor() {
        let mut tl = TimelineState::new(180.0, 10.0);
        tl.set_time(170.0);
        tl.set_max_time(100.0);
        assert_eq!(tl.time(), 100.0);
    }
}
