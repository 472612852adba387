//! Built-in demo graph and random event generation.

use crate::graph::types::{GraphData, GraphLink, GraphNode};
use crate::timeline::TimelineEvent;
use rand::Rng;

/// Default timeline bound for the demo schedule.
pub const MAX_TIME: f64 = 180.0;
/// Default activation window length for each event.
pub const EVENT_DURATION: f64 = 10.0;
/// Default events per generated batch.
pub const EVENT_COUNT: usize = 15;

/// Four nodes with D hubbing A, B, C, plus two cross links.
pub fn demo_graph() -> GraphData {
    GraphData {
        nodes: vec![
            GraphNode::new("0", "A"),
            GraphNode::new("1", "B"),
            GraphNode::new("2", "C"),
            GraphNode::new("3", "D"),
        ],
        links: vec![
            GraphLink::new("3", "0"),
            GraphLink::new("3", "1"),
            GraphLink::new("3", "2"),
            GraphLink::new("0", "2"),
            GraphLink::new("1", "2"),
        ],
    }
}

/// Draw `count` events with uniformly random node and start time.
/// Returned unsorted; the timeline orders them on ingestion.
pub fn random_events(data: &GraphData, count: usize, max_time: f64) -> Vec<TimelineEvent> {
    if data.nodes.is_empty() {
        return Vec::new();
    }

    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let node = &data.nodes[rng.gen_range(0..data.nodes.len())];
            TimelineEvent::new(node.id.clone(), rng.gen_range(0.0..=max_time))
        })
        .collect()
}
