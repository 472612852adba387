//! Force-directed graph layout.
//!
//! One tick combines four constraints:
//! - Repulsion between all nodes - O(n log n) via Barnes-Hut
//! - Spring attraction along links toward a fixed rest length
//! - Pairwise disc collision resolution
//! - A centroid pull toward the canvas center
//!
//! Forces are scaled by a cooling scalar (alpha) that decays toward an
//! adjustable target, so the layout settles at rest and wakes up again
//! when reheated by interaction. Pinned nodes sit outside integration
//! entirely; their positions are externally authoritative.

use super::forces;
use super::quadtree::Quadtree;
use super::types::SimulationState;
use egui::{Pos2, Vec2};

/// Force-directed layout parameters
pub struct ForceLayout {
    /// Repulsion strength between nodes
    pub repulsion: f32,
    /// Spring strength along links
    pub link_strength: f32,
    /// Rest length for links
    pub link_distance: f32,
    /// Disc radius per node for collision resolution
    pub collide_radius: f32,
    /// Centering strength (1.0 recenters the centroid every tick)
    pub centering: f32,
    /// Velocity damping factor (0.0 - 1.0)
    pub damping: f32,
    /// Minimum distance to prevent division blowups
    pub min_distance: f32,
    /// Maximum velocity
    pub max_velocity: f32,
    /// Per-tick blend of alpha toward its target
    pub alpha_decay: f32,
    /// Below this alpha (with the target at rest) the layout is settled
    pub alpha_min: f32,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            repulsion: 12000.0,
            link_strength: 0.1,
            link_distance: 240.0,
            collide_radius: 150.0,
            centering: 1.0,
            damping: 0.6,
            min_distance: 1.0,
            max_velocity: 80.0,
            alpha_decay: 0.0228,
            alpha_min: 0.001,
        }
    }
}

impl ForceLayout {
    /// Run one iteration of the force simulation, updating positions
    /// in place. A no-op once settled, until the state is reheated.
    pub fn step(&self, sim: &mut SimulationState, center: Pos2) {
        if sim.data.nodes.is_empty() || self.is_settled(sim) {
            return;
        }

        sim.alpha += (sim.alpha_target - sim.alpha) * self.alpha_decay;
        let alpha = sim.alpha;

        let ids: Vec<String> = sim.data.nodes.iter().map(|n| n.id.clone()).collect();
        let positions: Vec<Pos2> = ids
            .iter()
            .map(|id| sim.positions.get(id).copied().unwrap_or(Pos2::ZERO))
            .collect();

        let mut forces: Vec<Vec2> = vec![Vec2::ZERO; ids.len()];

        // Many-body repulsion via Barnes-Hut
        let tree = Quadtree::build(&positions, 1.0);
        for (i, &pos) in positions.iter().enumerate() {
            forces[i] += tree.force_at(pos, self.repulsion, self.min_distance);
        }

        // Link springs
        for link in &sim.data.links {
            let (Some(&si), Some(&ti)) = (
                sim.node_index.get(&link.source),
                sim.node_index.get(&link.target),
            ) else {
                continue;
            };
            let f = forces::link_spring(
                positions[si],
                positions[ti],
                self.link_distance,
                self.link_strength,
                self.min_distance,
            );
            forces[si] += f;
            forces[ti] -= f;
        }

        // Integrate free nodes. Pinned nodes hold their pinned position;
        // just-released nodes hold their drop point for this one tick.
        for (i, id) in ids.iter().enumerate() {
            if let Some(pin) = sim.pinned_pos(id) {
                sim.positions.insert(id.clone(), pin);
                sim.velocities.insert(id.clone(), Vec2::ZERO);
                continue;
            }
            if sim.is_released(id) {
                sim.velocities.insert(id.clone(), Vec2::ZERO);
                continue;
            }
            if let Some(vel) = sim.velocities.get_mut(id) {
                *vel = (*vel + forces[i] * alpha) * self.damping;
                if vel.length() > self.max_velocity {
                    *vel = vel.normalized() * self.max_velocity;
                }
                if let Some(pos) = sim.positions.get_mut(id) {
                    *pos += *vel;
                }
            }
        }

        self.resolve_collisions(sim, &ids);
        self.recenter(sim, &ids, center);
        sim.clear_released();
    }

    /// Check if the simulation has cooled to rest
    pub fn is_settled(&self, sim: &SimulationState) -> bool {
        sim.alpha < self.alpha_min && sim.alpha_target < self.alpha_min
    }

    /// Push overlapping discs apart along the line between centers.
    /// A held (pinned or just-released) node is immovable, so its
    /// partner absorbs the full push.
    fn resolve_collisions(&self, sim: &mut SimulationState, ids: &[String]) {
        let held = |sim: &SimulationState, id: &str| sim.is_pinned(id) || sim.is_released(id);
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let (Some(pi), Some(pj)) = (sim.get_pos(&ids[i]), sim.get_pos(&ids[j])) else {
                    continue;
                };
                let Some(push) = forces::collision_push(pi, pj, self.collide_radius) else {
                    continue;
                };
                match (held(sim, &ids[i]), held(sim, &ids[j])) {
                    (false, false) => {
                        sim.positions.insert(ids[i].clone(), pi + push);
                        sim.positions.insert(ids[j].clone(), pj - push);
                    }
                    (true, false) => {
                        sim.positions.insert(ids[j].clone(), pj - push * 2.0);
                    }
                    (false, true) => {
                        sim.positions.insert(ids[i].clone(), pi + push * 2.0);
                    }
                    (true, true) => {}
                }
            }
        }
    }

    /// Translate free nodes so their centroid moves toward `center`.
    fn recenter(&self, sim: &mut SimulationState, ids: &[String], center: Pos2) {
        let free: Vec<&String> = ids
            .iter()
            .filter(|id| !sim.is_pinned(id) && !sim.is_released(id))
            .collect();
        if free.is_empty() {
            return;
        }

        let mut sum = Vec2::ZERO;
        for id in &free {
            if let Some(pos) = sim.get_pos(id) {
                sum += pos.to_vec2();
            }
        }
        let centroid = Pos2::ZERO + sum / free.len() as f32;
        let shift = forces::centering_shift(centroid, center, self.centering);

        for id in free {
            if let Some(pos) = sim.positions.get_mut(id) {
                *pos += shift;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{GraphData, GraphLink, GraphNode, DRAG_ALPHA_TARGET};
    use egui::{pos2, Rect};

    const CENTER: Pos2 = pos2(400.0, 300.0);

    fn bounds() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0))
    }

    fn diamond() -> GraphData {
        // D hubs A, B, C; A and B also link to C
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

    #[test]
    fn pinned_node_never_moves() {
        let mut sim = SimulationState::new(diamond(), bounds()).unwrap();
        let layout = ForceLayout::default();

        sim.pin("1", pos2(100.0, 200.0));
        sim.reheat(DRAG_ALPHA_TARGET);

        for _ in 0..50 {
            layout.step(&mut sim, CENTER);
            assert_eq!(sim.get_pos("1"), Some(pos2(100.0, 200.0)));
        }
    }

    #[test]
    fn released_node_stays_put_for_a_tick() {
        let mut sim = SimulationState::new(diamond(), bounds()).unwrap();
        let layout = ForceLayout::default();

        sim.pin("1", pos2(100.0, 200.0));
        sim.reheat(DRAG_ALPHA_TARGET);
        layout.step(&mut sim, CENTER);

        // Release: the node holds the drop point through one more tick
        sim.unpin("1");
        sim.set_alpha_target(0.0);
        assert_eq!(sim.get_pos("1"), Some(pos2(100.0, 200.0)));

        layout.step(&mut sim, CENTER);
        assert_eq!(sim.get_pos("1"), Some(pos2(100.0, 200.0)));

        // After the held tick, forces apply again
        layout.step(&mut sim, CENTER);
        let after = sim.get_pos("1").unwrap();
        assert!(after.x.is_finite() && after.y.is_finite());
    }

    #[test]
    fn alpha_decays_toward_rest() {
        let mut sim = SimulationState::new(diamond(), bounds()).unwrap();
        let layout = ForceLayout::default();

        let before = sim.alpha();
        layout.step(&mut sim, CENTER);
        assert!(sim.alpha() < before);
    }

    #[test]
    fn simulation_settles_and_stops_ticking() {
        let mut sim = SimulationState::new(diamond(), bounds()).unwrap();
        let layout = ForceLayout::default();

        for _ in 0..600 {
            layout.step(&mut sim, CENTER);
        }
        assert!(layout.is_settled(&sim));

        // Settled step is a no-op
        let frozen: Vec<_> = sim.data.nodes.iter().map(|n| sim.get_pos(&n.id)).collect();
        layout.step(&mut sim, CENTER);
        let still: Vec<_> = sim.data.nodes.iter().map(|n| sim.get_pos(&n.id)).collect();
        assert_eq!(frozen, still);
    }

    #[test]
    fn reheat_wakes_a_settled_simulation() {
        let mut sim = SimulationState::new(diamond(), bounds()).unwrap();
        let layout = ForceLayout::default();

        for _ in 0..600 {
            layout.step(&mut sim, CENTER);
        }
        assert!(layout.is_settled(&sim));

        sim.reheat(DRAG_ALPHA_TARGET);
        assert!(!layout.is_settled(&sim));

        let before = sim.alpha();
        layout.step(&mut sim, CENTER);
        assert!(sim.alpha() > before, "alpha should climb toward the target");
    }

    #[test]
    fn collision_keeps_discs_separated() {
        let data = GraphData {
            nodes: vec![GraphNode::new("a", "A"), GraphNode::new("b", "B")],
            links: vec![],
        };
        let mut sim = SimulationState::new(data, bounds()).unwrap();
        sim.positions.insert("a".into(), pos2(400.0, 300.0));
        sim.positions.insert("b".into(), pos2(410.0, 300.0));

        let layout = ForceLayout::default();
        layout.step(&mut sim, CENTER);

        let a = sim.get_pos("a").unwrap();
        let b = sim.get_pos("b").unwrap();
        assert!(
            (a - b).length() >= layout.collide_radius * 2.0 - 1.0,
            "discs still overlap: {a:?} {b:?}"
        );
    }

    #[test]
    fn centering_pulls_centroid_to_center() {
        let mut sim = SimulationState::new(diamond(), bounds()).unwrap();
        let layout = ForceLayout::default();

        for _ in 0..20 {
            layout.step(&mut sim, CENTER);
        }

        let mut sum = egui::Vec2::ZERO;
        for node in &sim.data.nodes {
            sum += sim.get_pos(&node.id).unwrap().to_vec2();
        }
        let centroid = Pos2::ZERO + sum / sim.data.nodes.len() as f32;
        assert!((centroid - CENTER).length() < 1.0, "centroid drifted: {centroid:?}");
    }

    #[test]
    fn empty_graph_steps_are_noops() {
        let mut sim = SimulationState::new(GraphData::default(), bounds()).unwrap();
        let layout = ForceLayout::default();
        layout.step(&mut sim, CENTER);
        assert!(sim.positions.is_empty());
    }
}
