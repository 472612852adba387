//! Barnes-Hut quadtree for O(n log n) repulsion.
//!
//! Instead of evaluating every node pair O(n²), distant groups of
//! bodies are folded into their center of mass. All bodies here weigh
//! the same, so a cell only tracks its centroid and body count.

use egui::{Pos2, Vec2};

/// A cell in the quadtree - empty, a single body, or four children
#[derive(Debug, Default)]
pub enum QuadNode {
    #[default]
    Empty,
    Leaf {
        pos: Pos2,
    },
    Internal {
        /// Centroid of all bodies in this cell
        centroid: Pos2,
        /// Number of bodies in this cell
        count: u32,
        /// Children: NW, NE, SW, SE
        children: Box<[QuadNode; 4]>,
    },
}

/// Axis-aligned square bounds for quadtree cells
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min: Pos2,
    pub max: Pos2,
}

impl Bounds {
    pub fn new(min: Pos2, max: Pos2) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Pos2 {
        Pos2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn size(&self) -> f32 {
        (self.max.x - self.min.x).max(self.max.y - self.min.y)
    }

    /// Get the quadrant for a position (0=NW, 1=NE, 2=SW, 3=SE)
    pub fn quadrant(&self, pos: Pos2) -> usize {
        let center = self.center();
        let east = pos.x >= center.x;
        let south = pos.y >= center.y;
        match (south, east) {
            (false, false) => 0, // NW
            (false, true) => 1,  // NE
            (true, false) => 2,  // SW
            (true, true) => 3,   // SE
        }
    }

    /// Get bounds for a specific quadrant
    pub fn child_bounds(&self, quadrant: usize) -> Bounds {
        let center = self.center();
        match quadrant {
            0 => Bounds::new(self.min, center), // NW
            1 => Bounds::new(Pos2::new(center.x, self.min.y), Pos2::new(self.max.x, center.y)), // NE
            2 => Bounds::new(Pos2::new(self.min.x, center.y), Pos2::new(center.x, self.max.y)), // SW
            3 => Bounds::new(center, self.max), // SE
            _ => unreachable!(),
        }
    }
}

/// Barnes-Hut quadtree over uniform-mass bodies
pub struct Quadtree {
    root: QuadNode,
    bounds: Bounds,
    /// Approximation threshold on cell_size / distance.
    /// Higher = faster but coarser. 1.0 is fine for visualization.
    theta: f32,
}

impl Quadtree {
    /// Build a quadtree from a set of body positions
    pub fn build(positions: &[Pos2], theta: f32) -> Self {
        if positions.is_empty() {
            return Self {
                root: QuadNode::Empty,
                bounds: Bounds::new(Pos2::ZERO, Pos2::ZERO),
                theta,
            };
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;

        for pos in positions {
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x);
            max_y = max_y.max(pos.y);
        }

        // Pad, then square off (quadrants assume square cells)
        let padding = 100.0;
        min_x -= padding;
        min_y -= padding;
        max_x += padding;
        max_y += padding;
        let size = (max_x - min_x).max(max_y - min_y);
        max_x = min_x + size;
        max_y = min_y + size;

        let mut tree = Self {
            root: QuadNode::Empty,
            bounds: Bounds::new(Pos2::new(min_x, min_y), Pos2::new(max_x, max_y)),
            theta,
        };

        for &pos in positions {
            tree.insert(pos);
        }

        tree
    }

    /// Insert a body into the quadtree
    pub fn insert(&mut self, pos: Pos2) {
        self.root = Self::insert_into(std::mem::take(&mut self.root), pos, self.bounds, 0);
    }

    fn insert_into(node: QuadNode, pos: Pos2, bounds: Bounds, depth: u32) -> QuadNode {
        // Coincident points would recurse forever
        if depth > 50 {
            return node;
        }

        match node {
            QuadNode::Empty => QuadNode::Leaf { pos },

            QuadNode::Leaf { pos: existing } => {
                let mut children = Box::new([
                    QuadNode::Empty,
                    QuadNode::Empty,
                    QuadNode::Empty,
                    QuadNode::Empty,
                ]);

                let eq = bounds.quadrant(existing);
                children[eq] = Self::insert_into(
                    QuadNode::Empty,
                    existing,
                    bounds.child_bounds(eq),
                    depth + 1,
                );

                let nq = bounds.quadrant(pos);
                children[nq] = Self::insert_into(
                    std::mem::take(&mut children[nq]),
                    pos,
                    bounds.child_bounds(nq),
                    depth + 1,
                );

                QuadNode::Internal {
                    centroid: Pos2::new((existing.x + pos.x) / 2.0, (existing.y + pos.y) / 2.0),
                    count: 2,
                    children,
                }
            }

            QuadNode::Internal {
                centroid,
                count,
                mut children,
            } => {
                let q = bounds.quadrant(pos);
                children[q] = Self::insert_into(
                    std::mem::take(&mut children[q]),
                    pos,
                    bounds.child_bounds(q),
                    depth + 1,
                );

                // Running centroid over count + 1 bodies
                let new_count = count + 1;
                let w = count as f32 / new_count as f32;
                let centroid = Pos2::new(
                    centroid.x * w + pos.x / new_count as f32,
                    centroid.y * w + pos.y / new_count as f32,
                );

                QuadNode::Internal {
                    centroid,
                    count: new_count,
                    children,
                }
            }
        }
    }

    /// Repulsion force on a body at `pos` from every other body,
    /// approximated per the theta criterion. Inverse-square falloff,
    /// directed away from the acting mass.
    pub fn force_at(&self, pos: Pos2, repulsion: f32, min_distance: f32) -> Vec2 {
        Self::force_recursive(&self.root, pos, repulsion, min_distance, self.bounds, self.theta)
    }

    fn force_recursive(
        node: &QuadNode,
        pos: Pos2,
        repulsion: f32,
        min_distance: f32,
        bounds: Bounds,
        theta: f32,
    ) -> Vec2 {
        match node {
            QuadNode::Empty => Vec2::ZERO,

            QuadNode::Leaf { pos: body } => {
                let delta = pos - *body;

                // Skip self
                if delta.length() < 0.01 {
                    return Vec2::ZERO;
                }

                let distance = delta.length().max(min_distance);
                let magnitude = repulsion / (distance * distance);
                (delta / distance) * magnitude
            }

            QuadNode::Internal {
                centroid,
                count,
                children,
            } => {
                let delta = pos - *centroid;
                let distance = delta.length().max(min_distance);

                // Far-enough cells act as one body of `count` masses
                if bounds.size() / distance < theta {
                    let magnitude = repulsion * *count as f32 / (distance * distance);
                    (delta / distance) * magnitude
                } else {
                    let mut force = Vec2::ZERO;
                    for (i, child) in children.iter().enumerate() {
                        force += Self::force_recursive(
                            child,
                            pos,
                            repulsion,
                            min_distance,
                            bounds.child_bounds(i),
                            theta,
                        );
                    }
                    force
                }
            }
        }
    }
}
