use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::models::Coord;
use crate::occupancy::OccupancyGrid;
use crate::options::SearchOptions;

use super::heuristics::{manhattan, step_cost};
use super::neighbors::walkable_neighbors;

/// Largest ring (Chebyshev radius in x/z) scanned for a stand-in goal.
pub const GOAL_SEARCH_RADIUS: i32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Start to reached node, inclusive.
    pub path: Vec<Coord>,
    /// The goal (literal or substituted) was reached.
    pub complete: bool,
    pub partial: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub solution: Option<Solution>,
    pub iterations: u32,
}

impl SearchOutcome {
    fn failed(iterations: u32) -> Self { Self { solution: None, iterations } }
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    coord: Coord,
    parent: Option<usize>,
    g: f64,
    h: f64,
    f: f64,
}

pub struct AStar<'a> {
    grid: &'a OccupancyGrid,
}

impl<'a> AStar<'a> {
    pub fn new(grid: &'a OccupancyGrid) -> Self { Self { grid } }

    /// First walkable cell on square rings of radius 1..=3 around the goal's x/z,
    /// trying the goal's y, then y+1, then y-1 at each ring position.
    pub fn resolve_goal(&self, goal: Coord) -> Option<Coord> {
        for r in 1..=GOAL_SEARCH_RADIUS {
            for dx in -r..=r {
                for dz in -r..=r {
                    if dx.abs() != r && dz.abs() != r {
                        continue;
                    }
                    for dy in [0, 1, -1] {
                        match goal.checked_offset(dx, dy, dz) {
                            Some(c) if self.grid.is_walkable(c) => return Some(c),
                            _ => {}
                        }
                    }
                }
            }
        }
        None
    }

    pub fn find_path(&self, start: Coord, goal: Coord, options: &SearchOptions) -> SearchOutcome {
        if !self.grid.is_walkable(start) {
            debug!(?start, "start not walkable");
            return SearchOutcome::failed(0);
        }

        let target = if self.grid.is_walkable(goal) {
            goal
        } else {
            match self.resolve_goal(goal) {
                Some(sub) => {
                    debug!(?goal, substitute = ?sub, "goal blocked, using nearby cell");
                    sub
                }
                // Literal goal only steers the heuristic; the search ends by exhaustion or cap.
                None if options.allow_partial_path => goal,
                None => {
                    debug!(?goal, "goal blocked with no walkable cell nearby");
                    return SearchOutcome::failed(0);
                }
            }
        };

        let mut nodes: Vec<SearchNode> = Vec::new();
        // Insertion-ordered: ties on f resolve to the earliest entry.
        let mut open: Vec<usize> = Vec::new();
        let mut open_index: FxHashMap<Coord, usize> = FxHashMap::default();
        let mut closed: FxHashSet<Coord> = FxHashSet::default();

        let h0 = manhattan(start, target);
        nodes.push(SearchNode { coord: start, parent: None, g: 0.0, h: h0, f: h0 });
        open.push(0);
        open_index.insert(start, 0);

        let mut closest = 0usize;
        let mut iterations: u32 = 0;

        while !open.is_empty() && iterations < options.max_iterations {
            iterations += 1;

            let mut best = 0usize;
            for (i, &idx) in open.iter().enumerate().skip(1) {
                if nodes[idx].f < nodes[open[best]].f {
                    best = i;
                }
            }
            let current = open.remove(best);
            let node = nodes[current];
            open_index.remove(&node.coord);

            if node.h < nodes[closest].h {
                closest = current;
            }

            if node.coord == target {
                return SearchOutcome {
                    solution: Some(Solution { path: reconstruct(&nodes, current), complete: true, partial: false }),
                    iterations,
                };
            }
            closed.insert(node.coord);

            for next in walkable_neighbors(self.grid, node.coord) {
                if closed.contains(&next) {
                    continue;
                }
                let g = node.g + step_cost(node.coord, next);
                match open_index.get(&next) {
                    Some(&idx) => {
                        let existing = &mut nodes[idx];
                        if g < existing.g {
                            existing.g = g;
                            existing.f = g + existing.h;
                            existing.parent = Some(current);
                        }
                    }
                    None => {
                        let h = manhattan(next, target);
                        let idx = nodes.len();
                        nodes.push(SearchNode { coord: next, parent: Some(current), g, h, f: g + h });
                        open.push(idx);
                        open_index.insert(next, idx);
                    }
                }
            }
        }

        debug!(iterations, open = open.len(), explored = nodes.len(), "search exhausted");
        if options.allow_partial_path {
            SearchOutcome {
                solution: Some(Solution { path: reconstruct(&nodes, closest), complete: false, partial: true }),
                iterations,
            }
        } else {
            SearchOutcome::failed(iterations)
        }
    }
}

fn reconstruct(nodes: &[SearchNode], end: usize) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut cur = Some(end);
    while let Some(idx) = cur {
        path.push(nodes[idx].coord);
        cur = nodes[idx].parent;
    }
    path.reverse();
    path
}
