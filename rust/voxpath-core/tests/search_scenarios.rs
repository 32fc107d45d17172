use voxpath_core::engine::{is_neighbor_step, NEIGHBOR_OFFSETS};
use voxpath_core::{AStar, Coord, GridBounds, OccupancyGrid, SearchOptions};

fn assert_valid_path(grid: &OccupancyGrid, path: &[Coord]) {
    for c in path {
        assert!(grid.is_walkable(*c), "path crosses unwalkable cell {c:?}");
    }
    for w in path.windows(2) {
        assert!(is_neighbor_step(w[0], w[1]), "illegal step {:?} -> {:?}", w[0], w[1]);
    }
}

/// Pillars and a raised platform in a 12x3x12 volume.
fn cluttered_grid() -> OccupancyGrid {
    let mut blocked = Vec::new();
    for x in (2..10).step_by(3) {
        for z in 1..11 {
            if z != 5 {
                blocked.push(Coord::new(x, 0, z));
                blocked.push(Coord::new(x, 1, z));
            }
        }
    }
    for x in 0..12 {
        blocked.push(Coord::new(x, 2, 6));
    }
    OccupancyGrid::with_blocked(GridBounds::new(12, 3, 12), blocked)
}

#[test]
fn flat_corridor_scenario() {
    let grid = OccupancyGrid::new(GridBounds::new(10, 1, 10));
    let sol = AStar::new(&grid)
        .find_path(Coord::new(0, 0, 0), Coord::new(9, 0, 0), &SearchOptions::default())
        .solution
        .expect("path");
    assert_eq!(sol.path.len(), 10);
    assert!(sol.path.windows(2).all(|w| w[1].x > w[0].x));
    assert!(sol.complete);
}

#[test]
fn repeated_solves_are_identical() {
    let grid = cluttered_grid();
    let solver = AStar::new(&grid);
    let opts = SearchOptions::default();
    let a = solver.find_path(Coord::new(0, 0, 0), Coord::new(11, 0, 11), &opts);
    let b = solver.find_path(Coord::new(0, 0, 0), Coord::new(11, 0, 11), &opts);
    assert!(a.solution.is_some());
    assert_eq!(a, b);
    assert_valid_path(&grid, &a.solution.unwrap().path);
}

#[test]
fn paths_only_use_defined_offsets_and_walkable_cells() {
    let grid = cluttered_grid();
    let solver = AStar::new(&grid);
    let goals = [Coord::new(11, 0, 0), Coord::new(11, 2, 11), Coord::new(5, 1, 5), Coord::new(0, 0, 11)];
    for goal in goals {
        let out = solver.find_path(Coord::new(0, 0, 0), goal, &SearchOptions::default());
        let sol = out.solution.unwrap_or_else(|| panic!("no path to {goal:?}"));
        assert_valid_path(&grid, &sol.path);
        assert_eq!(sol.path[0], Coord::new(0, 0, 0));
    }
}

#[test]
fn blocked_goal_is_substituted_by_free_neighbor() {
    let goal = Coord::new(5, 0, 5);
    // Block the goal and every ring-1 cell except goal.x+1
    let mut blocked = vec![goal];
    for dx in -1..=1 {
        for dz in -1..=1 {
            if (dx, dz) != (0, 0) && (dx, dz) != (1, 0) {
                blocked.push(goal.checked_offset(dx, 0, dz).unwrap());
            }
        }
    }
    let grid = OccupancyGrid::with_blocked(GridBounds::new(10, 1, 10), blocked);
    let sol = AStar::new(&grid)
        .find_path(Coord::new(0, 0, 0), goal, &SearchOptions::default())
        .solution
        .expect("path");
    assert!(sol.complete && !sol.partial);
    assert_eq!(sol.path.last(), Some(&Coord::new(6, 0, 5)));
    assert_valid_path(&grid, &sol.path);
}

#[test]
fn enclosed_start_has_no_path() {
    let start = Coord::new(2, 2, 2);
    let blocked = NEIGHBOR_OFFSETS.iter().map(|&(dx, dy, dz)| start.checked_offset(dx, dy, dz).unwrap());
    let grid = OccupancyGrid::with_blocked(GridBounds::new(5, 5, 5), blocked);
    let out = AStar::new(&grid).find_path(start, Coord::new(4, 2, 4), &SearchOptions::default());
    assert!(out.solution.is_none());
    assert_eq!(out.iterations, 1);
}

#[test]
fn single_iteration_partial() {
    let grid = OccupancyGrid::new(GridBounds::new(10, 1, 10));
    let opts = SearchOptions { max_iterations: 1, allow_partial_path: true, ..Default::default() };
    let out = AStar::new(&grid).find_path(Coord::new(0, 0, 0), Coord::new(9, 0, 9), &opts);
    let sol = out.solution.expect("partial path");
    assert!(sol.partial && !sol.complete);
    assert!(!sol.path.is_empty() && sol.path.len() <= 2);
    assert_eq!(sol.path[0], Coord::new(0, 0, 0));
    assert_eq!(out.iterations, 1);
}

#[test]
fn degenerate_request() {
    let grid = cluttered_grid();
    let p = Coord::new(0, 2, 0);
    let sol = AStar::new(&grid).find_path(p, p, &SearchOptions::default()).solution.unwrap();
    assert_eq!(sol.path, vec![p]);
    assert!(sol.complete);
}
