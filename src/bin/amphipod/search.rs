use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use thiserror::Error;
use tracing::{event, span, Level};

use crate::board::Board;
use crate::cost::Cost;
use crate::layout::Layout;
use crate::moves::MoveGenerator;

/// How often (in expanded states) to report progress.
const PROGRESS_INTERVAL: usize = 100_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("the amphipods can never all get home (explored {expanded} positions)")]
    Unsolvable { expanded: usize },
    #[error("gave up after exploring {limit} positions")]
    BudgetExhausted { limit: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stop after settling this many positions.  `None` means no limit.
    pub max_expansions: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions whose cheapest cost was settled.
    pub expanded: usize,
    /// Entries added to the frontier (including the start).
    pub pushed: usize,
    /// Frontier entries discarded because a cheaper route was already settled.
    pub stale: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub cost: Cost,
    pub stats: SearchStats,
}

/// Finds the least energy needed to get every amphipod home, by
/// Dijkstra's algorithm over board positions.
///
/// Frontier entries are never updated in place; instead a position may be
/// queued several times and the later, dearer, copies are skipped when
/// popped.  Ties in cost are broken by the boards' own ordering, so the
/// search is deterministic.
///
/// This is done by hand rather than with `pathfinding`'s `dijkstra`, whose
/// `Option` result can't tell an unsolvable burrow from a search that ran
/// out of budget, and which has no budget to run out of.
pub fn solve(start: &Board, layout: &Layout, limits: &SearchLimits) -> Result<Solution, SolveError> {
    let span = span!(Level::INFO, "solve", depth = layout.depth());
    let _enter = span.enter();

    let generator = MoveGenerator::new(layout);
    let mut stats = SearchStats::default();
    let mut settled: HashSet<Board> = HashSet::new();
    let mut frontier: BinaryHeap<Reverse<(Cost, Board)>> = BinaryHeap::new();
    frontier.push(Reverse((Cost(0), *start)));
    stats.pushed += 1;

    while let Some(Reverse((cost, board))) = frontier.pop() {
        if settled.contains(&board) {
            stats.stale += 1;
            continue;
        }
        if let Some(limit) = limits.max_expansions {
            if stats.expanded >= limit {
                event!(Level::WARN, "expansion budget of {} used up at cost {}", limit, cost);
                return Err(SolveError::BudgetExhausted { limit });
            }
        }
        settled.insert(board);
        stats.expanded += 1;
        if stats.expanded % PROGRESS_INTERVAL == 0 {
            event!(
                Level::DEBUG,
                "settled {} positions, frontier holds {}, current cost {}",
                stats.expanded,
                frontier.len(),
                cost,
            );
        }

        if board.is_final(layout) {
            event!(
                Level::INFO,
                "solved at cost {}: expanded {}, pushed {}, stale {}",
                cost,
                stats.expanded,
                stats.pushed,
                stats.stale,
            );
            return Ok(Solution { cost, stats });
        }

        for m in generator.moves(&board) {
            if settled.contains(&m.next) {
                continue;
            }
            event!(Level::TRACE, "at cost {}: {}", cost, m);
            frontier.push(Reverse((cost + m.cost, m.next)));
            stats.pushed += 1;
        }
    }

    event!(Level::INFO, "frontier exhausted after settling {} positions", stats.expanded);
    Err(SolveError::Unsolvable {
        expanded: stats.expanded,
    })
}

#[cfg(test)]
use crate::fixtures::{puzzle, sample, DEADLOCK};

#[cfg(test)]
fn cost_of(diagram: &str) -> Cost {
    let p = puzzle(diagram);
    solve(&p.board, &p.layout, &SearchLimits::default())
        .expect("should be solvable")
        .cost
}

#[test]
fn test_solve_sample() {
    let p = sample();
    let first = solve(&p.board, &p.layout, &SearchLimits::default()).expect("solvable");
    assert_eq!(first.cost, Cost(12521));
    let second = solve(&p.board, &p.layout, &SearchLimits::default()).expect("solvable");
    assert_eq!(first, second);
}

#[test]
fn test_solve_deep_sample() {
    assert_eq!(
        cost_of(concat!(
            "#############\n",
            "#...........#\n",
            "###B#C#B#D###\n",
            "  #D#C#B#A#\n",
            "  #D#B#A#C#\n",
            "  #A#D#C#A#\n",
            "  #########\n",
        )),
        Cost(44169)
    );
}

#[test]
fn test_already_solved() {
    let p = puzzle(concat!(
        "#############\n",
        "#...........#\n",
        "###A#B#C#D###\n",
        "  #A#B#C#D#\n",
        "  #########\n",
    ));
    let solution = solve(&p.board, &p.layout, &SearchLimits::default()).expect("solvable");
    assert_eq!(solution.cost, Cost(0));
    assert_eq!(solution.stats.expanded, 1);
}

#[test]
fn test_small_cases() {
    // A and B swapped at the front.
    assert_eq!(
        cost_of(concat!(
            "#############\n",
            "#...........#\n",
            "###B#A#C#D###\n",
            "  #A#B#C#D#\n",
            "  #########\n",
        )),
        Cost(46)
    );
    // Rooms A and B fully swapped.
    assert_eq!(
        cost_of(concat!(
            "#############\n",
            "#...........#\n",
            "###B#A#C#D###\n",
            "  #B#A#C#D#\n",
            "  #########\n",
        )),
        Cost(114)
    );
    // Starting with amphipods already in the hallway.
    assert_eq!(
        cost_of(concat!(
            "#############\n",
            "#.....A.D...#\n",
            "###.#B#C#.###\n",
            "  #A#B#C#D#\n",
            "  #########\n",
        )),
        Cost(2004)
    );
}

#[test]
fn test_deadlock_is_unsolvable() {
    let p = puzzle(DEADLOCK);
    assert_eq!(
        solve(&p.board, &p.layout, &SearchLimits::default()),
        Err(SolveError::Unsolvable { expanded: 12 })
    );
}

#[test]
fn test_budget() {
    let p = sample();
    let limits = SearchLimits {
        max_expansions: Some(10),
    };
    assert_eq!(
        solve(&p.board, &p.layout, &limits),
        Err(SolveError::BudgetExhausted { limit: 10 })
    );
    let generous = SearchLimits {
        max_expansions: Some(1_000_000),
    };
    assert_eq!(
        solve(&p.board, &p.layout, &generous).map(|s| s.cost),
        Ok(Cost(12521))
    );
}

#[test]
fn test_agrees_with_pathfinding_dijkstra() {
    use pathfinding::directed::dijkstra::dijkstra;

    let p = sample();
    let generator = MoveGenerator::new(&p.layout);
    let reference = dijkstra(
        &p.board,
        |b| generator.successors(b),
        |b| b.is_final(&p.layout),
    );
    let ours = solve(&p.board, &p.layout, &SearchLimits::default()).map(|s| s.cost);
    assert_eq!(reference.map(|(_path, cost)| cost), ours.ok());
}

#[test]
fn test_matches_exhaustive_relaxation() {
    use std::collections::HashMap;

    use pathfinding::directed::bfs::bfs_reach;

    // Only A and B are out of place, so every reachable position can be
    // listed, and edges relaxed until nothing improves.
    let p = puzzle(concat!(
        "#############\n",
        "#...........#\n",
        "###B#A#C#D###\n",
        "  #A#B#C#D#\n",
        "  #########\n",
    ));
    let generator = MoveGenerator::new(&p.layout);
    let everything: Vec<Board> = bfs_reach(p.board, |b| {
        generator.successors(b).into_iter().map(|(next, _)| next)
    })
    .collect();
    assert!(everything.len() < 10_000, "state space should be small");

    let mut best: HashMap<Board, Cost> = HashMap::new();
    best.insert(p.board, Cost(0));
    loop {
        let mut improved = false;
        for board in everything.iter() {
            let here = match best.get(board) {
                Some(c) => *c,
                None => continue,
            };
            for (next, step) in generator.successors(board) {
                let candidate = here + step;
                let better = best.get(&next).map_or(true, |known| candidate < *known);
                if better {
                    best.insert(next, candidate);
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
    let oracle = best
        .iter()
        .filter(|(board, _)| board.is_final(&p.layout))
        .map(|(_, cost)| *cost)
        .min();

    let ours = solve(&p.board, &p.layout, &SearchLimits::default()).expect("solvable");
    assert_eq!(oracle, Some(ours.cost));
    assert_eq!(ours.cost, Cost(46));
}
