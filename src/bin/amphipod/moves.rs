use std::fmt::{self, Display, Formatter};

use tracing::{event, Level};

use crate::board::{Amphipod, Board};
use crate::cost::Cost;
use crate::layout::{Layout, ROOM_COUNT};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Location {
    Hallway(usize),
    Room(usize),
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Location::Hallway(pos) => write!(f, "hallway {}", pos),
            Location::Room(room) => write!(f, "room {}", Amphipod::owner_of(*room)),
        }
    }
}

/// One amphipod moving once, and the board that results.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Move {
    pub who: Amphipod,
    pub from: Location,
    pub to: Location,
    pub cost: Cost,
    pub next: Board,
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} to {} (cost {})", self.who, self.from, self.to, self.cost)
    }
}

pub struct MoveGenerator<'a> {
    layout: &'a Layout,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(layout: &'a Layout) -> MoveGenerator<'a> {
        MoveGenerator { layout }
    }

    /// Every legal single move from `board`.
    ///
    /// An amphipod in the hallway may only go home, and only when its room
    /// holds no strangers.  An amphipod at the front of a room which is not
    /// yet done may go to any hallway position where stopping is allowed.
    /// Moving straight from one room to another is two moves.
    pub fn moves(&self, board: &Board) -> Vec<Move> {
        let mut result = Vec::with_capacity(ROOM_COUNT * self.layout.resting_positions().len());
        self.hallway_to_room(board, &mut result);
        self.room_to_hallway(board, &mut result);
        event!(Level::TRACE, "{} moves available", result.len());
        result
    }

    #[cfg(test)]
    pub fn successors(&self, board: &Board) -> Vec<(Board, Cost)> {
        self.moves(board)
            .into_iter()
            .map(|m| (m.next, m.cost))
            .collect()
    }

    fn hallway_to_room(&self, board: &Board, result: &mut Vec<Move>) {
        let depth = self.layout.depth();
        for (pos, who) in board.hallway().occupants() {
            let home = who.home();
            let entrance = self.layout.entrance(home);
            if !board.can_enter_room(home, who, self.layout) {
                continue;
            }
            if !board.hallway().path_clear(pos, entrance) {
                continue;
            }
            let room = board.room(home);
            let steps = pos.abs_diff(entrance) + (depth - room.len());
            let next = board
                .with_hallway(board.hallway().with(pos, None))
                .with_room(home, room.pushed(who));
            result.push(Move {
                who,
                from: Location::Hallway(pos),
                to: Location::Room(home),
                cost: who.move_cost() * steps as u64,
                next,
            });
        }
    }

    fn room_to_hallway(&self, board: &Board, result: &mut Vec<Move>) {
        let depth = self.layout.depth();
        for index in 0..ROOM_COUNT {
            if board.is_room_done(index, self.layout) {
                continue;
            }
            let room = board.room(index);
            let (who, remaining) = match room.popped() {
                Some(popped) => popped,
                None => continue,
            };
            let entrance = self.layout.entrance(index);
            // Steps from the front slot up to the entrance.
            let climb = depth - room.len() + 1;
            let after_leaving = board.with_room(index, remaining);
            for &pos in self.layout.resting_positions() {
                if !board.hallway().path_clear(entrance, pos) {
                    continue;
                }
                let steps = pos.abs_diff(entrance) + climb;
                result.push(Move {
                    who,
                    from: Location::Room(index),
                    to: Location::Hallway(pos),
                    cost: who.move_cost() * steps as u64,
                    next: after_leaving.with_hallway(board.hallway().with(pos, Some(who))),
                });
            }
        }
    }
}

#[cfg(test)]
use crate::fixtures;

#[test]
fn test_moves_from_start() {
    let p = fixtures::sample();
    let moves = MoveGenerator::new(&p.layout).moves(&p.board);
    // Nobody is in the hallway, so every front amphipod can go to each of
    // the 7 resting positions.
    assert_eq!(moves.len(), 28);
    assert!(moves
        .iter()
        .all(|m| matches!((m.from, m.to), (Location::Room(_), Location::Hallway(_)))));

    // The B at the front of room A: one step up, then along the hallway.
    let find = |room: usize, pos: usize| -> Cost {
        moves
            .iter()
            .find(|m| m.from == Location::Room(room) && m.to == Location::Hallway(pos))
            .map(|m| m.cost)
            .expect("move should exist")
    };
    assert_eq!(find(0, 0), Cost(30));
    assert_eq!(find(0, 3), Cost(20));
    assert_eq!(find(0, 10), Cost(90));
    // The D at the front of room D.
    assert_eq!(find(3, 9), Cost(2000));
    assert_eq!(find(3, 0), Cost(9000));
}

#[test]
fn test_moves_home_and_blocked() {
    let p = fixtures::puzzle(concat!(
        "#############\n",
        "#..........A#\n",
        "###.#B#C#D###\n",
        "  #A#B#C#D#\n",
        "  #########\n",
    ));
    let mut moves = MoveGenerator::new(&p.layout).moves(&p.board);
    moves.sort_by_key(|m| m.cost);
    let summary: Vec<(Location, Location, u64)> = moves
        .iter()
        .map(|m| (m.from, m.to, m.cost.0))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Location::Room(0), Location::Hallway(1), 3),
            (Location::Room(0), Location::Hallway(3), 3),
            (Location::Room(0), Location::Hallway(0), 4),
            (Location::Room(0), Location::Hallway(5), 5),
            (Location::Room(0), Location::Hallway(7), 7),
            (Location::Hallway(10), Location::Room(0), 9),
            (Location::Room(0), Location::Hallway(9), 9),
        ]
    );
    let home = moves
        .iter()
        .find(|m| m.to == Location::Room(0))
        .expect("the A in the hallway can go home");
    assert!(home.next.is_final(&p.layout));
}

#[test]
fn test_stranger_blocks_room() {
    // The A at position 3 cannot go home while a D is at the back of room A.
    let p = fixtures::puzzle(concat!(
        "#############\n",
        "#...A.......#\n",
        "###.#B#C#A###\n",
        "  #D#B#C#D#\n",
        "  #########\n",
    ));
    let moves = MoveGenerator::new(&p.layout).moves(&p.board);
    assert!(moves.iter().all(|m| m.to != Location::Room(0)));
    // Done rooms stay put; only the D in room A and the A in room D move.
    assert!(moves
        .iter()
        .all(|m| matches!(m.from, Location::Room(0) | Location::Room(3))));
    assert!(!moves.is_empty());
}

#[test]
fn test_reachable_boards_keep_their_amphipods() {
    use pathfinding::directed::bfs::bfs_reach;

    let p = fixtures::sample();
    let generator = MoveGenerator::new(&p.layout);
    let initial = p.board.token_counts();
    for board in bfs_reach(p.board, |b| generator.successors(b).into_iter().map(|(next, _)| next))
        .take(3000)
    {
        assert_eq!(board.token_counts(), initial);
        for m in generator.moves(&board) {
            assert!(m.cost > Cost(0), "move {} should cost something", m);
            if let Location::Room(room) = m.to {
                assert_eq!(room, m.who.home());
                assert!(board.can_enter_room(room, m.who, &p.layout));
            }
            if let Location::Room(room) = m.from {
                assert!(!board.is_room_done(room, &p.layout));
            }
            if let Location::Hallway(pos) = m.to {
                assert!(p.layout.is_resting(pos));
            }
        }
    }
}
