use std::fmt::{self, Display, Formatter};

use crate::cost::Cost;
use crate::layout::{Layout, HALLWAY_LEN, MAX_DEPTH, ROOM_COUNT};

//            1
//  01234567890
// #############
// #...........#  hallway
// ###B#C#B#D###  room level depth-1 (front)
//   #A#D#C#A#    room level 0 (back)
//   #########
//     0 1 2 3    room index

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Amphipod {
    A,
    B,
    C,
    D,
}

impl Amphipod {
    pub const ALL: [Amphipod; ROOM_COUNT] = [Amphipod::A, Amphipod::B, Amphipod::C, Amphipod::D];

    pub fn move_cost(&self) -> Cost {
        match self {
            Amphipod::A => Cost(1),
            Amphipod::B => Cost(10),
            Amphipod::C => Cost(100),
            Amphipod::D => Cost(1000),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Amphipod::A => 'A',
            Amphipod::B => 'B',
            Amphipod::C => 'C',
            Amphipod::D => 'D',
        }
    }

    /// Index of the room this amphipod belongs in.
    pub fn home(&self) -> usize {
        match self {
            Amphipod::A => 0,
            Amphipod::B => 1,
            Amphipod::C => 2,
            Amphipod::D => 3,
        }
    }

    /// The amphipod which belongs in room `room`.
    pub fn owner_of(room: usize) -> Amphipod {
        Amphipod::ALL[room]
    }
}

impl Display for Amphipod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Amphipod {
    type Error = String;
    fn try_from(ch: char) -> Result<Amphipod, String> {
        match ch {
            'A' => Ok(Amphipod::A),
            'B' => Ok(Amphipod::B),
            'C' => Ok(Amphipod::C),
            'D' => Ok(Amphipod::D),
            _ => Err(format!("unknown symbol {:?}, should be A, B, C or D", ch)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct Hallway([Option<Amphipod>; HALLWAY_LEN]);

impl Hallway {
    pub fn from_cells(cells: [Option<Amphipod>; HALLWAY_LEN]) -> Hallway {
        Hallway(cells)
    }

    pub fn get(&self, pos: usize) -> Option<Amphipod> {
        self.0[pos]
    }

    pub fn is_empty_at(&self, pos: usize) -> bool {
        self.0[pos].is_none()
    }

    /// A copy of this hallway with `pos` holding `who`.
    pub fn with(&self, pos: usize, who: Option<Amphipod>) -> Hallway {
        let mut cells = self.0;
        cells[pos] = who;
        Hallway(cells)
    }

    /// Occupied positions, left to right.
    pub fn occupants(&self) -> impl Iterator<Item = (usize, Amphipod)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(pos, cell)| cell.map(|who| (pos, who)))
    }

    /// True if every position after `start`, up to and including `end`,
    /// is empty.  `start` itself is not examined, since that is where the
    /// moving amphipod (or the room entrance) is.
    pub fn path_clear(&self, start: usize, end: usize) -> bool {
        if end > start {
            ((start + 1)..=end).all(|pos| self.is_empty_at(pos))
        } else {
            (end..start).all(|pos| self.is_empty_at(pos))
        }
    }
}

/// A side room.  Slots are filled from the back (level 0) towards the
/// hallway; unused slots are always `None` so that derived equality and
/// hashing only see the occupants.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct Room {
    slots: [Option<Amphipod>; MAX_DEPTH],
}

impl Room {
    /// Builds a room from its occupants, back first.  Returns `None` if
    /// there are more occupants than any room can hold.
    pub fn from_back(occupants: &[Amphipod]) -> Option<Room> {
        if occupants.len() > MAX_DEPTH {
            return None;
        }
        let mut slots = [None; MAX_DEPTH];
        for (slot, who) in slots.iter_mut().zip(occupants) {
            *slot = Some(*who);
        }
        Some(Room { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().take_while(|slot| slot.is_some()).count()
    }

    /// Occupant at `level` (0 is the back of the room).
    pub fn get(&self, level: usize) -> Option<Amphipod> {
        self.slots.get(level).copied().flatten()
    }

    /// Occupants, back first.
    pub fn iter(&self) -> impl Iterator<Item = Amphipod> + '_ {
        self.slots.iter().map_while(|slot| *slot)
    }

    /// A copy of this room with `who` added at the front.  The caller must
    /// already have checked that there is space (see `admits`).
    pub fn pushed(&self, who: Amphipod) -> Room {
        let len = self.len();
        assert!(len < MAX_DEPTH, "pushed: room is already at maximum depth");
        let mut slots = self.slots;
        slots[len] = Some(who);
        Room { slots }
    }

    /// The front amphipod (nearest the hallway, and the only one able to
    /// leave), and a copy of this room without it.
    pub fn popped(&self) -> Option<(Amphipod, Room)> {
        let level = self.len().checked_sub(1)?;
        let mut slots = self.slots;
        let who = slots[level].take()?;
        Some((who, Room { slots }))
    }

    /// Full, and holding nothing but `target`.
    pub fn is_done(&self, target: Amphipod, depth: usize) -> bool {
        self.len() == depth && self.iter().all(|who| who == target)
    }

    /// There is space, and no stranger is in the way.
    pub fn admits(&self, who: Amphipod, depth: usize) -> bool {
        self.iter().all(|occupant| occupant == who) && self.len() < depth
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Board {
    hallway: Hallway,
    rooms: [Room; ROOM_COUNT],
}

impl Board {
    pub fn new(hallway: Hallway, rooms: [Room; ROOM_COUNT]) -> Board {
        Board { hallway, rooms }
    }

    pub fn hallway(&self) -> &Hallway {
        &self.hallway
    }

    pub fn room(&self, index: usize) -> &Room {
        &self.rooms[index]
    }

    pub fn with_hallway(&self, hallway: Hallway) -> Board {
        Board {
            hallway,
            rooms: self.rooms,
        }
    }

    pub fn with_room(&self, index: usize, room: Room) -> Board {
        let mut rooms = self.rooms;
        rooms[index] = room;
        Board {
            hallway: self.hallway,
            rooms,
        }
    }

    pub fn is_room_done(&self, index: usize, layout: &Layout) -> bool {
        self.rooms[index].is_done(Amphipod::owner_of(index), layout.depth())
    }

    pub fn can_enter_room(&self, index: usize, who: Amphipod, layout: &Layout) -> bool {
        self.rooms[index].admits(who, layout.depth())
    }

    pub fn is_final(&self, layout: &Layout) -> bool {
        (0..ROOM_COUNT).all(|index| self.is_room_done(index, layout))
    }

    /// Number of amphipods of each type, indexed by home room.
    pub fn token_counts(&self) -> [usize; ROOM_COUNT] {
        let mut counts = [0; ROOM_COUNT];
        for (_, who) in self.hallway.occupants() {
            counts[who.home()] += 1;
        }
        for room in self.rooms.iter() {
            for who in room.iter() {
                counts[who.home()] += 1;
            }
        }
        counts
    }

    /// Renders the board as a diagram in the same format it is read in.
    pub fn diagram<'a>(&'a self, layout: &'a Layout) -> Diagram<'a> {
        Diagram {
            board: self,
            layout,
        }
    }
}

pub struct Diagram<'a> {
    board: &'a Board,
    layout: &'a Layout,
}

impl Display for Diagram<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fn cell(who: Option<Amphipod>) -> char {
            who.map_or('.', |w| w.symbol())
        }

        f.write_str("#############\n#")?;
        for pos in 0..HALLWAY_LEN {
            write!(f, "{}", cell(self.board.hallway.get(pos)))?;
        }
        f.write_str("#\n")?;
        for level in (0..self.layout.depth()).rev() {
            let front = level + 1 == self.layout.depth();
            f.write_str(if front { "###" } else { "  #" })?;
            for room in self.board.rooms.iter() {
                write!(f, "{}#", cell(room.get(level)))?;
            }
            f.write_str(if front { "##\n" } else { "\n" })?;
        }
        f.write_str("  #########\n")
    }
}

#[cfg(test)]
fn room_of(occupants: &[Amphipod]) -> Room {
    Room::from_back(occupants).expect("test rooms should fit")
}

#[test]
fn test_room_stack() {
    use Amphipod::*;
    let room = room_of(&[A, D]);
    assert_eq!(room.len(), 2);
    assert_eq!(room.get(1), Some(D));
    assert_eq!(room.get(0), Some(A));
    assert_eq!(room.get(2), None);
    let (who, rest) = room.popped().expect("room is not empty");
    assert_eq!(who, D);
    assert_eq!(rest, room_of(&[A]));
    assert_eq!(rest.pushed(C), room_of(&[A, C]));
    assert!(Room::default().popped().is_none());
    assert_eq!(Room::default().len(), 0);
    assert!(Room::from_back(&[A; MAX_DEPTH + 1]).is_none());
}

#[test]
fn test_room_done_and_admits() {
    use Amphipod::*;
    assert!(room_of(&[B, B]).is_done(B, 2));
    assert!(!room_of(&[B]).is_done(B, 2));
    assert!(!room_of(&[A, B]).is_done(B, 2));
    assert!(!room_of(&[B, B]).is_done(A, 2));

    assert!(Room::default().admits(C, 2));
    assert!(room_of(&[C]).admits(C, 2));
    assert!(!room_of(&[C, C]).admits(C, 2)); // full
    assert!(!room_of(&[A]).admits(C, 4)); // stranger at the back
    assert!(!room_of(&[C, A]).admits(C, 4));
}

#[test]
fn test_path_clear() {
    use Amphipod::*;
    let hallway = Hallway::default().with(3, Some(B)).with(9, Some(D));
    // Either direction, start excluded, end included.
    assert!(hallway.path_clear(3, 0));
    assert!(hallway.path_clear(3, 8));
    assert!(!hallway.path_clear(3, 9));
    assert!(hallway.path_clear(9, 4));
    assert!(!hallway.path_clear(9, 3));
    assert!(!hallway.path_clear(2, 4));
    assert!(!hallway.path_clear(10, 8));
    assert!(hallway.path_clear(5, 5));
}

#[test]
fn test_board_predicates() {
    use Amphipod::*;
    let layout = Layout::new(2).expect("valid depth");
    let solved = Board::new(
        Hallway::default(),
        [room_of(&[A, A]), room_of(&[B, B]), room_of(&[C, C]), room_of(&[D, D])],
    );
    assert!(solved.is_final(&layout));
    assert_eq!(solved.token_counts(), [2, 2, 2, 2]);

    let (who, emptied) = solved.room(1).popped().expect("room B is full");
    let unsettled = solved
        .with_room(1, emptied)
        .with_hallway(solved.hallway().with(0, Some(who)));
    assert!(!unsettled.is_final(&layout));
    assert!(!unsettled.is_room_done(1, &layout));
    assert!(unsettled.is_room_done(0, &layout));
    assert!(unsettled.can_enter_room(1, B, &layout));
    assert!(!unsettled.can_enter_room(1, A, &layout));
    assert!(!unsettled.can_enter_room(0, A, &layout));
    assert_eq!(unsettled.token_counts(), [2, 2, 2, 2]);
}

#[test]
fn test_diagram() {
    use Amphipod::*;
    let layout = Layout::new(2).expect("valid depth");
    let board = Board::new(
        Hallway::default().with(1, Some(C)),
        [room_of(&[A, B]), room_of(&[D, C]), room_of(&[C]), room_of(&[A, D])],
    );
    assert_eq!(
        board.diagram(&layout).to_string(),
        concat!(
            "#############\n",
            "#.C.........#\n",
            "###B#C#.#D###\n",
            "  #A#D#C#A#\n",
            "  #########\n",
        )
    );
}
