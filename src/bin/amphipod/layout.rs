pub const HALLWAY_LEN: usize = 11;
pub const ROOM_COUNT: usize = 4;
/// Deepest room we can represent.
pub const MAX_DEPTH: usize = 8;

const ENTRANCES: [usize; ROOM_COUNT] = [2, 4, 6, 8];
const RESTING: [usize; 7] = [0, 1, 3, 5, 7, 9, 10];

/// The shape of the burrow: where the rooms open onto the hallway, where
/// an amphipod may stop in the hallway, and how deep the rooms are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    depth: usize,
    entrances: [usize; ROOM_COUNT],
    resting: [usize; 7],
}

impl Layout {
    /// Returns `None` unless `1 <= depth <= MAX_DEPTH`.
    pub fn new(depth: usize) -> Option<Layout> {
        if (1..=MAX_DEPTH).contains(&depth) {
            Some(Layout {
                depth,
                entrances: ENTRANCES,
                resting: RESTING,
            })
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Hallway position directly outside `room`.
    pub fn entrance(&self, room: usize) -> usize {
        self.entrances[room]
    }

    pub fn resting_positions(&self) -> &[usize] {
        &self.resting
    }

    pub fn is_resting(&self, pos: usize) -> bool {
        self.resting.contains(&pos)
    }
}

#[test]
fn test_layout() {
    assert!(Layout::new(0).is_none());
    assert!(Layout::new(MAX_DEPTH + 1).is_none());
    let layout = Layout::new(4).expect("4 is a valid depth");
    assert_eq!(layout.depth(), 4);
    assert_eq!(layout.entrance(0), 2);
    assert_eq!(layout.entrance(3), 8);
    for pos in 0..HALLWAY_LEN {
        let outside_a_room = (0..ROOM_COUNT).any(|room| layout.entrance(room) == pos);
        assert_eq!(layout.is_resting(pos), !outside_a_room, "position {}", pos);
    }
}
