//! Burrows shared by the tests.

use crate::parse::Puzzle;

pub const SAMPLE: &str = concat!(
    "#############\n",
    "#...........#\n",
    "###B#C#B#D###\n",
    "  #A#D#C#A#\n",
    "  #########\n",
);

// The D can't get past the A and the A can't get past the D.
pub const DEADLOCK: &str = concat!(
    "#############\n",
    "#...D.A.....#\n",
    "###.#B#C#.###\n",
    "  #A#B#C#D#\n",
    "  #########\n",
);

pub fn puzzle(diagram: &str) -> Puzzle {
    diagram.parse().expect("test diagram should be valid")
}

pub fn sample() -> Puzzle {
    puzzle(SAMPLE)
}
