use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{anychar, char},
    combinator::map_res,
    multi::count,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;
use tracing::{event, Level};

use crate::board::{Amphipod, Board, Hallway, Room};
use crate::layout::{Layout, HALLWAY_LEN, MAX_DEPTH, ROOM_COUNT};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
    #[error("found {found} amphipods of type {who}, expected {expected}")]
    UnbalancedTokenCount {
        who: Amphipod,
        found: usize,
        expected: usize,
    },
    #[error("rooms are {depth} deep, but this solver can only hold {capacity} amphipods per room")]
    TooDeep { depth: usize, capacity: usize },
}

fn malformed(line: usize, reason: String) -> ParseError {
    ParseError::MalformedInput { line, reason }
}

/// A starting position, together with the shape of the burrow it is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub board: Board,
    pub layout: Layout,
}

fn decode_cell(ch: char) -> Result<Option<Amphipod>, String> {
    match ch {
        '.' => Ok(None),
        _ => Amphipod::try_from(ch).map(Some),
    }
}

fn cell(input: &str) -> IResult<&str, Option<Amphipod>> {
    map_res(anychar, decode_cell)(input)
}

fn hallway_row(input: &str) -> IResult<&str, Vec<Option<Amphipod>>> {
    delimited(char('#'), count(cell, HALLWAY_LEN), char('#'))(input)
}

fn room_row(input: &str) -> IResult<&str, [Option<Amphipod>; ROOM_COUNT]> {
    let (rest, (a, b, c, d)) = preceded(
        alt((tag("###"), tag("  #"))),
        tuple((
            cell,
            preceded(char('#'), cell),
            preceded(char('#'), cell),
            terminated(preceded(char('#'), cell), char('#')),
        )),
    )(input)?;
    Ok((rest, [a, b, c, d]))
}

/// Only wall and padding may follow the last cell on a line.
fn check_trailer(line: usize, rest: &str) -> Result<(), ParseError> {
    if rest.chars().all(|ch| ch == '#' || ch.is_whitespace()) {
        Ok(())
    } else {
        Err(malformed(line, format!("unexpected trailing junk: '{}'", rest)))
    }
}

fn parse_hallway(line: usize, text: &str, layout: &Layout) -> Result<Hallway, ParseError> {
    let (rest, cells) = hallway_row(text)
        .map_err(|e| malformed(line, format!("failed to parse hallway '{}': {}", text, e)))?;
    check_trailer(line, rest)?;
    let mut result = [None; HALLWAY_LEN];
    for (pos, who) in cells.into_iter().enumerate() {
        if let Some(who) = who {
            if !layout.is_resting(pos) {
                return Err(malformed(
                    line,
                    format!("{} is standing outside a room at hallway position {}", who, pos),
                ));
            }
        }
        result[pos] = who;
    }
    Ok(Hallway::from_cells(result))
}

impl TryFrom<&[String]> for Puzzle {
    type Error = ParseError;
    fn try_from(lines: &[String]) -> Result<Puzzle, ParseError> {
        let mut end = lines.len();
        while end > 0 && lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        let lines = &lines[..end];
        if lines.len() < 4 {
            return Err(malformed(
                lines.len(),
                format!(
                    "expected at least 4 lines (walls, hallway, rooms), got {}",
                    lines.len()
                ),
            ));
        }
        let depth = lines.len() - 3;
        let layout = match Layout::new(depth) {
            Some(layout) => layout,
            None => {
                return Err(ParseError::TooDeep {
                    depth,
                    capacity: MAX_DEPTH,
                });
            }
        };

        let hallway = parse_hallway(2, &lines[1], &layout)?;

        // Read the rooms front to back, then flip them round.
        let mut columns: [Vec<(usize, Option<Amphipod>)>; ROOM_COUNT] = Default::default();
        for (i, text) in lines[2..2 + depth].iter().enumerate() {
            let line = i + 3;
            let (rest, cells) = room_row(text).map_err(|e| {
                malformed(line, format!("failed to parse room row '{}': {}", text, e))
            })?;
            check_trailer(line, rest)?;
            for (column, who) in columns.iter_mut().zip(cells) {
                column.push((line, who));
            }
        }

        let mut rooms = [Room::default(); ROOM_COUNT];
        for (index, column) in columns.iter().enumerate() {
            let mut occupants: Vec<Amphipod> = Vec::with_capacity(depth);
            let mut seen_gap = false;
            for (line, who) in column.iter().rev() {
                match who {
                    Some(who) if seen_gap => {
                        return Err(malformed(
                            *line,
                            format!(
                                "{} in room {} is floating above an empty space",
                                who,
                                Amphipod::owner_of(index)
                            ),
                        ));
                    }
                    Some(who) => occupants.push(*who),
                    None => {
                        seen_gap = true;
                    }
                }
            }
            rooms[index] = match Room::from_back(&occupants) {
                Some(room) => room,
                None => {
                    return Err(ParseError::TooDeep {
                        depth,
                        capacity: MAX_DEPTH,
                    });
                }
            };
        }

        let board = Board::new(hallway, rooms);
        for (who, found) in Amphipod::ALL.iter().zip(board.token_counts()) {
            if found != depth {
                return Err(ParseError::UnbalancedTokenCount {
                    who: *who,
                    found,
                    expected: depth,
                });
            }
        }
        event!(
            Level::DEBUG,
            "parsed a burrow with rooms {} deep:\n{}",
            depth,
            board.diagram(&layout)
        );
        Ok(Puzzle { board, layout })
    }
}

impl FromStr for Puzzle {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Puzzle, ParseError> {
        let lines: Vec<String> = s.lines().map(|line| line.to_string()).collect();
        Puzzle::try_from(lines.as_slice())
    }
}

#[test]
fn test_parse_sample() {
    use Amphipod::*;
    let parsed: Puzzle = concat!(
        "#############\n",
        "#...........#\n",
        "###B#C#B#D###\n",
        "  #A#D#C#A###\n",
        "  #########\n",
    )
    .parse()
    .expect("test input should be valid");
    assert_eq!(parsed.layout.depth(), 2);
    let expected = Board::new(
        Hallway::default(),
        [
            Room::from_back(&[A, B]).expect("fits"),
            Room::from_back(&[D, C]).expect("fits"),
            Room::from_back(&[C, B]).expect("fits"),
            Room::from_back(&[A, D]).expect("fits"),
        ],
    );
    assert_eq!(parsed.board, expected);
}

#[test]
fn test_parse_deep_rooms_and_blank_tail() {
    let parsed: Puzzle = concat!(
        "#############\n",
        "#...........#\n",
        "###B#C#B#D###\n",
        "  #D#C#B#A#\n",
        "  #D#B#A#C#\n",
        "  #A#D#C#A#\n",
        "  #########\n",
        "\n",
        "\n",
    )
    .parse()
    .expect("test input should be valid");
    assert_eq!(parsed.layout.depth(), 4);
    assert_eq!(parsed.board.room(0).get(3), Some(Amphipod::B));
    assert_eq!(parsed.board.room(0).get(0), Some(Amphipod::A));
    assert_eq!(parsed.board.token_counts(), [4, 4, 4, 4]);
}

#[test]
fn test_parse_round_trips_a_diagram() {
    let diagram = concat!(
        "#############\n",
        "#.D...B.....#\n",
        "###.#C#B#.###\n",
        "  #A#D#C#A#\n",
        "  #########\n",
    );
    let parsed: Puzzle = diagram.parse().expect("test input should be valid");
    assert_eq!(parsed.board.hallway().get(1), Some(Amphipod::D));
    assert_eq!(parsed.board.room(0).len(), 1);
    assert_eq!(parsed.board.diagram(&parsed.layout).to_string(), diagram);
}

#[test]
fn test_unbalanced() {
    let result: Result<Puzzle, ParseError> = concat!(
        "#############\n",
        "#...........#\n",
        "###B#C#B#D###\n",
        "  #D#C#B#A###\n",
        "  #########\n",
    )
    .parse();
    assert_eq!(
        result,
        Err(ParseError::UnbalancedTokenCount {
            who: Amphipod::A,
            found: 1,
            expected: 2,
        })
    );
}

#[test]
fn test_malformed() {
    fn line_of(diagram: &str) -> Option<usize> {
        match diagram.parse::<Puzzle>() {
            Err(ParseError::MalformedInput { line, .. }) => Some(line),
            _ => None,
        }
    }

    // Too short.
    assert_eq!(line_of("#############\n#...........#\n  #########\n"), Some(3));
    assert_eq!(line_of(""), Some(0));
    // Unknown symbol in a room.
    assert_eq!(
        line_of("#############\n#...........#\n###B#X#B#D###\n  #A#D#C#A#\n  #########\n"),
        Some(3)
    );
    // Columns out of line.
    assert_eq!(
        line_of("#############\n#...........#\n###B#C#B#D###\n #A#D#C#A#\n  #########\n"),
        Some(4)
    );
    // Hallway too short.
    assert_eq!(
        line_of("#############\n#..........#\n###B#C#B#D###\n  #A#D#C#A#\n  #########\n"),
        Some(2)
    );
    // Nobody may stop outside a room.
    assert_eq!(
        line_of("#############\n#..B........#\n###.#C#B#D###\n  #A#D#C#A#\n  #########\n"),
        Some(2)
    );
    // Floating above an empty slot.
    assert_eq!(
        line_of("#############\n#.A.........#\n###B#C#B#D###\n  #.#D#C#A#\n  #########\n"),
        Some(3)
    );
    // Junk after the rooms.
    assert_eq!(
        line_of("#############\n#...........#\n###B#C#B#D#x#\n  #A#D#C#A#\n  #########\n"),
        Some(3)
    );
}

#[test]
fn test_too_deep() {
    let mut diagram = String::from("#############\n#...........#\n###A#B#C#D###\n");
    for _ in 1..=MAX_DEPTH {
        diagram.push_str("  #A#B#C#D#\n");
    }
    diagram.push_str("  #########\n");
    assert_eq!(
        diagram.parse::<Puzzle>(),
        Err(ParseError::TooDeep {
            depth: MAX_DEPTH + 1,
            capacity: MAX_DEPTH,
        })
    );
}
