use crate::error::{Error, Result};
use rand::{seq::SliceRandom, Rng};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Black,
    White,
    Blank,
}

impl Tile {
    /// Parses a single puzzle character, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(Tile::Black),
            'w' => Some(Tile::White),
            'x' => Some(Tile::Blank),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Tile::Black => 'b',
            Tile::White => 'w',
            Tile::Blank => 'x',
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// How a move is charged while ordering the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostModel {
    /// Every move costs 1.
    #[default]
    Uniform,
    /// Furthest-move-optimal: a jump over `d` positions on a sequence of
    /// length `n` costs `n - d`, so longer jumps are cheaper.
    Weighted,
}

impl CostModel {
    pub fn step_cost(&self, len: usize, distance: usize) -> u64 {
        match self {
            CostModel::Uniform => 1,
            CostModel::Weighted => len.saturating_sub(distance) as u64,
        }
    }
}

/// A state reachable in one move from some parent sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Successor {
    /// Position swapped with the blank; the blank ends up here.
    pub index: usize,
    /// How far the blank travelled.
    pub distance: usize,
    pub step_cost: u64,
    pub state: TileSequence,
}

/// An arrangement of black and white tiles with exactly one blank.
///
/// Only constructible through validation, so every value upholds the
/// single-blank invariant. Parsing is case-insensitive; equality and hashing
/// compare the normalized tiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileSequence {
    tiles: Box<[Tile]>,
    blank: usize,
}

/// True iff `text` is zero or more tiles, exactly one blank, zero or more tiles.
pub fn validate(text: &str) -> bool {
    TileSequence::parse(text).is_ok()
}

impl TileSequence {
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::invalid_puzzle(text, "empty puzzle"));
        }

        let mut tiles = Vec::with_capacity(text.len());
        let mut blanks = Vec::new();

        for (position, c) in text.chars().enumerate() {
            let tile = Tile::from_char(c).ok_or_else(|| {
                Error::invalid_puzzle(
                    text,
                    format!("unexpected character '{}' at position {}", c, position),
                )
            })?;
            if tile == Tile::Blank {
                blanks.push(position);
            }
            tiles.push(tile);
        }

        match blanks.as_slice() {
            [blank] => Ok(Self {
                tiles: tiles.into_boxed_slice(),
                blank: *blank,
            }),
            _ => Err(Error::invalid_puzzle(
                text,
                format!("expected exactly one blank, found {}", blanks.len()),
            )),
        }
    }

    /// Shuffles `blacks` black tiles, `whites` white tiles and a blank into a
    /// random arrangement that is not already solved.
    pub fn random<R: Rng + ?Sized>(blacks: usize, whites: usize, rng: &mut R) -> Self {
        let mut tiles: Vec<Tile> = std::iter::repeat(Tile::Black)
            .take(blacks)
            .chain(std::iter::repeat(Tile::White).take(whites))
            .chain(std::iter::once(Tile::Blank))
            .collect();

        loop {
            tiles.shuffle(rng);

            let blank = tiles
                .iter()
                .position(|&t| t == Tile::Blank)
                .unwrap_or_default();
            let sequence = Self {
                tiles: tiles.clone().into_boxed_slice(),
                blank,
            };

            if !sequence.is_goal() {
                return sequence;
            }
        }
    }

    /// The canonical solved arrangement: all black, the blank, all white.
    pub fn goal(blacks: usize, whites: usize) -> Self {
        let tiles: Vec<Tile> = std::iter::repeat(Tile::Black)
            .take(blacks)
            .chain(std::iter::once(Tile::Blank))
            .chain(std::iter::repeat(Tile::White).take(whites))
            .collect();

        Self {
            tiles: tiles.into_boxed_slice(),
            blank: blacks,
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn blank_position(&self) -> usize {
        self.blank
    }

    /// One or more black tiles, the blank, then one or more white tiles.
    pub fn is_goal(&self) -> bool {
        let (left, right) = (&self.tiles[..self.blank], &self.tiles[self.blank + 1..]);

        !left.is_empty()
            && !right.is_empty()
            && left.iter().all(|&t| t == Tile::Black)
            && right.iter().all(|&t| t == Tile::White)
    }

    /// White tiles left of the blank plus black tiles right of it.
    ///
    /// Every such tile has to cross the blank at least once, so this never
    /// overestimates the number of remaining moves.
    pub fn heuristic(&self) -> u64 {
        let misplaced_white = self.tiles[..self.blank]
            .iter()
            .filter(|&&t| t == Tile::White)
            .count();
        let misplaced_black = self.tiles[self.blank + 1..]
            .iter()
            .filter(|&&t| t == Tile::Black)
            .count();

        (misplaced_white + misplaced_black) as u64
    }

    /// Swaps the blank with the tile at `index`. Returns `None` when `index`
    /// is out of range or already holds the blank.
    pub fn with_blank_at(&self, index: usize) -> Option<Self> {
        if index >= self.len() || index == self.blank {
            return None;
        }

        let mut tiles = self.tiles.clone();
        tiles.swap(index, self.blank);

        Some(Self {
            tiles,
            blank: index,
        })
    }

    /// Every state one move away, ordered by increasing `index`.
    pub fn successors(&self, cost_model: CostModel) -> Vec<Successor> {
        (0..self.len())
            .filter_map(|index| {
                let state = self.with_blank_at(index)?;
                let distance = index.abs_diff(self.blank);
                Some(Successor {
                    index,
                    distance,
                    step_cost: cost_model.step_cost(self.len(), distance),
                    state,
                })
            })
            .collect()
    }
}

impl FromStr for TileSequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TileSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in self.tiles.iter() {
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}

impl Serialize for TileSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seq(s: &str) -> TileSequence {
        s.parse().unwrap()
    }

    #[test]
    fn test_validate_accepts_single_blank() {
        assert!(validate("x"));
        assert!(validate("bxw"));
        assert!(validate("WBxWB"));
        assert!(validate("bbbX"));
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(!validate(""));
        assert!(!validate("bw"));
        assert!(!validate("bxxw"));
        assert!(!validate("bxw "));
        assert!(!validate("bqxw"));
    }

    #[test]
    fn test_parse_reports_reason() {
        match TileSequence::parse("bxqw") {
            Err(Error::InvalidPuzzle { puzzle, reason }) => {
                assert_eq!(puzzle, "bxqw");
                assert!(reason.contains("'q' at position 2"), "{reason}");
            }
            other => panic!("unexpected: {other:?}"),
        }

        match TileSequence::parse("bxxw") {
            Err(Error::InvalidPuzzle { reason, .. }) => {
                assert!(reason.contains("found 2"), "{reason}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(seq("BXw"), seq("bxW"));
        assert_eq!(seq("BXW").to_string(), "bxw");
    }

    #[test]
    fn test_goal_detection() {
        assert!(seq("bxw").is_goal());
        assert!(seq("bbbxww").is_goal());
        assert!(!seq("xbw").is_goal());
        assert!(!seq("bx").is_goal());
        assert!(!seq("xw").is_goal());
        assert!(!seq("x").is_goal());
        assert!(!seq("wxb").is_goal());
        assert!(!seq("bwxw").is_goal());
    }

    #[test]
    fn test_heuristic_values() {
        assert_eq!(seq("bbxww").heuristic(), 0);
        assert_eq!(seq("wxb").heuristic(), 2);
        assert_eq!(seq("wbxbw").heuristic(), 2);
        assert_eq!(seq("xbw").heuristic(), 1);
    }

    /// Every arrangement of `blacks` black tiles, `whites` white tiles and a blank.
    fn arrangements(blacks: usize, whites: usize) -> Vec<TileSequence> {
        let tiles = blacks + whites;
        let mut result = Vec::new();

        for mask in 0u32..(1 << tiles) {
            if mask.count_ones() as usize != blacks {
                continue;
            }
            let row: String = (0..tiles)
                .map(|i| if mask & (1 << i) != 0 { 'b' } else { 'w' })
                .collect();
            for blank in 0..=tiles {
                let mut text = row.clone();
                text.insert(blank, 'x');
                result.push(seq(&text));
            }
        }
        result
    }

    #[test]
    fn test_heuristic_zero_iff_goal_for_mixed_sequences() {
        for blacks in 1..=3 {
            for whites in 1..=3 {
                let all = arrangements(blacks, whites);
                let goals = all.iter().filter(|s| s.is_goal()).count();
                assert_eq!(goals, 1, "{blacks} blacks, {whites} whites");

                for state in &all {
                    assert_eq!(state.heuristic() == 0, state.is_goal(), "{state}");
                }
            }
        }
    }

    #[test]
    fn test_successors_one_per_tile_in_index_order() {
        let state = seq("wbxw");
        let successors = state.successors(CostModel::Uniform);

        assert_eq!(successors.len(), state.len() - 1);
        let indices: Vec<usize> = successors.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);

        let states: Vec<String> = successors.iter().map(|s| s.state.to_string()).collect();
        assert_eq!(states, vec!["xbww", "wxbw", "wbwx"]);

        for successor in &successors {
            assert_eq!(successor.step_cost, 1);
            assert_eq!(successor.state.blank_position(), successor.index);
            let differing = state
                .tiles()
                .iter()
                .zip(successor.state.tiles())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(differing, 2);
        }
    }

    #[test]
    fn test_weighted_cost_favours_long_jumps() {
        let state = seq("xbbw");
        let costs: Vec<(usize, u64)> = state
            .successors(CostModel::Weighted)
            .iter()
            .map(|s| (s.distance, s.step_cost))
            .collect();
        assert_eq!(costs, vec![(1, 3), (2, 2), (3, 1)]);
    }

    #[test]
    fn test_with_blank_at_rejects_blank_and_out_of_range() {
        let state = seq("bxw");
        assert!(state.with_blank_at(1).is_none());
        assert!(state.with_blank_at(3).is_none());
        assert_eq!(state.with_blank_at(2).unwrap().to_string(), "bwx");
    }

    #[test]
    fn test_random_is_unsolved_and_reproducible() {
        let a = TileSequence::random(3, 2, &mut StdRng::seed_from_u64(7));
        let b = TileSequence::random(3, 2, &mut StdRng::seed_from_u64(7));

        assert_eq!(a, b);
        assert!(!a.is_goal());
        assert_eq!(a.len(), 6);
        assert_eq!(a.tiles().iter().filter(|&&t| t == Tile::Black).count(), 3);
        assert_eq!(a.tiles().iter().filter(|&&t| t == Tile::White).count(), 2);
    }

    #[test]
    fn test_goal_constructor() {
        assert_eq!(TileSequence::goal(2, 3).to_string(), "bbxwww");
        assert!(TileSequence::goal(1, 1).is_goal());
    }
}
