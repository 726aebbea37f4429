use serde::{Deserialize, Serialize};

/// Orthogonal grid coordinates. `(0, 0)` is the top-left corner and `y` grows
/// southward, matching the referee's convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `dir`.
    #[inline]
    pub const fn step(self, dir: Direction) -> Coord {
        let (dx, dy) = dir.delta();
        Coord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four orthogonal neighbors, paired with the direction leading to each.
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, Coord)> {
        Direction::ALL.into_iter().map(move |d| (d, self.step(d)))
    }

    #[inline]
    pub fn manhattan(self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Facing from `self` toward an orthogonally adjacent cell, if any.
    pub fn direction_to(self, other: Coord) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| self.step(*d) == other)
    }
}

/// Organ facing direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed order for determinism: N, E, S, W.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }

    pub fn from_char(c: char) -> Option<Direction> {
        match c {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_and_direction_to_agree() {
        let origin = Coord::new(4, 7);
        for dir in Direction::ALL {
            let there = origin.step(dir);
            assert_eq!(origin.manhattan(there), 1);
            assert_eq!(origin.direction_to(there), Some(dir));
        }
    }

    #[test]
    fn direction_to_rejects_non_adjacent() {
        let origin = Coord::new(0, 0);
        assert_eq!(origin.direction_to(Coord::new(2, 0)), None);
        assert_eq!(origin.direction_to(Coord::new(1, 1)), None);
        assert_eq!(origin.direction_to(origin), None);
    }

    #[test]
    fn neighbors_are_deterministic() {
        let a: Vec<_> = Coord::new(3, 3).neighbors().collect();
        let b: Vec<_> = Coord::new(3, 3).neighbors().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }
}
