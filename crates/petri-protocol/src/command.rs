use serde::{Deserialize, Serialize};

use crate::{Coord, Direction, OrganId, OrganKind};

/// One outbound action, exactly one per living organism per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Grow a new organ at an empty cell adjacent to the source organism.
    Grow {
        from: OrganId,
        at: Coord,
        kind: OrganKind,
        facing: Direction,
    },
    /// Fire a sporer, planting a new root along its facing line.
    Spore { from: OrganId, at: Coord },
    /// No action for this organism this turn.
    Wait,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Grow {
                from,
                at,
                kind,
                facing,
            } => write!(f, "GROW {} {} {} {} {}", from, at.x, at.y, kind, facing),
            Command::Spore { from, at } => write!(f, "SPORE {} {} {}", from, at.x, at.y),
            Command::Wait => f.write_str("WAIT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_format_to_wire_lines() {
        let grow = Command::Grow {
            from: OrganId::new(12),
            at: Coord::new(3, 5),
            kind: OrganKind::Tentacle,
            facing: Direction::East,
        };
        assert_eq!(grow.to_string(), "GROW 12 3 5 TENTACLE E");

        let spore = Command::Spore {
            from: OrganId::new(4),
            at: Coord::new(10, 0),
        };
        assert_eq!(spore.to_string(), "SPORE 4 10 0");

        assert_eq!(Command::Wait.to_string(), "WAIT");
    }
}
