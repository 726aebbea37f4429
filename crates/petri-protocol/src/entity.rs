use serde::{Deserialize, Serialize};

use crate::{Coord, Direction, OrganId, OrganKind, Player, ProteinKind};

/// One entity line of the per-turn input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Coord,
    pub kind: EntityKind,
}

/// What occupies an entity's cell. Free cells are never listed by the referee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityKind {
    Wall,
    Protein { kind: ProteinKind },
    Organ(OrganSnapshot),
}

/// Per-turn snapshot of one organ as reported by the referee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganSnapshot {
    pub id: OrganId,
    pub owner: Player,
    pub kind: OrganKind,
    pub facing: Direction,
    /// Absent for roots.
    pub parent: Option<OrganId>,
    /// The root anchoring this organ's organism; a root is its own root.
    pub root: OrganId,
}

impl Entity {
    pub const fn wall(pos: Coord) -> Entity {
        Entity {
            pos,
            kind: EntityKind::Wall,
        }
    }

    pub const fn protein(pos: Coord, kind: ProteinKind) -> Entity {
        Entity {
            pos,
            kind: EntityKind::Protein { kind },
        }
    }

    pub fn organ(pos: Coord, organ: OrganSnapshot) -> Entity {
        Entity {
            pos,
            kind: EntityKind::Organ(organ),
        }
    }
}
