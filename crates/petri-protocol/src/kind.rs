use serde::{Deserialize, Serialize};

/// The two contestants. `Me` is the player this process decides for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Me,
    Foe,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::Me, Player::Foe];

    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::Me => Player::Foe,
            Player::Foe => Player::Me,
        }
    }

    /// Dense index for per-player arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::Me => 0,
            Player::Foe => 1,
        }
    }
}

/// Organ kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganKind {
    Root,
    Basic,
    Harvester,
    Tentacle,
    Sporer,
}

impl OrganKind {
    pub const ALL: [OrganKind; 5] = [
        OrganKind::Root,
        OrganKind::Basic,
        OrganKind::Harvester,
        OrganKind::Tentacle,
        OrganKind::Sporer,
    ];

    /// Kinds that a GROW command may produce, in fallback preference order.
    pub const GROWABLE: [OrganKind; 4] = [
        OrganKind::Basic,
        OrganKind::Harvester,
        OrganKind::Tentacle,
        OrganKind::Sporer,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            OrganKind::Root => "ROOT",
            OrganKind::Basic => "BASIC",
            OrganKind::Harvester => "HARVESTER",
            OrganKind::Tentacle => "TENTACLE",
            OrganKind::Sporer => "SPORER",
        }
    }

    pub fn from_wire(name: &str) -> Option<OrganKind> {
        match name {
            "ROOT" => Some(OrganKind::Root),
            "BASIC" => Some(OrganKind::Basic),
            "HARVESTER" => Some(OrganKind::Harvester),
            "TENTACLE" => Some(OrganKind::Tentacle),
            "SPORER" => Some(OrganKind::Sporer),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrganKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Protein kinds, canonically ordered A, B, C, D.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProteinKind {
    A,
    B,
    C,
    D,
}

impl ProteinKind {
    pub const ALL: [ProteinKind; 4] = [
        ProteinKind::A,
        ProteinKind::B,
        ProteinKind::C,
        ProteinKind::D,
    ];

    /// Dense index for per-kind arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ProteinKind::A => 0,
            ProteinKind::B => 1,
            ProteinKind::C => 2,
            ProteinKind::D => 3,
        }
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            ProteinKind::A => "A",
            ProteinKind::B => "B",
            ProteinKind::C => "C",
            ProteinKind::D => "D",
        }
    }

    pub fn from_wire(name: &str) -> Option<ProteinKind> {
        match name {
            "A" => Some(ProteinKind::A),
            "B" => Some(ProteinKind::B),
            "C" => Some(ProteinKind::C),
            "D" => Some(ProteinKind::D),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProteinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}
