use thiserror::Error;

use petri_protocol::{
    Coord, Direction, Entity, EntityKind, OrganId, OrganKind, Player, ProteinKind,
};

use crate::organism::{Organ, OrganArena, Organism};

/// What occupies a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Free,
    Wall,
    Protein(ProteinKind),
    Organ(OrganId),
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("entity at ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

/// The full per-turn world: cell contents, organ arena, and the control and
/// harvest relations derived from organ facings. Rebuilt from scratch from
/// the raw entity list every turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
    /// Tentacles aimed at each cell, per player.
    controlled: Vec<[u8; 2]>,
    /// Harvesters feeding from each cell, per player.
    harvested: Vec<[u8; 2]>,
    organs: OrganArena,
}

impl Board {
    pub fn from_entities(
        width: u32,
        height: u32,
        entities: &[Entity],
    ) -> Result<Board, BoardError> {
        let len = (width as usize) * (height as usize);
        let mut board = Board {
            width: width as i32,
            height: height as i32,
            cells: vec![CellKind::Free; len],
            controlled: vec![[0; 2]; len],
            harvested: vec![[0; 2]; len],
            organs: OrganArena::default(),
        };

        for entity in entities {
            let index = board.index_of(entity.pos).ok_or(BoardError::OutOfBounds {
                x: entity.pos.x,
                y: entity.pos.y,
                width,
                height,
            })?;
            let cell = match &entity.kind {
                EntityKind::Wall => CellKind::Wall,
                EntityKind::Protein { kind } => CellKind::Protein(*kind),
                EntityKind::Organ(snapshot) => {
                    board.organs.push(Organ {
                        id: snapshot.id,
                        owner: snapshot.owner,
                        kind: snapshot.kind,
                        pos: entity.pos,
                        facing: snapshot.facing,
                        parent: snapshot.parent,
                        root: snapshot.root,
                    });
                    CellKind::Organ(snapshot.id)
                }
            };
            board.cells[index] = cell;
        }

        board.organs.rebuild_tree();
        board.link_targets();
        Ok(board)
    }

    /// Derive the control and harvest relations from organ facings.
    fn link_targets(&mut self) {
        for index in 0..self.organs.len() {
            let organ = self.organs.organ(index);
            let player = organ.owner.index();
            match organ.kind {
                OrganKind::Tentacle => {
                    if let Some(target) = self.index_of(organ.target()) {
                        self.controlled[target][player] += 1;
                    }
                }
                OrganKind::Harvester => {
                    if let Some(target) = self.index_of(organ.target()) {
                        if matches!(self.cells[target], CellKind::Protein(_)) {
                            self.harvested[target][player] += 1;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn index_of(&self, pos: Coord) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn coord_at(&self, index: usize) -> Coord {
        let index = index as i32;
        Coord::new(index % self.width, index / self.width)
    }

    pub fn kind_at(&self, pos: Coord) -> Option<CellKind> {
        self.index_of(pos).map(|index| self.cells[index])
    }

    pub fn neighbors_indices(&self, index: usize) -> [Option<usize>; 4] {
        let pos = self.coord_at(index);
        let mut out = [None; 4];
        for (slot, dir) in out.iter_mut().zip(Direction::ALL) {
            *slot = self.index_of(pos.step(dir));
        }
        out
    }

    /// Neither wall nor organ. Proteins are free: they can be grown over and
    /// walked through by the territory search.
    pub fn is_free_index(&self, index: usize) -> bool {
        matches!(self.cells[index], CellKind::Free | CellKind::Protein(_))
    }

    pub fn is_free(&self, pos: Coord) -> bool {
        self.index_of(pos)
            .map(|index| self.is_free_index(index))
            .unwrap_or(false)
    }

    /// Free and not denied by an opposing tentacle: legal to grow onto for
    /// `player`.
    pub fn is_growable(&self, pos: Coord, player: Player) -> bool {
        let Some(index) = self.index_of(pos) else {
            return false;
        };
        self.is_free_index(index) && self.controlled[index][player.opponent().index()] == 0
    }

    pub fn controlled_by(&self, pos: Coord, player: Player) -> bool {
        self.index_of(pos)
            .map(|index| self.controlled[index][player.index()] > 0)
            .unwrap_or(false)
    }

    pub fn harvested_by(&self, pos: Coord, player: Player) -> bool {
        self.index_of(pos)
            .map(|index| self.harvested[index][player.index()] > 0)
            .unwrap_or(false)
    }

    pub fn protein_at(&self, pos: Coord) -> Option<ProteinKind> {
        match self.kind_at(pos)? {
            CellKind::Protein(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn organ_at(&self, pos: Coord) -> Option<&Organ> {
        match self.kind_at(pos)? {
            CellKind::Organ(id) => self.organs.get(id),
            _ => None,
        }
    }

    pub fn organs(&self) -> &OrganArena {
        &self.organs
    }

    pub fn organisms(&self, player: Player) -> Vec<Organism> {
        self.organs.organisms(player)
    }

    /// Count of proteins currently fed on by `player`'s harvesters, per kind.
    pub fn harvest_census(&self, player: Player) -> [u32; 4] {
        let mut census = [0u32; 4];
        for (_, organ) in self.organs.iter() {
            if organ.owner != player || organ.kind != OrganKind::Harvester {
                continue;
            }
            if let Some(kind) = self.protein_at(organ.target()) {
                census[kind.index()] += 1;
            }
        }
        census
    }

    /// Cells a spore fired from `from` toward `dir` could land on: the
    /// straight run of growable cells, stopping at the first blocked one.
    pub fn spore_line(&self, from: Coord, dir: Direction, player: Player) -> Vec<Coord> {
        let mut line = Vec::new();
        let mut pos = from.step(dir);
        while self.is_growable(pos, player) {
            line.push(pos);
            pos = pos.step(dir);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_protocol::OrganSnapshot;

    fn organ_entity(
        pos: Coord,
        id: u32,
        owner: Player,
        kind: OrganKind,
        facing: Direction,
        parent: Option<u32>,
        root: u32,
    ) -> Entity {
        Entity::organ(
            pos,
            OrganSnapshot {
                id: OrganId::new(id),
                owner,
                kind,
                facing,
                parent: parent.map(OrganId::new),
                root: OrganId::new(root),
            },
        )
    }

    #[test]
    fn rebuild_is_idempotent() {
        let entities = vec![
            Entity::wall(Coord::new(1, 1)),
            Entity::protein(Coord::new(3, 0), ProteinKind::B),
            organ_entity(
                Coord::new(0, 0),
                1,
                Player::Me,
                OrganKind::Root,
                Direction::North,
                None,
                1,
            ),
            organ_entity(
                Coord::new(1, 0),
                2,
                Player::Me,
                OrganKind::Harvester,
                Direction::East,
                Some(1),
                1,
            ),
        ];

        let a = Board::from_entities(4, 3, &entities).expect("board");
        let b = Board::from_entities(4, 3, &entities).expect("board");
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_bounds_entity_is_rejected() {
        let entities = vec![Entity::wall(Coord::new(9, 0))];
        assert!(matches!(
            Board::from_entities(4, 3, &entities),
            Err(BoardError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn harvester_links_to_protein_target() {
        let entities = vec![
            Entity::protein(Coord::new(2, 0), ProteinKind::A),
            organ_entity(
                Coord::new(1, 0),
                2,
                Player::Me,
                OrganKind::Harvester,
                Direction::East,
                Some(1),
                1,
            ),
            organ_entity(
                Coord::new(0, 0),
                1,
                Player::Me,
                OrganKind::Root,
                Direction::North,
                None,
                1,
            ),
        ];
        let board = Board::from_entities(4, 1, &entities).expect("board");

        assert!(board.harvested_by(Coord::new(2, 0), Player::Me));
        assert!(!board.harvested_by(Coord::new(2, 0), Player::Foe));
        assert_eq!(board.harvest_census(Player::Me), [1, 0, 0, 0]);
    }

    #[test]
    fn tentacle_denies_growth_to_its_target() {
        let entities = vec![organ_entity(
            Coord::new(0, 0),
            5,
            Player::Foe,
            OrganKind::Tentacle,
            Direction::East,
            None,
            5,
        )];
        let board = Board::from_entities(3, 1, &entities).expect("board");

        let denied = Coord::new(1, 0);
        assert!(board.is_free(denied));
        assert!(!board.is_growable(denied, Player::Me));
        assert!(board.is_growable(denied, Player::Foe));
    }

    #[test]
    fn spore_line_stops_at_first_blocked_cell() {
        let entities = vec![
            organ_entity(
                Coord::new(0, 0),
                1,
                Player::Me,
                OrganKind::Sporer,
                Direction::East,
                None,
                1,
            ),
            Entity::wall(Coord::new(3, 0)),
        ];
        let board = Board::from_entities(6, 1, &entities).expect("board");

        let line = board.spore_line(Coord::new(0, 0), Direction::East, Player::Me);
        assert_eq!(line, vec![Coord::new(1, 0), Coord::new(2, 0)]);
    }
}
