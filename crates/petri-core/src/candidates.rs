//! Per-category candidate generation: each category proposes at most one
//! scored action per organism, and the arbiter decides what actually commits.

use std::collections::{HashMap, HashSet};

use petri_protocol::{Command, Coord, Direction, OrganId, OrganKind, Player};

use crate::board::Board;
use crate::config::Tunables;
use crate::organism::Organism;
use crate::stock::Stock;
use crate::territory::TerritoryMap;

/// Action categories, tried in strict priority order each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    CloseDefense,
    TwoCellDefense,
    Reproduction,
    Harvest,
    SporerGrowth,
    Expansion,
    /// Global fallback: only run when every category above committed nothing.
    Consolidation,
    Wait,
}

impl Category {
    /// The per-turn pass order. Consolidation and Wait are driven separately
    /// by the planner because of their trigger conditions.
    pub const PRIORITY: [Category; 6] = [
        Category::CloseDefense,
        Category::TwoCellDefense,
        Category::Reproduction,
        Category::Harvest,
        Category::SporerGrowth,
        Category::Expansion,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::CloseDefense => "close_defense",
            Category::TwoCellDefense => "two_cell_defense",
            Category::Reproduction => "reproduction",
            Category::Harvest => "harvest",
            Category::SporerGrowth => "sporer_growth",
            Category::Expansion => "expansion",
            Category::Consolidation => "consolidation",
            Category::Wait => "wait",
        }
    }
}

/// One legal single-step growth: a source organ and an adjacent growable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowMove {
    pub source: OrganId,
    pub target: Coord,
    /// Direction of the step from source to target.
    pub facing: Direction,
}

/// A scored action proposal for one organism. Scores are fixed at generation
/// time; the arbiter never re-scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub source: OrganId,
    pub score: i32,
    pub kind: CandidateKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateKind {
    Grow {
        at: Coord,
        organ: OrganKind,
        facing: Direction,
    },
    Spore {
        at: Coord,
    },
    Wait,
}

impl Candidate {
    /// The cell this action occupies, if any.
    pub fn target(&self) -> Option<Coord> {
        match self.kind {
            CandidateKind::Grow { at, .. } | CandidateKind::Spore { at } => Some(at),
            CandidateKind::Wait => None,
        }
    }

    /// The organ kind whose cost commits with this action.
    pub fn cost(&self) -> Option<OrganKind> {
        match self.kind {
            CandidateKind::Grow { organ, .. } => Some(organ),
            CandidateKind::Spore { .. } => Some(OrganKind::Root),
            CandidateKind::Wait => None,
        }
    }

    pub fn command(&self) -> Command {
        match self.kind {
            CandidateKind::Grow { at, organ, facing } => Command::Grow {
                from: self.source,
                at,
                kind: organ,
                facing,
            },
            CandidateKind::Spore { at } => Command::Spore {
                from: self.source,
                at,
            },
            CandidateKind::Wait => Command::Wait,
        }
    }
}

/// Candidate generator for one turn. Holds the per-turn caches: single-step
/// grow moves per organism, the harvest census, and the sporers already
/// consumed by the reproduction category this turn.
pub struct Generator<'a> {
    board: &'a Board,
    territory: &'a TerritoryMap,
    tunables: &'a Tunables,
    census: [u32; 4],
    consumed_sporers: HashSet<OrganId>,
    grow_moves: HashMap<OrganId, Vec<GrowMove>>,
}

impl<'a> Generator<'a> {
    pub fn new(board: &'a Board, territory: &'a TerritoryMap, tunables: &'a Tunables) -> Self {
        Self {
            board,
            territory,
            tunables,
            census: board.harvest_census(Player::Me),
            consumed_sporers: HashSet::new(),
            grow_moves: HashMap::new(),
        }
    }

    /// The best candidate of `category` for `organism`, or `None` when the
    /// category has nothing legal to propose. `stock` is the arbiter's
    /// running stock; affordability is re-checked at commit time.
    pub fn best_candidate(
        &mut self,
        category: Category,
        organism: &Organism,
        stock: &Stock,
    ) -> Option<Candidate> {
        match category {
            Category::CloseDefense => self.close_defense(organism, stock),
            Category::TwoCellDefense => self.two_cell_defense(organism, stock),
            Category::Reproduction => self.reproduction(organism, stock),
            Category::Harvest => self.harvest(organism, stock),
            Category::SporerGrowth => self.sporer_growth(organism, stock),
            Category::Expansion => self.expansion(organism, stock, false),
            Category::Consolidation => self.expansion(organism, stock, true),
            Category::Wait => Some(Candidate {
                source: organism.root,
                score: self.tunables.wait_score,
                kind: CandidateKind::Wait,
            }),
        }
    }

    /// Grow onto a cell touching an enemy organ, cutting off its most-branched
    /// growth first.
    fn close_defense(&mut self, organism: &Organism, stock: &Stock) -> Option<Candidate> {
        let organ_kind = self.defense_kind(stock);
        let mut best: Option<Candidate> = None;

        self.ensure_grow_moves(organism);
        for mv in &self.grow_moves[&organism.root] {
            let mut score = 0;
            let mut facing = None;
            for (dir, neighbor) in mv.target.neighbors() {
                let Some(subtree) = self.enemy_subtree_at(neighbor) else {
                    continue;
                };
                let threat = self.tunables.close_defense_base + subtree;
                if threat > score {
                    score = threat;
                    facing = Some(dir);
                }
            }

            let Some(facing) = facing else { continue };
            if best.map_or(true, |b| score > b.score) {
                best = Some(Candidate {
                    source: mv.source,
                    score,
                    kind: CandidateKind::Grow {
                        at: mv.target,
                        organ: organ_kind,
                        facing,
                    },
                });
            }
        }
        best
    }

    /// Same search one step out: grow toward a free cell whose own neighbor
    /// borders an enemy. Weaker base weight than direct contact.
    fn two_cell_defense(&mut self, organism: &Organism, stock: &Stock) -> Option<Candidate> {
        let organ_kind = self.defense_kind(stock);
        let mut best: Option<Candidate> = None;

        self.ensure_grow_moves(organism);
        for mv in &self.grow_moves[&organism.root] {
            let mut score = 0;
            let mut facing = None;
            for (dir, between) in mv.target.neighbors() {
                if !self.board.is_free(between) || self.board.controlled_by(between, Player::Me) {
                    continue;
                }
                let Some(subtree) = between
                    .neighbors()
                    .filter_map(|(_, c)| self.enemy_subtree_at(c))
                    .max()
                else {
                    continue;
                };
                let threat = 1 + subtree;
                if threat > score {
                    score = threat;
                    facing = Some(dir);
                }
            }

            let Some(facing) = facing else { continue };
            if best.map_or(true, |b| score > b.score) {
                best = Some(Candidate {
                    source: mv.source,
                    score,
                    kind: CandidateKind::Grow {
                        at: mv.target,
                        organ: organ_kind,
                        facing,
                    },
                });
            }
        }
        best
    }

    /// Fire an unconsumed sporer at the cell along its line with the best
    /// territory gain. Consumes the sporer for the rest of the turn even if
    /// the arbiter later drops the candidate.
    fn reproduction(&mut self, organism: &Organism, stock: &Stock) -> Option<Candidate> {
        if !stock.can_afford(OrganKind::Root) {
            return None;
        }

        let mut best: Option<(i32, OrganId, Coord)> = None;
        for &index in &organism.organs {
            let organ = self.board.organs().organ(index);
            if organ.kind != OrganKind::Sporer || self.consumed_sporers.contains(&organ.id) {
                continue;
            }
            for cell in self.board.spore_line(organ.pos, organ.facing, Player::Me) {
                let score = self.territory.simulate(self.board, cell) as i32;
                if best.map_or(true, |(s, _, _)| score > s) {
                    best = Some((score, organ.id, cell));
                }
            }
        }

        let (score, sporer, at) = best?;
        self.consumed_sporers.insert(sporer);
        Some(Candidate {
            source: sporer,
            score,
            kind: CandidateKind::Spore { at },
        })
    }

    /// Grow a harvester next to a protein, favoring kinds with no harvester
    /// yet to diversify income.
    fn harvest(&mut self, organism: &Organism, stock: &Stock) -> Option<Candidate> {
        if !stock.can_afford(OrganKind::Harvester) {
            return None;
        }

        let mut best: Option<Candidate> = None;
        self.ensure_grow_moves(organism);
        for mv in &self.grow_moves[&organism.root] {
            if self.board.harvested_by(mv.target, Player::Me) {
                continue;
            }
            for (dir, neighbor) in mv.target.neighbors() {
                let Some(kind) = self.board.protein_at(neighbor) else {
                    continue;
                };
                let score = 1 - self.census[kind.index()] as i32;
                if best.map_or(true, |b| score > b.score) {
                    best = Some(Candidate {
                        source: mv.source,
                        score,
                        kind: CandidateKind::Grow {
                            at: mv.target,
                            organ: OrganKind::Harvester,
                            facing: dir,
                        },
                    });
                }
            }
        }
        best
    }

    /// Grow a new sporer where its line opens enough fresh territory. Only
    /// worthwhile when the whole sporer-root-harvester chain is in stock and
    /// the organism has no sporer yet.
    fn sporer_growth(&mut self, organism: &Organism, stock: &Stock) -> Option<Candidate> {
        if organism.has_kind(self.board.organs(), OrganKind::Sporer) {
            return None;
        }
        if !stock.can_afford_all(&[OrganKind::Sporer, OrganKind::Root, OrganKind::Harvester]) {
            return None;
        }

        let min_reach = self.tunables.sporer_min_reach;
        let mut best: Option<Candidate> = None;
        self.ensure_grow_moves(organism);
        for mv in &self.grow_moves[&organism.root] {
            if self.board.harvested_by(mv.target, Player::Me) {
                continue;
            }
            for dir in Direction::ALL {
                let line = self.board.spore_line(mv.target, dir, Player::Me);
                let Some(score) = line
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| i + 1 >= min_reach)
                    .map(|(_, &cell)| self.territory.simulate(self.board, cell) as i32)
                    .max()
                else {
                    continue;
                };
                if score <= self.tunables.sporer_min_gain {
                    continue;
                }
                if best.map_or(true, |b| score > b.score) {
                    best = Some(Candidate {
                        source: mv.source,
                        score,
                        kind: CandidateKind::Grow {
                            at: mv.target,
                            organ: OrganKind::Sporer,
                            facing: dir,
                        },
                    });
                }
            }
        }
        best
    }

    /// Grow wherever the territory map gains the most. With
    /// `allow_non_positive` (the consolidation pass) the best move is kept
    /// even at zero or negative gain, guaranteeing forward progress.
    fn expansion(
        &mut self,
        organism: &Organism,
        stock: &Stock,
        allow_non_positive: bool,
    ) -> Option<Candidate> {
        let organ_kind = if stock.can_afford(OrganKind::Basic) {
            OrganKind::Basic
        } else {
            stock.best_growable_kind()
        };

        let mut best: Option<(i32, GrowMove)> = None;
        self.ensure_grow_moves(organism);
        for mv in &self.grow_moves[&organism.root] {
            let mut score = self.territory.simulate(self.board, mv.target) as i32;
            if self.board.harvested_by(mv.target, Player::Me) {
                score -= self.tunables.harvested_penalty;
            }
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, *mv));
            }
        }

        let (score, mv) = best?;
        if !allow_non_positive && score <= 0 {
            return None;
        }
        Some(Candidate {
            source: mv.source,
            score: score + 1,
            kind: CandidateKind::Grow {
                at: mv.target,
                organ: organ_kind,
                facing: mv.facing,
            },
        })
    }

    /// Best organ kind to block with: tentacle when in stock.
    fn defense_kind(&self, stock: &Stock) -> OrganKind {
        if stock.can_afford(OrganKind::Tentacle) {
            OrganKind::Tentacle
        } else {
            stock.best_growable_kind()
        }
    }

    /// Subtree size of an enemy organ at `pos`, if one is there.
    fn enemy_subtree_at(&self, pos: Coord) -> Option<i32> {
        let organ = self.board.organ_at(pos)?;
        if organ.owner != Player::Foe {
            return None;
        }
        let index = self.board.organs().index_of(organ.id)?;
        Some(self.board.organs().descendant_count(index) as i32)
    }

    fn ensure_grow_moves(&mut self, organism: &Organism) {
        let board = self.board;
        self.grow_moves
            .entry(organism.root)
            .or_insert_with(|| Self::compute_grow_moves(board, organism));
    }

    fn compute_grow_moves(board: &Board, organism: &Organism) -> Vec<GrowMove> {
        let mut moves = Vec::new();
        for &index in &organism.organs {
            let organ = board.organs().organ(index);
            for (facing, target) in organ.pos.neighbors() {
                if board.is_growable(target, Player::Me) {
                    moves.push(GrowMove {
                        source: organ.id,
                        target,
                        facing,
                    });
                }
            }
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_protocol::{Entity, OrganSnapshot, ProteinKind};

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

    fn my_root(pos: Coord, id: u32) -> Entity {
        organ_entity(pos, id, Player::Me, OrganKind::Root, Direction::North, None, id)
    }

    struct Fixture {
        board: Board,
        territory: TerritoryMap,
        tunables: Tunables,
    }

    impl Fixture {
        fn new(width: u32, height: u32, entities: Vec<Entity>) -> Self {
            let board = Board::from_entities(width, height, &entities).expect("board");
            let territory = TerritoryMap::build(&board);
            Self {
                board,
                territory,
                tunables: Tunables::default(),
            }
        }

        fn generator(&self) -> Generator<'_> {
            Generator::new(&self.board, &self.territory, &self.tunables)
        }

        fn organism(&self) -> Organism {
            self.board
                .organisms(Player::Me)
                .into_iter()
                .next()
                .expect("one organism")
        }
    }

    #[test]
    fn close_defense_targets_the_cell_next_to_the_enemy() {
        let fixture = Fixture::new(
            3,
            1,
            vec![
                my_root(Coord::new(0, 0), 1),
                organ_entity(
                    Coord::new(2, 0),
                    9,
                    Player::Foe,
                    OrganKind::Root,
                    Direction::North,
                    None,
                    9,
                ),
            ],
        );
        let mut generator = fixture.generator();
        let stock = Stock::new([0, 1, 1, 0]);

        let candidate = generator
            .best_candidate(Category::CloseDefense, &fixture.organism(), &stock)
            .expect("defense candidate");

        assert!(candidate.score >= fixture.tunables.close_defense_base);
        assert_eq!(
            candidate.kind,
            CandidateKind::Grow {
                at: Coord::new(1, 0),
                organ: OrganKind::Tentacle,
                facing: Direction::East,
            }
        );
    }

    #[test]
    fn close_defense_prefers_the_most_branched_enemy() {
        // Two foe organisms in reach; the one with descendants scores higher.
        let fixture = Fixture::new(
            5,
            3,
            vec![
                my_root(Coord::new(2, 1), 1),
                // Lone foe root west.
                organ_entity(
                    Coord::new(0, 1),
                    8,
                    Player::Foe,
                    OrganKind::Root,
                    Direction::North,
                    None,
                    8,
                ),
                // Branched foe root east.
                organ_entity(
                    Coord::new(4, 1),
                    9,
                    Player::Foe,
                    OrganKind::Root,
                    Direction::North,
                    None,
                    9,
                ),
                organ_entity(
                    Coord::new(4, 0),
                    10,
                    Player::Foe,
                    OrganKind::Basic,
                    Direction::North,
                    Some(9),
                    9,
                ),
                organ_entity(
                    Coord::new(4, 2),
                    11,
                    Player::Foe,
                    OrganKind::Basic,
                    Direction::North,
                    Some(9),
                    9,
                ),
            ],
        );
        let mut generator = fixture.generator();
        let stock = Stock::new([9, 9, 9, 9]);

        let candidate = generator
            .best_candidate(Category::CloseDefense, &fixture.organism(), &stock)
            .expect("defense candidate");

        // (3, 1) blocks the root with two descendants.
        assert_eq!(candidate.target(), Some(Coord::new(3, 1)));
        assert_eq!(candidate.score, fixture.tunables.close_defense_base + 2);
    }

    #[test]
    fn harvest_prefers_kinds_not_yet_harvested() {
        let fixture = Fixture::new(
            5,
            1,
            vec![
                my_root(Coord::new(0, 0), 1),
                Entity::protein(Coord::new(2, 0), ProteinKind::B),
            ],
        );
        let mut generator = fixture.generator();
        let stock = Stock::new([0, 0, 1, 1]);

        let candidate = generator
            .best_candidate(Category::Harvest, &fixture.organism(), &stock)
            .expect("harvest candidate");

        assert_eq!(candidate.score, 1);
        assert_eq!(
            candidate.kind,
            CandidateKind::Grow {
                at: Coord::new(1, 0),
                organ: OrganKind::Harvester,
                facing: Direction::East,
            }
        );
    }

    #[test]
    fn reproduction_consumes_the_sporer_for_the_turn() {
        let fixture = Fixture::new(
            6,
            2,
            vec![
                my_root(Coord::new(0, 0), 1),
                organ_entity(
                    Coord::new(0, 1),
                    2,
                    Player::Me,
                    OrganKind::Sporer,
                    Direction::East,
                    Some(1),
                    1,
                ),
                organ_entity(
                    Coord::new(5, 1),
                    9,
                    Player::Foe,
                    OrganKind::Root,
                    Direction::North,
                    None,
                    9,
                ),
            ],
        );
        let mut generator = fixture.generator();
        let organism = fixture.organism();
        let stock = Stock::new([4, 4, 4, 4]);

        let first = generator
            .best_candidate(Category::Reproduction, &organism, &stock)
            .expect("spore candidate");
        assert!(matches!(first.kind, CandidateKind::Spore { .. }));
        assert_eq!(first.source, OrganId::new(2));

        // The sporer is consumed for the remainder of the turn.
        assert!(generator
            .best_candidate(Category::Reproduction, &organism, &stock)
            .is_none());
    }

    #[test]
    fn expansion_rejects_non_positive_gain_but_consolidation_keeps_it() {
        // Alone on the board every free cell is already ours: zero gain.
        let fixture = Fixture::new(3, 1, vec![my_root(Coord::new(0, 0), 1)]);
        let mut generator = fixture.generator();
        let organism = fixture.organism();
        let stock = Stock::new([1, 0, 0, 0]);

        assert!(generator
            .best_candidate(Category::Expansion, &organism, &stock)
            .is_none());

        let fallback = generator
            .best_candidate(Category::Consolidation, &organism, &stock)
            .expect("consolidation candidate");
        assert_eq!(fallback.target(), Some(Coord::new(1, 0)));
    }

    #[test]
    fn starved_organism_with_no_exits_only_waits() {
        let fixture = Fixture::new(
            3,
            3,
            vec![
                my_root(Coord::new(1, 1), 1),
                Entity::wall(Coord::new(1, 0)),
                Entity::wall(Coord::new(0, 1)),
                Entity::wall(Coord::new(2, 1)),
                Entity::wall(Coord::new(1, 2)),
            ],
        );
        let mut generator = fixture.generator();
        let organism = fixture.organism();
        let stock = Stock::new([0, 0, 0, 0]);

        for category in Category::PRIORITY {
            assert!(
                generator
                    .best_candidate(category, &organism, &stock)
                    .is_none(),
                "{} should yield nothing",
                category.label()
            );
        }
        assert!(generator
            .best_candidate(Category::Consolidation, &organism, &stock)
            .is_none());

        let wait = generator
            .best_candidate(Category::Wait, &organism, &stock)
            .expect("wait is guaranteed");
        assert_eq!(wait.kind, CandidateKind::Wait);
        assert!(wait.score > 0);
    }
}
