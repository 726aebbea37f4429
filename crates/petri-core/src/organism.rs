use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use petri_protocol::{Coord, Direction, OrganId, OrganKind, Player};

/// One organ, rebuilt from its wire snapshot every turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organ {
    pub id: OrganId,
    pub owner: Player,
    pub kind: OrganKind,
    pub pos: Coord,
    pub facing: Direction,
    /// Absent for roots.
    pub parent: Option<OrganId>,
    pub root: OrganId,
}

impl Organ {
    /// The cell one step ahead in the facing direction. Meaningful for
    /// harvesters (fed cell) and tentacles (controlled cell).
    #[inline]
    pub fn target(&self) -> Coord {
        self.pos.step(self.facing)
    }
}

/// Dense per-turn organ storage with the parent/child tree and subtree sizes
/// precomputed once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrganArena {
    organs: Vec<Organ>,
    by_id: HashMap<OrganId, usize>,
    children: Vec<Vec<usize>>,
    descendants: Vec<u32>,
}

impl OrganArena {
    pub(crate) fn push(&mut self, organ: Organ) -> usize {
        let index = self.organs.len();
        self.by_id.insert(organ.id, index);
        self.organs.push(organ);
        index
    }

    /// Rebuilds child lists and descendant counts. Called once after the last
    /// `push` of a turn; the counts are an iterative post-order accumulation,
    /// never recursive.
    pub(crate) fn rebuild_tree(&mut self) {
        let len = self.organs.len();
        self.children = vec![Vec::new(); len];
        for (index, organ) in self.organs.iter().enumerate() {
            let Some(parent_id) = organ.parent else {
                continue;
            };
            if let Some(&parent_index) = self.by_id.get(&parent_id) {
                self.children[parent_index].push(index);
            }
        }

        // Top-down order via BFS from the roots, then accumulate bottom-up.
        let mut order = Vec::with_capacity(len);
        let mut queue: VecDeque<usize> = self
            .organs
            .iter()
            .enumerate()
            .filter(|(_, organ)| organ.parent.is_none())
            .map(|(index, _)| index)
            .collect();
        while let Some(index) = queue.pop_front() {
            order.push(index);
            for &child in &self.children[index] {
                queue.push_back(child);
            }
        }

        self.descendants = vec![0; len];
        for &index in order.iter().rev() {
            let subtree: u32 = self.children[index]
                .iter()
                .map(|&child| self.descendants[child] + 1)
                .sum();
            self.descendants[index] = subtree;
        }
    }

    pub fn len(&self) -> usize {
        self.organs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organs.is_empty()
    }

    pub fn get(&self, id: OrganId) -> Option<&Organ> {
        self.by_id.get(&id).map(|&index| &self.organs[index])
    }

    pub fn index_of(&self, id: OrganId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn organ(&self, index: usize) -> &Organ {
        &self.organs[index]
    }

    /// Number of descendants of the organ at `index`, excluding itself.
    pub fn descendant_count(&self, index: usize) -> u32 {
        self.descendants.get(index).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Organ)> {
        self.organs.iter().enumerate()
    }

    /// Partitions one player's organs into organisms by shared root id,
    /// ordered by root id for determinism.
    pub fn organisms(&self, player: Player) -> Vec<Organism> {
        let mut by_root: HashMap<OrganId, Vec<usize>> = HashMap::new();
        for (index, organ) in self.iter() {
            if organ.owner == player {
                by_root.entry(organ.root).or_default().push(index);
            }
        }

        let mut organisms: Vec<Organism> = by_root
            .into_iter()
            .map(|(root, organs)| Organism { root, organs })
            .collect();
        organisms.sort_by_key(|organism| organism.root);
        organisms
    }
}

/// One player's organs sharing a root id; the unit of action selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Organism {
    pub root: OrganId,
    /// Arena indices, in wire order.
    pub organs: Vec<usize>,
}

impl Organism {
    pub fn has_kind(&self, arena: &OrganArena, kind: OrganKind) -> bool {
        self.organs
            .iter()
            .any(|&index| arena.organ(index).kind == kind)
    }
}
